//! Docs publisher for porter.
//!
//! Rebuilds the project's static site with its bundler and republishes the
//! output as the docs directory, normalizing the entry document on the way.

pub mod publisher;
pub mod transform;
pub mod tree;

pub use publisher::{IndexStats, PublishConfig, PublishError, PublishReport, Publisher};
pub use transform::normalize_index;
