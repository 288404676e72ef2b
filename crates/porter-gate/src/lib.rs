//! Local quality gate for porter.
//!
//! Runs a fixed sequence of toolchain commands (format, update, lint, check,
//! doc, build, bench, test) and records the outcome of each.

pub mod executor;
pub mod runner;
pub mod step;

pub use executor::{CommandExecutor, Exit, SystemExecutor};
pub use runner::{FailurePolicy, GateError, GateReport, GateRunner, StepOutcome, StepStatus};
pub use step::{default_steps, CheckStep};
