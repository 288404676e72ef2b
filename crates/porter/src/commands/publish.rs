//! Docs publish command.

use std::path::PathBuf;

use anyhow::Result;
use porter_publish::Publisher;

use crate::config::PublishSettings;

/// Run the publish command.
pub fn run(settings: &PublishSettings, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Publishing docs...");

    let publisher = Publisher::new(settings.to_publish_config(output));

    let result = publisher.publish()?;

    tracing::info!(
        "Published {} files in {}ms (index {} -> {} bytes)",
        result.files,
        result.duration_ms,
        result.index_bytes_before,
        result.index_bytes_after
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
