//! Entry document transform command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use porter_publish::normalize_index;

/// Run the transform command.
pub fn run(file: &Path) -> Result<()> {
    if !file.is_file() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let source =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let normalized = normalize_index(&source);
    fs::write(file, &normalized).with_context(|| format!("Failed to write {}", file.display()))?;

    tracing::info!(
        "Normalized {} ({} -> {} bytes)",
        file.display(),
        source.len(),
        normalized.len()
    );

    Ok(())
}
