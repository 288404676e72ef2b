//! Configuration file (porter.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use porter_publish::PublishConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub publish: PublishSettings,
    #[serde(default)]
    pub check: CheckSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishSettings {
    #[serde(default = "default_site_dir")]
    pub site_dir: String,
    /// Relative to `site_dir`
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Relative to `output_dir`
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_build_command")]
    pub build_command: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSettings {
    #[serde(default = "default_program")]
    pub program: String,
    /// Stop at the first failing step
    #[serde(default)]
    pub strict: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            build_dir: default_build_dir(),
            output_dir: default_output_dir(),
            index: default_index(),
            build_command: default_build_command(),
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            strict: false,
        }
    }
}

fn default_site_dir() -> String {
    "site".to_string()
}
fn default_build_dir() -> String {
    "dist".to_string()
}
fn default_output_dir() -> String {
    "docs".to_string()
}
fn default_index() -> String {
    "index.html".to_string()
}
fn default_build_command() -> Vec<String> {
    vec!["npm".to_string(), "run".to_string(), "build".to_string()]
}
fn default_program() -> String {
    "cargo".to_string()
}

impl PublishSettings {
    pub fn to_publish_config(&self, output: Option<PathBuf>) -> PublishConfig {
        PublishConfig {
            site_dir: PathBuf::from(&self.site_dir),
            build_dir: PathBuf::from(&self.build_dir),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.output_dir)),
            index: PathBuf::from(&self.index),
            build_command: self.build_command.clone(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}
