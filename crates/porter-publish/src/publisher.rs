//! Docs publisher: rebuild the site and republish it as the docs directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Instant;

use crate::transform::normalize_index;
use crate::tree::{self, CopyError};

/// Configuration for a publish run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Site source directory, used as the build command's working directory
    pub site_dir: PathBuf,

    /// Bundler output directory, relative to `site_dir`
    pub build_dir: PathBuf,

    /// Published docs directory
    pub output_dir: PathBuf,

    /// Entry document, relative to `output_dir`
    pub index: PathBuf,

    /// Site build command: program followed by its arguments
    pub build_command: Vec<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("site"),
            build_dir: PathBuf::from("dist"),
            output_dir: PathBuf::from("docs"),
            index: PathBuf::from("index.html"),
            build_command: vec!["npm".to_string(), "run".to_string(), "build".to_string()],
        }
    }
}

/// Result of a successful publish run.
#[derive(Debug)]
pub struct PublishReport {
    /// Number of files copied into the output directory
    pub files: usize,

    /// Entry document size before normalization
    pub index_bytes_before: usize,

    /// Entry document size after normalization
    pub index_bytes_after: usize,

    /// Total run time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur while publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to clear {}: {source}", path.display())]
    Clear {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Build command is empty")]
    EmptyBuildCommand,

    #[error("Failed to run `{command}`: {source}")]
    BuildSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed with {status}")]
    BuildFailed { command: String, status: ExitStatus },

    #[error("Build output not found: {}", .0.display())]
    MissingBuildOutput(PathBuf),

    #[error("Output directory already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error(transparent)]
    CopyTree(#[from] CopyError),

    #[error("Failed to remove build output {}: {source}", path.display())]
    RemoveBuildOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ReadIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Entry document sizes around normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub bytes_before: usize,
    pub bytes_after: usize,
}

/// Docs publisher.
///
/// A run goes clear, build, relocate, transform. Each stage is also exposed on
/// its own; only [`Publisher::publish`] removes a half-written output directory
/// when a later stage fails.
pub struct Publisher {
    config: PublishConfig,
}

impl Publisher {
    /// Create a new publisher.
    pub fn new(config: PublishConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Directory the bundler writes into.
    pub fn build_output_dir(&self) -> PathBuf {
        self.config.site_dir.join(&self.config.build_dir)
    }

    /// Path of the published entry document.
    pub fn index_path(&self) -> PathBuf {
        self.config.output_dir.join(&self.config.index)
    }

    /// Run the whole pipeline.
    pub fn publish(&self) -> Result<PublishReport, PublishError> {
        let start = Instant::now();

        self.clear()?;
        self.build()?;
        self.check_relocate_target()?;

        let result = self
            .relocate()
            .and_then(|files| self.transform_index().map(|stats| (files, stats)));

        let (files, stats) = match result {
            Ok(done) => done,
            Err(e) => {
                self.rollback();
                return Err(e);
            }
        };

        let duration = start.elapsed();

        Ok(PublishReport {
            files,
            index_bytes_before: stats.bytes_before,
            index_bytes_after: stats.bytes_after,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Remove the output directory. Missing is fine.
    pub fn clear(&self) -> Result<(), PublishError> {
        let path = &self.config.output_dir;
        let removed = tree::remove_dir_if_exists(path).map_err(|source| PublishError::Clear {
            path: path.clone(),
            source,
        })?;

        if removed {
            tracing::info!("Cleared {}", path.display());
        } else {
            tracing::debug!("Nothing to clear at {}", path.display());
        }

        Ok(())
    }

    /// Run the site build command inside the site directory.
    pub fn build(&self) -> Result<(), PublishError> {
        let (program, args) = self
            .config
            .build_command
            .split_first()
            .ok_or(PublishError::EmptyBuildCommand)?;
        let command = self.config.build_command.join(" ");

        tracing::info!(
            "Building site: `{}` in {}",
            command,
            self.config.site_dir.display()
        );

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.config.site_dir)
            .status()
            .map_err(|source| PublishError::BuildSpawn {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PublishError::BuildFailed { command, status });
        }

        Ok(())
    }

    /// Copy the build output to the output directory, then delete the build output.
    ///
    /// Returns the number of files copied.
    pub fn relocate(&self) -> Result<usize, PublishError> {
        self.check_relocate_target()?;

        let from = self.build_output_dir();
        let to = &self.config.output_dir;

        // Copy then remove rather than rename: the two may sit on different filesystems.
        let files = tree::copy_tree(&from, to)?;
        fs::remove_dir_all(&from).map_err(|source| PublishError::RemoveBuildOutput {
            path: from.clone(),
            source,
        })?;

        tracing::info!(
            "Relocated {} files from {} to {}",
            files,
            from.display(),
            to.display()
        );

        Ok(files)
    }

    /// Normalize the entry document in place.
    pub fn transform_index(&self) -> Result<IndexStats, PublishError> {
        let path = self.index_path();

        let source = fs::read_to_string(&path).map_err(|source| PublishError::ReadIndex {
            path: path.clone(),
            source,
        })?;
        let normalized = normalize_index(&source);

        fs::write(&path, &normalized).map_err(|source| PublishError::WriteIndex {
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            "Normalized {} ({} -> {} bytes)",
            path.display(),
            source.len(),
            normalized.len()
        );

        Ok(IndexStats {
            bytes_before: source.len(),
            bytes_after: normalized.len(),
        })
    }

    fn check_relocate_target(&self) -> Result<(), PublishError> {
        let from = self.build_output_dir();
        if !from.is_dir() {
            return Err(PublishError::MissingBuildOutput(from));
        }
        if self.config.output_dir.exists() {
            return Err(PublishError::OutputExists(self.config.output_dir.clone()));
        }
        Ok(())
    }

    fn rollback(&self) {
        let path: &Path = &self.config.output_dir;
        match tree::remove_dir_if_exists(path) {
            Ok(true) => tracing::warn!("Removed partially published {}", path.display()),
            Ok(false) => {}
            Err(e) => tracing::warn!(
                "Failed to remove partially published {}: {}",
                path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::snapshot;
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    /// A project root with `site/` and a publisher pointed at it.
    fn project(build_script: &str) -> (TempDir, Publisher) {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("site")).unwrap();

        let publisher = Publisher::new(PublishConfig {
            site_dir: temp.path().join("site"),
            output_dir: temp.path().join("docs"),
            build_command: vec!["sh".to_string(), "-c".to_string(), build_script.to_string()],
            ..Default::default()
        });

        (temp, publisher)
    }

    fn write_dist(root: &Path, files: &[(&str, &str)]) {
        for (path, content) in files {
            let target = root.join("site/dist").join(path);
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(target, content).unwrap();
        }
    }

    #[test]
    fn clear_on_missing_output_is_a_no_op() {
        let (temp, publisher) = project("true");

        publisher.clear().unwrap();
        publisher.clear().unwrap();

        assert!(!temp.path().join("docs").exists());
    }

    #[test]
    fn clear_removes_existing_output() {
        let (temp, publisher) = project("true");
        fs::create_dir_all(temp.path().join("docs/old")).unwrap();
        fs::write(temp.path().join("docs/old/stale.html"), "stale").unwrap();

        publisher.clear().unwrap();

        assert!(!temp.path().join("docs").exists());
    }

    #[test]
    fn relocate_mirrors_build_output() {
        let (temp, publisher) = project("true");
        write_dist(
            temp.path(),
            &[
                ("index.html", "<html>\n</html>\n"),
                ("assets/app.js", "console.log('hi');"),
                ("guide/deep/page.html", "<p>deep</p>"),
            ],
        );
        let expected = snapshot(&temp.path().join("site/dist"));

        let files = publisher.relocate().unwrap();

        assert_eq!(files, 3);
        assert_eq!(snapshot(&temp.path().join("docs")), expected);
        assert!(!temp.path().join("site/dist").exists());
    }

    #[test]
    fn relocate_refuses_existing_output() {
        let (temp, publisher) = project("true");
        write_dist(temp.path(), &[("index.html", "x")]);
        fs::create_dir_all(temp.path().join("docs")).unwrap();

        let err = publisher.relocate().unwrap_err();

        assert!(matches!(err, PublishError::OutputExists(_)));
        assert!(temp.path().join("site/dist/index.html").exists());
    }

    #[test]
    fn relocate_requires_build_output() {
        let (_temp, publisher) = project("true");

        let err = publisher.relocate().unwrap_err();

        assert!(matches!(err, PublishError::MissingBuildOutput(_)));
    }

    #[test]
    fn transform_rewrites_index_in_place() {
        let (temp, publisher) = project("true");
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/index.html"), "<a\nhref=/>\n").unwrap();

        let stats = publisher.transform_index().unwrap();

        let html = fs::read_to_string(temp.path().join("docs/index.html")).unwrap();
        assert_eq!(html, "<ahref=>");
        assert_eq!(stats.bytes_before, 11);
        assert_eq!(stats.bytes_after, 8);
    }

    #[test]
    fn transform_fails_without_index() {
        let (temp, publisher) = project("true");
        fs::create_dir_all(temp.path().join("docs")).unwrap();

        let err = publisher.transform_index().unwrap_err();

        assert!(matches!(err, PublishError::ReadIndex { .. }));
    }

    #[test]
    fn empty_build_command_is_rejected() {
        let publisher = Publisher::new(PublishConfig {
            build_command: Vec::new(),
            ..Default::default()
        });

        assert!(matches!(
            publisher.build().unwrap_err(),
            PublishError::EmptyBuildCommand
        ));
    }

    #[cfg(unix)]
    #[test]
    fn publishes_site_end_to_end() {
        let (temp, publisher) = project(
            "mkdir -p dist/assets \
             && printf '<html>\\n<a src=/>\\n</a>\\n</html>' > dist/index.html \
             && printf 'app' > dist/assets/app.js",
        );
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs/stale.html"), "old").unwrap();

        let report = publisher.publish().unwrap();

        let docs = temp.path().join("docs");
        assert_eq!(report.files, 2);
        assert_eq!(
            fs::read_to_string(docs.join("index.html")).unwrap(),
            "<html><a src=></a></html>"
        );
        assert_eq!(fs::read_to_string(docs.join("assets/app.js")).unwrap(), "app");
        assert!(!docs.join("stale.html").exists());
        assert!(!temp.path().join("site/dist").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_build_stops_before_relocate() {
        let (temp, publisher) = project("mkdir -p dist && echo x > dist/index.html && exit 3");

        let err = publisher.publish().unwrap_err();

        assert!(matches!(err, PublishError::BuildFailed { .. }));
        assert!(!temp.path().join("docs").exists());
        assert!(temp.path().join("site/dist").exists());
    }

    #[cfg(unix)]
    #[test]
    fn build_without_output_is_reported() {
        let (temp, publisher) = project("true");

        let err = publisher.publish().unwrap_err();

        assert!(matches!(err, PublishError::MissingBuildOutput(_)));
        assert!(!temp.path().join("docs").exists());
    }

    #[cfg(unix)]
    #[test]
    fn missing_index_rolls_back_output() {
        let (temp, publisher) = project("mkdir -p dist && echo x > dist/other.html");

        let err = publisher.publish().unwrap_err();

        assert!(matches!(err, PublishError::ReadIndex { .. }));
        assert!(!temp.path().join("docs").exists());
    }

    #[test]
    fn missing_build_tool_is_a_spawn_error() {
        let (_temp, mut publisher) = project("true");
        publisher.config.build_command = vec!["porter-no-such-bundler".to_string()];

        let err = publisher.build().unwrap_err();

        assert!(matches!(err, PublishError::BuildSpawn { .. }));
    }
}
