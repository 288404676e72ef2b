//! Directory tree helpers for the publish pipeline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Errors raised while copying a directory tree.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Remove a directory and everything under it.
///
/// Returns `Ok(false)` when there was nothing to remove.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Recursively copy `from` to `to`, creating `to` and any nested directories.
///
/// Symlinks are followed and their targets copied. Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize, CopyError> {
    let mut files = 0;

    for entry in WalkDir::new(from).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| CopyError::Walk {
            path: from.to_path_buf(),
            source,
        })?;

        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);

        let io_err = |source| CopyError::Io {
            from: entry.path().to_path_buf(),
            to: target.clone(),
            source,
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
            fs::copy(entry.path(), &target).map_err(io_err)?;
            tracing::debug!("Copied {}", relative.display());
            files += 1;
        }
    }

    Ok(files)
}
