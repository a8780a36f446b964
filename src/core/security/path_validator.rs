use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur while validating a local file for upload
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' is not allowed")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("Upload root '{root}' is not accessible: {error}")]
    RootUnavailable { root: PathBuf, error: io::Error },

    #[error("Path is not a regular file: '{path}'")]
    NotAFile { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Resolves a caller-supplied path to a local file that may be uploaded.
///
/// The path must exist and name a regular file. When a root directory is
/// configured, the canonical path must lie within it, and symlinks are only
/// followed if the configuration allows them.
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env();
/// let file = validate_upload_path("/srv/uploads/logo.png", &config.security)?;
/// ```
pub fn validate_upload_path(
    input_path: &str,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);

    if !path.exists() {
        return Err(PathSecurityError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(PathSecurityError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let canonical_path = canonicalize(path)?;

    let Some(ref root) = security.root_path else {
        return Ok(canonical_path);
    };

    let canonical_root = root
        .canonicalize()
        .map_err(|error| PathSecurityError::RootUnavailable {
            root: root.clone(),
            error,
        })?;

    if path.is_symlink() && !security.allow_symlinks {
        return Err(PathSecurityError::SymlinkNotAllowed {
            path: path.to_path_buf(),
        });
    }

    if !canonical_path.starts_with(&canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

fn canonicalize(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
