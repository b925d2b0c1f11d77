//! Error types for fswalk
//!
//! This module defines the error hierarchy for:
//! - Filesystem access errors attached to individual walk entries
//! - Configuration and CLI errors
//! - Producer thread errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Per-node access errors are data carried on entries, not control flow
//! - Preserve error chains for debugging

use std::io;
use std::path::Path;
use thiserror::Error;

/// Top-level error type for fswalk
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Filesystem errors
    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Producer thread errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Failure to access a single filesystem node
///
/// Cloneable so an entry carrying it can be handed out by value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// Directory listing failed
    #[error("Failed to read directory '{path}': {reason}")]
    ReadDirFailed { path: String, reason: String },

    /// lstat failed
    #[error("Failed to stat '{path}': {reason}")]
    StatFailed { path: String, reason: String },

    /// Permission denied
    #[error("Permission denied: '{path}'")]
    PermissionDenied { path: String },

    /// Path not found
    #[error("Path not found: '{path}'")]
    NotFound { path: String },
}

/// Which operation produced an I/O error, for mapping into [`FsError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    ReadDir,
    Stat,
}

impl FsError {
    /// Map an `io::Error` raised while accessing `path`. The path is kept
    /// in display form; the walk entry carries the exact one.
    pub fn from_io(op: FsOp, path: &Path, err: &io::Error) -> Self {
        let path = path.display();
        match err.kind() {
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: path.to_string(),
            },
            io::ErrorKind::NotFound => FsError::NotFound {
                path: path.to_string(),
            },
            _ => match op {
                FsOp::ReadDir => FsError::ReadDirFailed {
                    path: path.to_string(),
                    reason: err.to_string(),
                },
                FsOp::Stat => FsError::StatFailed {
                    path: path.to_string(),
                    reason: err.to_string(),
                },
            },
        }
    }

    /// Path of the node that failed
    pub fn path(&self) -> &str {
        match self {
            FsError::ReadDirFailed { path, .. } => path,
            FsError::StatFailed { path, .. } => path,
            FsError::PermissionDenied { path } => path,
            FsError::NotFound { path } => path,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FsError::PermissionDenied { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root path missing or empty
    #[error("Invalid root path '{path}': {reason}")]
    InvalidRoot { path: String, reason: String },

    /// Invalid prune pattern
    #[error("Invalid prune pattern '{pattern}': {reason}")]
    InvalidPrunePattern { pattern: String, reason: String },

    /// Entry limit of zero
    #[error("Invalid entry limit {limit}: must be at least 1")]
    InvalidMaxEntries { limit: usize },
}

/// Producer thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Could not spawn the traversal thread
    #[error("Failed to spawn traversal thread: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Traversal thread panicked
    #[error("Traversal thread panicked: {message}")]
    Panicked { message: String },
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for FsError
pub type FsResult<T> = std::result::Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_kinds() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let err = FsError::from_io(FsOp::ReadDir, Path::new("/secret"), &denied);
        assert!(err.is_permission_denied());
        assert_eq!(err.path(), "/secret");

        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(FsError::from_io(FsOp::Stat, Path::new("/gone"), &missing).is_not_found());

        let other = io::Error::new(io::ErrorKind::Other, "boom");
        match FsError::from_io(FsOp::Stat, Path::new("/x"), &other) {
            FsError::StatFailed { path, reason } => {
                assert_eq!(path, "/x");
                assert!(reason.contains("boom"));
            }
            e => panic!("unexpected error: {e:?}"),
        }
        assert!(matches!(
            FsError::from_io(FsOp::ReadDir, Path::new("/x"), &other),
            FsError::ReadDirFailed { .. }
        ));
    }

    #[test]
    fn test_error_conversion() {
        let fs_err = FsError::NotFound {
            path: "/missing".into(),
        };
        let walker_err: WalkerError = fs_err.into();
        assert!(matches!(walker_err, WalkerError::Fs(_)));

        let cfg_err = ConfigError::InvalidMaxEntries { limit: 0 };
        let walker_err: WalkerError = cfg_err.into();
        assert!(walker_err.to_string().contains("at least 1"));
    }
}
