//! Directory entry providers
//!
//! The walker never touches `std::fs` directly. It consumes a
//! [`FileSystem`], which lists directories and stats nodes without
//! following symbolic links:
//!
//! - [`OsFileSystem`]: the local filesystem via `std::fs`
//! - [`MemoryFileSystem`]: an in-memory tree, mostly for tests and benches
//!
//! Names and paths are `OsStr`/`Path` end to end, so a name that is not
//! valid UTF-8 is listed, joined and stat'ed exactly as the OS returned it.

pub mod memory;
pub mod path;
pub mod types;

pub use memory::MemoryFileSystem;
pub use path::{clean, join};
pub use types::{EntryType, Metadata};

use crate::error::{FsError, FsOp, FsResult};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// The set of filesystem operations the walker needs
pub trait FileSystem: Send + 'static {
    /// Names in the directory at `path`, sorted in byte-lexical order.
    /// `.` and `..` are never included.
    fn read_dir(&self, path: &Path) -> FsResult<Vec<OsString>>;

    /// Describe the node at `path`. If it is a symbolic link, the link
    /// itself is described; the target is never consulted.
    fn lstat(&self, path: &Path) -> FsResult<Metadata>;

    /// Path of the child `name` inside directory `dir`
    fn join(&self, dir: &Path, name: &OsStr) -> PathBuf {
        join(&[dir.as_os_str(), name])
    }
}

/// The local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> FsResult<Vec<OsString>> {
        let rd = std::fs::read_dir(path).map_err(|e| FsError::from_io(FsOp::ReadDir, path, &e))?;

        let mut names = rd
            .map(|dent| {
                dent.map(|d| d.file_name())
                    .map_err(|e| FsError::from_io(FsOp::ReadDir, path, &e))
            })
            .collect::<FsResult<Vec<_>>>()?;

        names.sort_by(|a, b| a.as_encoded_bytes().cmp(b.as_encoded_bytes()));
        Ok(names)
    }

    fn lstat(&self, path: &Path) -> FsResult<Metadata> {
        let meta =
            std::fs::symlink_metadata(path).map_err(|e| FsError::from_io(FsOp::Stat, path, &e))?;

        let name = path
            .file_name()
            .unwrap_or_else(|| path.as_os_str())
            .to_os_string();

        Ok(Metadata::from_std(name, &meta))
    }
}
