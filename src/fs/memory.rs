//! In-memory directory entry provider
//!
//! Paths are cleaned on insert and lookup, so `"d/"`, `"d/."` and `"d"` all
//! name the same node. Parents are created on demand. Access failures can
//! be injected per node with [`MemoryFileSystem::deny_read`] and
//! [`MemoryFileSystem::fail_stat`].

use super::path::clean;
use super::{EntryType, FileSystem, Metadata};
use crate::error::{FsError, FsResult};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct MemNode {
    entry_type: EntryType,
    size: u64,
    children: BTreeSet<OsString>,
}

/// In-memory filesystem tree
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    nodes: BTreeMap<PathBuf, MemNode>,
    unreadable: HashSet<PathBuf>,
    unstatable: HashSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory (and any missing parents)
    pub fn add_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), EntryType::Directory, 0);
        self
    }

    /// Add a regular file (and any missing parent directories)
    pub fn add_file(mut self, path: impl AsRef<Path>, size: u64) -> Self {
        self.insert(path.as_ref(), EntryType::File, size);
        self
    }

    /// Add a symbolic link node; it is never resolved
    pub fn add_symlink(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), EntryType::Symlink, 0);
        self
    }

    /// Make listing `path` fail with permission denied
    pub fn deny_read(mut self, path: impl AsRef<Path>) -> Self {
        self.unreadable.insert(clean(path.as_ref()));
        self
    }

    /// Make lstat on `path` fail with permission denied
    pub fn fail_stat(mut self, path: impl AsRef<Path>) -> Self {
        self.unstatable.insert(clean(path.as_ref()));
        self
    }

    fn insert(&mut self, path: &Path, entry_type: EntryType, size: u64) {
        let path = clean(path);

        if let Some((parent, name)) = split_parent(&path) {
            if !self.nodes.contains_key(parent) {
                self.insert(parent, EntryType::Directory, 0);
            }
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.insert(name.to_os_string());
            }
        }

        let node = self.nodes.entry(path).or_insert_with(|| MemNode {
            entry_type,
            size,
            children: BTreeSet::new(),
        });
        node.entry_type = entry_type;
        node.size = size;
    }
}

/// Split a cleaned path into (parent, name); `None` for top-level names
fn split_parent(path: &Path) -> Option<(&Path, &OsStr)> {
    let name = path.file_name()?;
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    Some((parent, name))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

impl FileSystem for MemoryFileSystem {
    fn read_dir(&self, path: &Path) -> FsResult<Vec<OsString>> {
        let key = clean(path);

        if self.unreadable.contains(&key) {
            return Err(FsError::PermissionDenied {
                path: display(path),
            });
        }

        let node = self.nodes.get(&key).ok_or_else(|| FsError::NotFound {
            path: display(path),
        })?;

        if !node.entry_type.is_dir() {
            return Err(FsError::ReadDirFailed {
                path: display(path),
                reason: "not a directory".into(),
            });
        }

        Ok(node.children.iter().cloned().collect())
    }

    fn lstat(&self, path: &Path) -> FsResult<Metadata> {
        let key = clean(path);

        if self.unstatable.contains(&key) {
            return Err(FsError::PermissionDenied {
                path: display(path),
            });
        }

        let node = self.nodes.get(&key).ok_or_else(|| FsError::NotFound {
            path: display(path),
        })?;

        let name = key.file_name().unwrap_or(key.as_os_str());
        Ok(Metadata::new(name, node.entry_type).with_size(node.size))
    }
}
