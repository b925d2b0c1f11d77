//! Recursive pre-order traversal
//!
//! This is the primitive the background producer runs. It visits the root
//! first, then each directory's children in lexical order, descending
//! depth-first. Symbolic links are reported but never followed.
//!
//! Every visited node goes through a single callback which decides how the
//! walk proceeds:
//!
//! ```text
//! lstat(root) ──► visit(root) ──► Continue ──► for name in read_dir(root):
//!                      │                           lstat(root/name) ──► visit(child) ...
//!                      ├──► SkipDir ──► children of this node are not visited
//!                      └──► Stop    ──► the whole walk ends, nothing else is visited
//! ```
//!
//! A directory is listed before it is visited so that a listing failure
//! can be reported on the directory's own visit. A directory whose lstat
//! failed is never listed. Listing yields names only; each child is
//! stat'ed once, right before its own visit.

use crate::error::FsError;
use crate::fs::{FileSystem, Metadata};
use std::path::Path;
use tracing::{debug, trace};

/// What the visit callback wants done next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Proceed normally, descending into directories
    Continue,
    /// Do not descend into the node just visited. Same as `Continue` for
    /// non-directories.
    SkipDir,
    /// End the whole traversal
    Stop,
}

/// How a traversal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every reachable node was visited
    Finished,
    /// The callback returned [`WalkControl::Stop`]
    Stopped,
}

/// Walk the tree rooted at `root`, calling `visit` for every node.
///
/// The callback receives the node path, its metadata if lstat succeeded,
/// and the access error if any. Errors never abort the walk; a directory
/// that cannot be listed simply has no children.
pub fn walk<F, V>(fs: &F, root: &Path, mut visit: V) -> Completion
where
    F: FileSystem + ?Sized,
    V: FnMut(&Path, Option<&Metadata>, Option<&FsError>) -> WalkControl,
{
    let flow = match fs.lstat(root) {
        Ok(meta) => walk_node(fs, root, &meta, &mut visit),
        Err(e) => {
            debug!("Cannot stat walk root {}: {}", root.display(), e);
            visit(root, None, Some(&e))
        }
    };

    match flow {
        WalkControl::Stop => Completion::Stopped,
        _ => Completion::Finished,
    }
}

/// Visit `path` and, if it is a directory the callback lets us enter, its
/// subtree. Returns `Stop` when the walk must end, `Continue` otherwise.
fn walk_node<F, V>(fs: &F, path: &Path, meta: &Metadata, visit: &mut V) -> WalkControl
where
    F: FileSystem + ?Sized,
    V: FnMut(&Path, Option<&Metadata>, Option<&FsError>) -> WalkControl,
{
    trace!("visit {} ({})", path.display(), meta.entry_type);

    if !meta.is_dir() {
        return match visit(path, Some(meta), None) {
            WalkControl::Stop => WalkControl::Stop,
            _ => WalkControl::Continue,
        };
    }

    let (children, list_err) = match fs.read_dir(path) {
        Ok(children) => (children, None),
        Err(e) => {
            debug!("Cannot list {}: {}", path.display(), e);
            (Vec::new(), Some(e))
        }
    };

    match visit(path, Some(meta), list_err.as_ref()) {
        WalkControl::Stop => {
            debug!("Walk stopped at {}", path.display());
            return WalkControl::Stop;
        }
        WalkControl::SkipDir => {
            debug!("Skipping subtree {}", path.display());
            return WalkControl::Continue;
        }
        WalkControl::Continue => {}
    }

    for name in &children {
        let child_path = fs.join(path, name);

        let flow = match fs.lstat(&child_path) {
            Ok(child_meta) => walk_node(fs, &child_path, &child_meta, visit),
            Err(e) => {
                debug!("Cannot stat {}: {}", child_path.display(), e);
                match visit(&child_path, None, Some(&e)) {
                    WalkControl::Stop => WalkControl::Stop,
                    _ => WalkControl::Continue,
                }
            }
        };

        if flow == WalkControl::Stop {
            return WalkControl::Stop;
        }
    }

    WalkControl::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn lossy(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn collect(fs: &MemoryFileSystem, root: &str) -> Vec<String> {
        let mut paths = Vec::new();
        let end = walk(fs, Path::new(root), |path, _, _| {
            paths.push(lossy(path));
            WalkControl::Continue
        });
        assert_eq!(end, Completion::Finished);
        paths
    }

    #[test]
    fn test_preorder_lexical() {
        let fs = MemoryFileSystem::new()
            .add_file("r/z", 0)
            .add_file("r/b/y", 0)
            .add_file("r/b/x", 0)
            .add_dir("r/a");

        assert_eq!(
            collect(&fs, "r"),
            vec!["r", "r/a", "r/b", "r/b/x", "r/b/y", "r/z"]
        );
    }

    #[test]
    fn test_root_kept_verbatim() {
        let fs = MemoryFileSystem::new().add_file("r/f", 0);
        assert_eq!(collect(&fs, "r/"), vec!["r/", "r/f"]);
        assert_eq!(collect(&fs, "./r"), vec!["./r", "r/f"]);
    }

    #[test]
    fn test_single_file_root() {
        let fs = MemoryFileSystem::new().add_file("f", 10);
        assert_eq!(collect(&fs, "f"), vec!["f"]);
    }

    #[test]
    fn test_skip_dir() {
        let fs = MemoryFileSystem::new()
            .add_file("r/a/x", 0)
            .add_file("r/a/y", 0)
            .add_file("r/b", 0);

        let mut paths = Vec::new();
        walk(&fs, Path::new("r"), |path, _, _| {
            paths.push(lossy(path));
            if path == Path::new("r/a") {
                WalkControl::SkipDir
            } else {
                WalkControl::Continue
            }
        });
        assert_eq!(paths, vec!["r", "r/a", "r/b"]);
    }

    #[test]
    fn test_skip_dir_on_file_is_continue() {
        let fs = MemoryFileSystem::new()
            .add_file("r/a", 0)
            .add_file("r/b", 0);

        let mut paths = Vec::new();
        walk(&fs, Path::new("r"), |path, meta, _| {
            paths.push(lossy(path));
            if meta.is_some_and(|m| m.is_file()) {
                WalkControl::SkipDir
            } else {
                WalkControl::Continue
            }
        });
        assert_eq!(paths, vec!["r", "r/a", "r/b"]);
    }

    #[test]
    fn test_stop() {
        let fs = MemoryFileSystem::new()
            .add_file("r/a/x", 0)
            .add_file("r/b", 0);

        let mut paths = Vec::new();
        let end = walk(&fs, Path::new("r"), |path, _, _| {
            paths.push(lossy(path));
            if path == Path::new("r/a/x") {
                WalkControl::Stop
            } else {
                WalkControl::Continue
            }
        });
        assert_eq!(end, Completion::Stopped);
        assert_eq!(paths, vec!["r", "r/a", "r/a/x"]);
    }

    #[test]
    fn test_unreadable_dir_reported_and_not_descended() {
        let fs = MemoryFileSystem::new()
            .add_file("r/locked/secret", 0)
            .add_file("r/open", 0)
            .deny_read("r/locked");

        let mut seen = Vec::new();
        walk(&fs, Path::new("r"), |path, meta, err| {
            seen.push((
                lossy(path),
                meta.map(|m| m.is_dir()),
                err.map(|e| e.is_permission_denied()),
            ));
            WalkControl::Continue
        });

        assert_eq!(
            seen,
            vec![
                ("r".to_string(), Some(true), None),
                ("r/locked".to_string(), Some(true), Some(true)),
                ("r/open".to_string(), Some(false), None),
            ]
        );
    }

    #[test]
    fn test_stat_failure_has_no_metadata() {
        let fs = MemoryFileSystem::new()
            .add_file("r/hidden/x", 0)
            .add_file("r/z", 0)
            .fail_stat("r/hidden");

        let mut seen = Vec::new();
        walk(&fs, Path::new("r"), |path, meta, err| {
            seen.push((lossy(path), meta.is_some(), err.is_some()));
            WalkControl::Continue
        });

        assert_eq!(
            seen,
            vec![
                ("r".to_string(), true, false),
                ("r/hidden".to_string(), false, true),
                ("r/z".to_string(), true, false),
            ]
        );
    }

    #[test]
    fn test_missing_root() {
        let fs = MemoryFileSystem::new();
        let mut seen = Vec::new();
        let end = walk(&fs, Path::new("nope"), |path, meta, err| {
            seen.push((lossy(path), meta.is_some(), err.map(|e| e.is_not_found())));
            WalkControl::Continue
        });
        assert_eq!(end, Completion::Finished);
        assert_eq!(seen, vec![("nope".to_string(), false, Some(true))]);
    }

    #[test]
    fn test_symlink_not_followed() {
        // Something registered below a symlink node must stay unreachable
        let fs = MemoryFileSystem::new()
            .add_symlink("r/link")
            .add_file("r/link/inside", 0);

        let mut paths = Vec::new();
        walk(&fs, Path::new("r"), |path, meta, _| {
            paths.push((lossy(path), meta.map(|m| m.entry_type)));
            WalkControl::Continue
        });
        assert_eq!(
            paths,
            vec![
                ("r".to_string(), Some(crate::fs::EntryType::Directory)),
                ("r/link".to_string(), Some(crate::fs::EntryType::Symlink)),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_descended() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = Path::new(OsStr::from_bytes(b"r/bad\xff/inner"));
        let fs = MemoryFileSystem::new().add_file(raw, 1);

        let mut seen = Vec::new();
        walk(&fs, Path::new("r"), |path, meta, err| {
            seen.push((path.to_path_buf(), meta.map(|m| m.entry_type), err.is_some()));
            WalkControl::Continue
        });

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].0.as_os_str().as_bytes(), b"r/bad\xff");
        assert_eq!(seen[1].1, Some(crate::fs::EntryType::Directory));
        assert!(!seen[1].2);
        assert_eq!(seen[2].0, raw);
        assert_eq!(seen[2].1, Some(crate::fs::EntryType::File));
    }
}
