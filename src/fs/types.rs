//! Filesystem node types
//!
//! `Metadata` is the opaque node descriptor handed out with every walk
//! entry. It is produced by a [`FileSystem`](super::FileSystem) provider
//! and only needs to answer "is this a directory" for the walker itself.

use std::ffi::OsString;
use std::fmt;
use std::time::UNIX_EPOCH;

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryType {
    /// Regular file
    File = 0,
    /// Directory
    Directory = 1,
    /// Symbolic link
    Symlink = 2,
    /// Block device
    BlockDevice = 3,
    /// Character device
    CharDevice = 4,
    /// Named pipe (FIFO)
    Fifo = 5,
    /// Unix socket
    Socket = 6,
    /// Unknown type
    Unknown = 255,
}

impl EntryType {
    /// Convert from a std file type obtained without following links
    pub fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            return EntryType::Symlink;
        }
        if ft.is_dir() {
            return EntryType::Directory;
        }
        if ft.is_file() {
            return EntryType::File;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_block_device() {
                return EntryType::BlockDevice;
            }
            if ft.is_char_device() {
                return EntryType::CharDevice;
            }
            if ft.is_fifo() {
                return EntryType::Fifo;
            }
            if ft.is_socket() {
                return EntryType::Socket;
            }
        }

        EntryType::Unknown
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == EntryType::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == EntryType::Directory
    }

    /// Check if this is a symbolic link
    pub fn is_symlink(&self) -> bool {
        *self == EntryType::Symlink
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryType::File => "file",
            EntryType::Directory => "dir",
            EntryType::Symlink => "symlink",
            EntryType::BlockDevice => "block",
            EntryType::CharDevice => "char",
            EntryType::Fifo => "fifo",
            EntryType::Socket => "socket",
            EntryType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Descriptor of one filesystem node, as returned by lstat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Final path component (not full path), exactly as the filesystem
    /// returned it
    pub name: OsString,

    /// Entry type; symlinks are reported as `Symlink`, never as their target
    pub entry_type: EntryType,

    /// Size in bytes
    pub size: u64,

    /// Mode bits (type + permissions) when the platform provides them
    pub mode: Option<u32>,

    /// Last modification time (Unix timestamp)
    pub mtime: Option<i64>,

    /// Inode number when the platform provides it
    pub inode: Option<u64>,
}

impl Metadata {
    /// Minimal descriptor with just a name and type
    pub fn new(name: impl Into<OsString>, entry_type: EntryType) -> Self {
        Self {
            name: name.into(),
            entry_type,
            size: 0,
            mode: None,
            mtime: None,
            inode: None,
        }
    }

    /// Build from `std::fs::symlink_metadata` output
    pub fn from_std(name: impl Into<OsString>, meta: &std::fs::Metadata) -> Self {
        let mtime = meta.modified().ok().and_then(|t| {
            t.duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs() as i64)
        });

        #[cfg(unix)]
        let (mode, inode) = {
            use std::os::unix::fs::MetadataExt;
            (Some(meta.mode()), Some(meta.ino()))
        };
        #[cfg(not(unix))]
        let (mode, inode) = (None, None);

        Self {
            name: name.into(),
            entry_type: EntryType::from_file_type(meta.file_type()),
            size: meta.len(),
            mode,
            mtime,
            inode,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.entry_type.is_file()
    }

    pub fn is_symlink(&self) -> bool {
        self.entry_type.is_symlink()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_flags() {
        let dir = Metadata::new("d", EntryType::Directory);
        assert!(dir.is_dir());
        assert!(!dir.is_file());

        let link = Metadata::new("l", EntryType::Symlink);
        assert!(link.is_symlink());
        assert!(!link.is_dir());
    }

    #[test]
    fn test_from_std_keeps_name_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"abc").unwrap();

        let meta = Metadata::from_std("f", &std::fs::symlink_metadata(&file).unwrap());
        assert_eq!(meta.name, "f");
        assert!(meta.is_file());
        assert_eq!(meta.size, 3);
        assert!(meta.mtime.is_some());

        let meta = Metadata::from_std("d", &std::fs::symlink_metadata(dir.path()).unwrap());
        assert_eq!(meta.entry_type, EntryType::Directory);
        assert_eq!(meta.entry_type.to_string(), "dir");
    }
}
