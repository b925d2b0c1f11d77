//! fswalk - Step-by-Step Filesystem Walker
//!
//! Walks a directory tree one entry at a time with an interface patterned
//! after "advance, then inspect": call [`Walker::step`], then look at
//! [`Walker::path`], [`Walker::metadata`] and [`Walker::error`].
//!
//! # Features
//!
//! - **Deterministic order**: root first, then pre-order depth-first with
//!   each directory's children in byte-lexical order.
//!
//! - **No symlink following**: links are reported as links and never
//!   descended into.
//!
//! - **Pruning and early exit**: [`Walker::skip_dir`] drops the current
//!   directory's subtree, [`Walker::stop`] (or a [`StopHandle`] from any
//!   thread) ends the walk.
//!
//! - **Errors as data**: a node that cannot be stat'ed or listed is still
//!   delivered, carrying its [`FsError`]; the walk goes on.
//!
//! - **Pluggable filesystem**: the traversal reads through the
//!   [`FileSystem`] trait; [`OsFileSystem`] and [`MemoryFileSystem`] are
//!   provided.
//!
//! # Architecture
//!
//! The traversal runs on a background thread and hands entries over
//! through a rendezvous channel, waiting for a directive after each one.
//! See [`walker::stepper`] for the protocol.
//!
//! # Example
//!
//! ```bash
//! # List a tree
//! fswalk ./src
//!
//! # Prune build output and stop after 1000 entries
//! fswalk . --prune '/target$' --max-entries 1000
//!
//! # Only print totals
//! fswalk /data --summary
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod progress;
pub mod walker;

pub use config::{CliArgs, WalkConfig};
pub use error::{FsError, Result, WalkerError};
pub use fs::{EntryType, FileSystem, MemoryFileSystem, Metadata, OsFileSystem};
pub use walker::{walk, Entry, StopHandle, WalkStats, Walker};
