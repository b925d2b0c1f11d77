//! Step-by-step walker over a background traversal
//!
//! The traversal in [`super::traverse`] is recursive and callback driven.
//! `Walker` turns it into a pull-based sequence by running it on its own
//! thread and handing entries over one at a time:
//!
//! ```text
//!   producer thread                              caller thread
//!   ───────────────                              ─────────────
//!   visit(node) ──► entry_tx ═══ bounded(0) ═══► step() stores current
//!        │                                            │
//!        │                                      path()/metadata()/error()
//!        │                                      skip_dir() / stop()
//!        ▼                                            │
//!   directive_rx ◄══ bounded(1) ══ directive_tx ◄── next step() posts
//!        │                                          the pending directive
//!        ▼
//!   Continue / SkipDir / Stop
//! ```
//!
//! The entry channel is a rendezvous, so the producer blocks on every node
//! until the caller takes it, then blocks again until the directive for
//! that node arrives. It never computes node N+1 before knowing what to do
//! with node N.
//!
//! The directive channel has one slot so that a stop can be posted at any
//! time without blocking, whether or not the producer is waiting for it.
//! When the slot is already full the new directive is dropped: the slot
//! can only be full with a stop, and the first stop wins.
//!
//! Dropping a `Walker` posts a stop and disconnects the entry channel, so
//! a producer blocked on either side exits and an abandoned walker does
//! not leave a thread behind. Draining to `false` or calling
//! [`Walker::stop`] releases the producer as soon as possible and lets
//! [`Walker::into_stats`] join it.

use super::traverse::{self, Completion, WalkControl};
use crate::error::{FsError, Result, WorkerError};
use crate::fs::{FileSystem, Metadata, OsFileSystem};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// One visited filesystem node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path of the node, prefixed by the root the walk was started with.
    /// Names are kept exactly as the filesystem returned them.
    pub path: PathBuf,

    /// lstat result, absent when stat failed
    pub metadata: Option<Metadata>,

    /// Access error for this node, if any
    pub error: Option<FsError>,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.is_dir())
    }
}

/// Instruction sent back to the producer for the node it just delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    #[default]
    Continue,
    SkipSubtree,
    Stop,
}

/// Counters for the entries delivered so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub dirs: u64,
    pub files: u64,
    pub symlinks: u64,
    pub others: u64,
    /// Entries whose lstat failed, so their type is unknown
    pub unknown: u64,
    pub errors: u64,
    pub bytes: u64,
    pub skipped: u64,
    pub completed: bool,
}

impl WalkStats {
    fn record(&mut self, entry: &Entry) {
        if entry.error.is_some() {
            self.errors += 1;
        }

        match &entry.metadata {
            Some(m) if m.is_dir() => self.dirs += 1,
            Some(m) if m.is_file() => {
                self.files += 1;
                self.bytes += m.size;
            }
            Some(m) if m.is_symlink() => self.symlinks += 1,
            Some(_) => self.others += 1,
            None => self.unknown += 1,
        }
    }

    /// Total number of entries delivered
    pub fn entries(&self) -> u64 {
        self.dirs + self.files + self.symlinks + self.others + self.unknown
    }
}

/// Cloneable, thread-safe way to stop a [`Walker`]
///
/// Useful from a signal handler or another thread while the owning thread
/// is blocked in [`Walker::step`]. A step already in flight may still
/// deliver one entry; every step after that returns `false`.
#[derive(Debug, Clone)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
    directive_tx: Sender<Directive>,
}

impl StopHandle {
    /// Request that the walk end. Never blocks; safe to call repeatedly.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        match self.directive_tx.try_send(Directive::Stop) {
            Ok(()) => trace!("Stop posted"),
            // Only a stop can already be queued
            Err(TrySendError::Full(_)) => trace!("Stop already pending"),
            Err(TrySendError::Disconnected(_)) => trace!("Producer already gone"),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Pull-based iterator over a filesystem tree
///
/// Entries arrive in pre-order with each directory's children in byte
/// lexical order. Symbolic links are never followed.
///
/// ```no_run
/// let mut walker = fswalk::walk("src")?;
/// while walker.step() {
///     if walker.path().ends_with("target") {
///         walker.skip_dir();
///         continue;
///     }
///     println!("{}", walker.path().display());
/// }
/// # Ok::<(), fswalk::WalkerError>(())
/// ```
pub struct Walker {
    entry_rx: Option<Receiver<Entry>>,
    directive_tx: Sender<Directive>,
    current: Option<Entry>,
    pending: Directive,
    stopped: Arc<AtomicBool>,
    exhausted: bool,
    producer: Option<JoinHandle<Completion>>,
    panic: Option<String>,
    stats: WalkStats,
}

impl Walker {
    /// Start walking `root` on the local filesystem
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_fs(OsFileSystem::new(), root)
    }

    /// Start walking `root` on the given filesystem.
    ///
    /// Returns as soon as the producer thread is running; the first entry
    /// is only waited for by the first [`step`](Self::step).
    pub fn with_fs<F: FileSystem>(fs: F, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        let (entry_tx, entry_rx) = bounded::<Entry>(0);
        let (directive_tx, directive_rx) = bounded::<Directive>(1);

        debug!("Starting walk of {}", root.display());

        let producer = thread::Builder::new()
            .name("fswalk-producer".to_string())
            .spawn(move || producer_loop(fs, root, entry_tx, directive_rx))
            .map_err(WorkerError::SpawnFailed)?;

        Ok(Self {
            entry_rx: Some(entry_rx),
            directive_tx,
            current: None,
            pending: Directive::Continue,
            stopped: Arc::new(AtomicBool::new(false)),
            exhausted: false,
            producer: Some(producer),
            panic: None,
            stats: WalkStats::default(),
        })
    }

    /// Advance to the next entry.
    ///
    /// Returns `false` once the tree is exhausted or the walk was stopped,
    /// and keeps returning `false` from then on. This is the only method
    /// that blocks.
    pub fn step(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        if self.is_stopped() {
            self.finish();
            return false;
        }

        if self.current.is_some() {
            let directive = std::mem::take(&mut self.pending);
            if directive == Directive::SkipSubtree {
                self.stats.skipped += 1;
            }
            // A full slot holds a stop posted from a StopHandle, which wins
            let _ = self.directive_tx.try_send(directive);
        }

        let received = match &self.entry_rx {
            Some(rx) => rx.recv().ok(),
            None => None,
        };

        match received {
            Some(entry) => {
                trace!("step -> {}", entry.path.display());
                self.stats.record(&entry);
                self.current = Some(entry);
                true
            }
            None => {
                self.stats.completed = !self.is_stopped();
                self.finish();
                false
            }
        }
    }

    /// Path of the current entry, empty when there is none
    pub fn path(&self) -> &Path {
        self.current
            .as_ref()
            .map(|e| e.path.as_path())
            .unwrap_or(Path::new(""))
    }

    /// Metadata of the current entry, `None` if there is no current entry
    /// or its lstat failed
    pub fn metadata(&self) -> Option<&Metadata> {
        self.current.as_ref().and_then(|e| e.metadata.as_ref())
    }

    /// Access error for the current entry. A directory that reports an
    /// error here is not descended into.
    pub fn error(&self) -> Option<&FsError> {
        self.current.as_ref().and_then(|e| e.error.as_ref())
    }

    /// The current entry as a whole
    pub fn entry(&self) -> Option<&Entry> {
        self.current.as_ref()
    }

    /// Do not descend into the current directory.
    ///
    /// Takes effect on the next [`step`](Self::step), which moves on to the
    /// next sibling (or an ancestor's sibling). No effect unless the
    /// current entry is a directory.
    pub fn skip_dir(&mut self) {
        if self.current.as_ref().is_some_and(Entry::is_dir) {
            self.pending = Directive::SkipSubtree;
        }
    }

    /// Stop visiting entries. Every later [`step`](Self::step) returns
    /// `false`. Never blocks, may be called any number of times, including
    /// before the first step. Takes precedence over [`skip_dir`](Self::skip_dir).
    pub fn stop(&mut self) {
        self.stop_handle().stop();
    }

    /// Handle that can stop this walk from another thread
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stopped: Arc::clone(&self.stopped),
            directive_tx: self.directive_tx.clone(),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Counters for the entries delivered so far
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Stop the walk if still running, wait for the producer thread and
    /// return the final counters.
    pub fn into_stats(mut self) -> Result<WalkStats> {
        if !self.exhausted {
            self.stop();
            self.finish();
        }

        match self.panic.take() {
            Some(message) => Err(WorkerError::Panicked { message }.into()),
            None => Ok(std::mem::take(&mut self.stats)),
        }
    }

    /// Move to the terminal state and reap the producer
    fn finish(&mut self) {
        self.current = None;
        self.exhausted = true;

        if self.is_stopped() {
            // The producer may be waiting for the directive of its last
            // entry; the slot is empty or already holds a stop.
            let _ = self.directive_tx.try_send(Directive::Stop);
        }
        // Unblocks a producer waiting to hand over an entry
        self.entry_rx = None;

        if let Some(handle) = self.producer.take() {
            match handle.join() {
                Ok(completion) => debug!("Walk ended: {:?}", completion),
                Err(payload) => {
                    let message = panic_message(&*payload);
                    warn!("Traversal thread panicked: {}", message);
                    self.panic = Some(message);
                }
            }
        }
    }
}

impl Drop for Walker {
    fn drop(&mut self) {
        if !self.exhausted {
            // A live StopHandle keeps the directive channel connected, so
            // release a producer waiting on it explicitly.
            self.stopped.store(true, Ordering::SeqCst);
            let _ = self.directive_tx.try_send(Directive::Stop);
        }
    }
}

impl Iterator for Walker {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        if self.step() {
            self.current.clone()
        } else {
            None
        }
    }
}

/// Producer thread body: run the traversal, handing each node to the walker
fn producer_loop<F: FileSystem>(
    fs: F,
    root: PathBuf,
    entry_tx: Sender<Entry>,
    directive_rx: Receiver<Directive>,
) -> Completion {
    let completion = traverse::walk(&fs, &root, |path, metadata, error| {
        let entry = Entry {
            path: path.to_path_buf(),
            metadata: metadata.cloned(),
            error: error.cloned(),
        };

        if entry_tx.send(entry).is_err() {
            // Walker dropped or finished
            return WalkControl::Stop;
        }

        match directive_rx.recv() {
            Ok(Directive::Continue) => WalkControl::Continue,
            Ok(Directive::SkipSubtree) => WalkControl::SkipDir,
            Ok(Directive::Stop) | Err(_) => WalkControl::Stop,
        }
    });

    debug!("Producer for {} done: {:?}", root.display(), completion);
    completion
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
