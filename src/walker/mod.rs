//! Step-by-step filesystem walker
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │     Producer thread     │
//!                     │  - traverse::walk       │
//!                     │  - lstat / read_dir     │
//!                     └───────────┬─────────────┘
//!                                 │  Entry      (bounded 0)
//!                                 ▼
//!                     ┌─────────────────────────┐
//!                     │        Walker           │
//!                     │  - step / path / ...    │
//!                     │  - skip_dir / stop      │
//!                     └───────────┬─────────────┘
//!                                 │  Directive  (bounded 1)
//!                                 ▼
//!                          back to producer
//! ```

pub mod stepper;
pub mod traverse;

pub use stepper::{Directive, Entry, StopHandle, WalkStats, Walker};
pub use traverse::{Completion, WalkControl};

use crate::error::Result;
use std::path::PathBuf;

/// Start walking `root` on the local filesystem
pub fn walk(root: impl Into<PathBuf>) -> Result<Walker> {
    Walker::new(root)
}
