//! Configuration types for fswalk
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Step through a directory tree in lexical pre-order
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fswalk",
    version,
    about = "Step through a directory tree in lexical pre-order",
    long_about = "Walks a directory tree one entry at a time, root first, children in \
                  byte-lexical order. Symbolic links are listed but never followed.",
    after_help = "EXAMPLES:\n    \
        fswalk ./src\n    \
        fswalk . --prune '/target$' --prune '/\\.git$'\n    \
        fswalk /data --max-entries 1000 --show-errors\n    \
        fswalk /data --summary"
)]
pub struct CliArgs {
    /// Directory (or file) to walk
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Do not descend into directories whose path matches (can be repeated)
    #[arg(long = "prune", value_name = "REGEX", action = clap::ArgAction::Append)]
    pub prune_patterns: Vec<String>,

    /// Stop after this many entries
    #[arg(short = 'n', long, value_name = "NUM")]
    pub max_entries: Option<usize>,

    /// Only print directories
    #[arg(long)]
    pub dirs_only: bool,

    /// Print totals with a progress spinner instead of listing entries
    #[arg(short = 's', long)]
    pub summary: bool,

    /// Print per-entry access errors to stderr
    #[arg(long)]
    pub show_errors: bool,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Walk root, passed to the walker verbatim
    pub root: PathBuf,

    /// Compiled prune patterns
    pub prune_patterns: Vec<Regex>,

    /// Entry limit
    pub max_entries: Option<usize>,

    /// Only print directories
    pub dirs_only: bool,

    /// Summary mode
    pub summary: bool,

    /// Show progress indicator (summary mode only)
    pub show_progress: bool,

    /// Report per-entry errors
    pub show_errors: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl WalkConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.root.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::InvalidRoot {
                path: args.root.display().to_string(),
                reason: "root path must not be empty".to_string(),
            });
        }

        if let Some(limit) = args.max_entries {
            if limit == 0 {
                return Err(ConfigError::InvalidMaxEntries { limit });
            }
        }

        // Compile prune patterns
        let prune_patterns = args
            .prune_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidPrunePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: args.root,
            prune_patterns,
            max_entries: args.max_entries,
            dirs_only: args.dirs_only,
            summary: args.summary,
            show_progress: args.summary && !args.quiet,
            show_errors: args.show_errors,
            verbose: args.verbose,
        })
    }

    /// Check if a directory at `path` should be skipped. Patterns see the
    /// path with any non-UTF-8 bytes replaced.
    pub fn should_prune(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.prune_patterns.iter().any(|re| re.is_match(&path))
    }

    /// Check if `count` entries reach the configured limit
    pub fn limit_reached(&self, count: usize) -> bool {
        self.max_entries.is_some_and(|max| count >= max)
    }
}
