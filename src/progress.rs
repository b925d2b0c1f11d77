//! Progress reporting for the filesystem walker
//!
//! Spinner and end-of-walk summary for `fswalk --summary`.

use crate::walker::WalkStats;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::path::Path;
use std::time::{Duration, Instant};

/// How many entries pass between spinner message refreshes
const UPDATE_EVERY: u64 = 256;

/// Longest a slow walk goes without a message refresh
const UPDATE_INTERVAL: Duration = Duration::from_millis(250);

/// Progress reporter that displays walk status
pub struct ProgressReporter {
    bar: ProgressBar,
    last_update: Cell<Option<Instant>>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self::from_bar(bar)
    }

    fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            last_update: Cell::new(None),
        }
    }

    /// Update the progress display; cheap to call on every entry
    pub fn update(&self, stats: &WalkStats, current: &Path) {
        let seen = stats.entries();
        let now = Instant::now();
        let since_last = self.last_update.get().map(|t| now.duration_since(t));
        if !should_refresh(seen, since_last) {
            return;
        }
        self.last_update.set(Some(now));

        let rate = entries_per_second(seen, self.bar.elapsed());
        let msg = format!(
            "Dirs: {} | Files: {} | Size: {} | Errors: {} | Rate: {:.0}/s | {}",
            format_number(stats.dirs),
            format_number(stats.files),
            format_size(stats.bytes, BINARY),
            format_number(stats.errors),
            rate,
            current.display(),
        );

        self.bar.set_message(msg);
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// The first entry always refreshes, then every `UPDATE_EVERY` entries or
/// once `UPDATE_INTERVAL` has passed, whichever comes first
fn should_refresh(seen: u64, since_last: Option<Duration>) -> bool {
    match since_last {
        None => true,
        Some(elapsed) => seen % UPDATE_EVERY == 0 || elapsed >= UPDATE_INTERVAL,
    }
}

fn entries_per_second(entries: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        entries as f64 / secs
    } else {
        0.0
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of the walk results
pub fn print_summary(root: &Path, stats: &WalkStats, duration: Duration) {
    let duration_secs = duration.as_secs_f64();
    let title = if stats.completed {
        style("Walk Complete").green().bold()
    } else {
        style("Walk Stopped").yellow().bold()
    };

    println!();
    println!("{}", title);
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Root:").bold(), root.display());
    println!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(stats.dirs)
    );
    println!("  {} {}", style("Files:").bold(), format_number(stats.files));
    if stats.symlinks > 0 {
        println!(
            "  {} {}",
            style("Symlinks:").bold(),
            format_number(stats.symlinks)
        );
    }
    if stats.others > 0 {
        println!("  {} {}", style("Other:").bold(), format_number(stats.others));
    }
    println!(
        "  {} {}",
        style("Total Size:").bold(),
        format_size(stats.bytes, BINARY)
    );
    if stats.skipped > 0 {
        println!(
            "  {} {}",
            style("Pruned:").bold(),
            format_number(stats.skipped)
        );
    }
    println!(
        "  {} {:.1}s ({:.0} entries/sec)",
        style("Duration:").bold(),
        duration_secs,
        entries_per_second(stats.entries(), duration)
    );
    if stats.errors > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(stats.errors)
        );
    }
    println!();
}

/// Print a header at the start of the walk
pub fn print_header(root: &Path, prune_count: usize) {
    println!();
    println!(
        "{} {}",
        style("fswalk").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Root:").bold(), root.display());
    if prune_count > 0 {
        println!("  {} {}", style("Prune patterns:").bold(), prune_count);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_entries_per_second() {
        assert_eq!(entries_per_second(100, Duration::ZERO), 0.0);
        assert!((entries_per_second(110, Duration::from_secs(10)) - 11.0).abs() < 0.01);
    }

    #[test]
    fn test_should_refresh() {
        assert!(should_refresh(1, None));
        assert!(should_refresh(7, None));
        assert!(!should_refresh(2, Some(Duration::from_millis(1))));
        assert!(should_refresh(UPDATE_EVERY, Some(Duration::from_millis(1))));
        assert!(should_refresh(3, Some(UPDATE_INTERVAL)));
    }

    #[test]
    fn test_first_entry_sets_message() {
        let reporter = ProgressReporter::from_bar(ProgressBar::hidden());
        let stats = WalkStats {
            dirs: 1,
            ..Default::default()
        };
        reporter.update(&stats, Path::new("root"));
        let msg = reporter.bar.message();
        assert!(msg.contains("Dirs: 1"), "{}", msg);
        assert!(msg.ends_with("root"), "{}", msg);

        // Right behind it, the next entry is throttled
        let stats = WalkStats {
            dirs: 1,
            files: 1,
            ..Default::default()
        };
        reporter.update(&stats, Path::new("root/f"));
        assert!(reporter.bar.message().ends_with("root"));
    }
}
