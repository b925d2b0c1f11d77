//! fswalk - Step-by-Step Filesystem Walker
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use fswalk::config::{CliArgs, WalkConfig};
use fswalk::progress::{print_header, print_summary, ProgressReporter};
use fswalk::{EntryType, Walker};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Validate and create config
    let config = WalkConfig::from_args(args).context("Invalid configuration")?;

    // Setup logging
    setup_logging(config.verbose)?;

    let mut walker = Walker::new(config.root.clone()).context("Failed to start walker")?;

    // Setup signal handler for graceful shutdown
    let stop = walker.stop_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping walk...");
        stop.stop();
    })
    .context("Failed to set signal handler")?;

    let start = Instant::now();

    if config.summary {
        run_summary(&config, &mut walker)?;
    } else {
        run_listing(&config, &mut walker)?;
    }

    let stats = walker.into_stats().context("Walk failed")?;

    if config.summary {
        print_summary(&config.root, &stats, start.elapsed());
    }

    if !stats.completed {
        info!("Walk was stopped before completion");
    }

    if stats.errors > 0 {
        info!(errors = stats.errors, "Walk completed with errors");
    }

    Ok(())
}

/// Apply prune patterns and the entry limit to the current entry
fn control(config: &WalkConfig, walker: &mut Walker, seen: usize) {
    if config.should_prune(walker.path()) {
        walker.skip_dir();
    }
    if config.limit_reached(seen) {
        walker.stop();
    }
}

fn report_error(config: &WalkConfig, walker: &Walker) {
    if config.show_errors {
        if let Some(err) = walker.error() {
            eprintln!("{}", err);
        }
    }
}

/// Print one line per entry
fn run_listing(config: &WalkConfig, walker: &mut Walker) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut seen = 0usize;

    while walker.step() {
        seen += 1;
        report_error(config, walker);

        let entry_type = walker.metadata().map(|m| m.entry_type);
        if !config.dirs_only || entry_type == Some(EntryType::Directory) {
            let marker = match entry_type {
                Some(EntryType::Directory) => "/",
                Some(EntryType::Symlink) => "@",
                _ => "",
            };
            writeln!(out, "{}{}", walker.path().display(), marker)
                .context("Failed to write output")?;
        }

        control(config, walker, seen);
    }

    out.flush().context("Failed to write output")?;
    Ok(())
}

/// Count entries behind a progress spinner
fn run_summary(config: &WalkConfig, walker: &mut Walker) -> Result<()> {
    if config.show_progress {
        print_header(&config.root, config.prune_patterns.len());
    }

    let progress = config.show_progress.then(ProgressReporter::new);
    let mut seen = 0usize;

    while walker.step() {
        seen += 1;
        report_error(config, walker);

        if let Some(ref p) = progress {
            p.update(walker.stats(), walker.path());
        }

        control(config, walker, seen);
    }

    if let Some(ref p) = progress {
        if walker.is_stopped() {
            p.finish("Walk stopped");
        } else {
            p.finish_and_clear();
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("fswalk=debug,warn")
    } else {
        EnvFilter::new("fswalk=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
