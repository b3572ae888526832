//! The sync command: resolve settings, reconcile, report

use colored::Colorize;

use gfd_api::HttpTransport;
use gfd_core::{ConfigResolver, Outcome, SyncEngine, SyncOptions, SyncReport, WriteReason};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Run one sync as described by the command line.
///
/// Folder item failures are reported but only fail the command with `--strict`.
pub fn run_sync(cli: &Cli) -> Result<()> {
    let mut resolver = ConfigResolver::new();
    if let Some(ref config) = cli.config {
        resolver = resolver.with_config_file(config);
    }

    let raw = resolver.resolve(&cli.overrides())?;
    tracing::debug!(mode = %raw.mode(), "Resolved configuration");
    let settings = raw.validate()?;

    let transport = HttpTransport::new(HttpTransport::DEFAULT_TIMEOUT)?;
    let engine = SyncEngine::new(
        transport,
        SyncOptions {
            dry_run: cli.dry_run,
        },
    );
    let report = engine.run(&settings)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_human(&report);
    }

    if cli.strict && !report.success() {
        return Err(CliError::user(format!(
            "{} of {} items failed",
            report.failed(),
            report.items.len()
        )));
    }
    Ok(())
}

/// Print a colored, line-per-item summary to stdout.
fn render_human(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    for item in &report.items {
        let local = item.local_path.display().to_string();
        match &item.outcome {
            Outcome::Wrote { reason } => println!(
                "{} {} {}",
                "wrote".green().bold(),
                local.cyan(),
                describe(*reason).dimmed()
            ),
            Outcome::WouldWrite { reason } => println!(
                "{}{} {} {}",
                prefix,
                "would write".yellow().bold(),
                local.cyan(),
                describe(*reason).dimmed()
            ),
            Outcome::Skipped => println!(
                "{}{} {} {}",
                prefix,
                "skip".blue(),
                local.cyan(),
                "(content is equal)".dimmed()
            ),
            Outcome::SkippedNotAFile => println!(
                "{}{} {} {}",
                prefix,
                "skip".blue(),
                item.remote_path.cyan(),
                "(not a file)".dimmed()
            ),
            Outcome::Failed { error } => println!(
                "{}{} {}: {}",
                prefix,
                "failed".red().bold(),
                item.remote_path.cyan(),
                error
            ),
        }
    }

    let failed = report.failed();
    let summary = format!(
        "{} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        failed
    );
    println!();
    if failed == 0 {
        println!("{} {}{}", "=>".green().bold(), prefix, summary);
    } else {
        println!("{} {}{}", "=>".yellow().bold(), prefix, summary);
    }
}

fn describe(reason: WriteReason) -> &'static str {
    match reason {
        WriteReason::New => "(new)",
        WriteReason::Changed => "(changed)",
    }
}
