//! Reconcile a component's sync directives against the filesystem.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use crate::loader::Loader;
use crate::syncer::Syncer;

/// Arguments for the sync command.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Component name
    pub component: String,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Show unchanged files too
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(args: SyncArgs, loader: &Loader, root: &Path) -> Result<()> {
    let config = loader.load(&args.component)?;

    if config.sync_files.is_empty() {
        println!("Component '{}' declares no sync files", args.component);
        return Ok(());
    }

    if args.dry_run {
        println!("{}", "Running in dry-run mode\n".cyan());
    }

    let syncer = Syncer::new(root.join(&args.component), args.dry_run);
    let report = syncer.sync(&config.sync_files);

    for entry in &report.synced {
        println!(
            "  {} {} -> {} ({}, {})",
            "✔".green(),
            entry.source,
            entry.target.display(),
            entry.mode,
            entry.action
        );
    }
    if args.verbose {
        for entry in &report.skipped {
            println!(
                "  {} {} ({})",
                "·".dimmed(),
                entry.target.display(),
                entry.action
            );
        }
    }
    for failure in &report.errors {
        eprintln!(
            "  {} {} -> {}: {}",
            "✗".red(),
            failure.source,
            failure.target.display(),
            failure.error
        );
    }

    println!(
        "\nSynced: {}, Unchanged: {}, Errors: {}",
        report.synced.len().to_string().green(),
        report.skipped.len().to_string().dimmed(),
        if report.errors.is_empty() {
            report.errors.len().to_string().dimmed()
        } else {
            report.errors.len().to_string().red()
        }
    );

    if !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}
