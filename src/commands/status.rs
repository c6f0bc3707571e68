//! Read-only reconciliation report.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use crate::loader::Loader;
use crate::syncer::{STATUS_MISSING, STATUS_NOT_SYMLINK, STATUS_WRONG_TARGET, Syncer};

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Component name
    pub component: String,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatusArgs, loader: &Loader, root: &Path) -> Result<()> {
    let config = loader.load(&args.component)?;

    if config.sync_files.is_empty() {
        println!("Component '{}' declares no sync files", args.component);
        return Ok(());
    }

    let syncer = Syncer::new(root.join(&args.component), false);
    let report = syncer.status(&config.sync_files);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for entry in &report.synced {
        println!(
            "{} OK: {} ({})",
            "✔".green(),
            entry.target.display(),
            entry.mode
        );
    }

    let mut problems = 0usize;
    for entry in &report.skipped {
        match entry.action {
            STATUS_MISSING => println!("{} Missing: {}", "!".yellow(), entry.target.display()),
            STATUS_NOT_SYMLINK => println!(
                "{} Exists but not a symlink: {}",
                "·".dimmed(),
                entry.target.display()
            ),
            STATUS_WRONG_TARGET => println!(
                "{} Incorrect link: {} (expected source: {})",
                "✗".red(),
                entry.target.display(),
                entry.source
            ),
            other => println!("{} {}: {}", "?".yellow(), other, entry.target.display()),
        }
        problems += 1;
    }

    if problems > 0 {
        println!("\nStatus: {problems} problems found");
        std::process::exit(1);
    }
    println!("\nStatus: All good");

    Ok(())
}
