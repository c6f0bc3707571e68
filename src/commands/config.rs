//! Generated-file operations for a component's `files` directives.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::generate::{ACTION_UNCHANGED, Generator};
use crate::loader::Loader;
use crate::syncer::Syncer;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Component name
    pub component: String,

    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// List target/generated path pairs
    Path,
    /// Show override and generated-file linkage
    Source,
    /// Render and write generated files, then link targets at them
    Generate {
        /// Show what would be generated without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the currently-generated content
    Show,
}

pub fn run(args: ConfigArgs, loader: &Loader) -> Result<()> {
    let component = &args.component;
    let config = loader.load(component)?;

    if config.files.is_empty() {
        println!("Component '{component}' declares no generated files");
        return Ok(());
    }

    match args.action {
        ConfigAction::Path => {
            let generator = Generator::new(component, true);
            for spec in &config.files {
                let target = crate::paths::expand(&spec.target);
                let generated = generator.generated_path(&target);
                println!("{} -> {}", target.display(), generated.display().to_string().dimmed());
            }
        }

        ConfigAction::Source => {
            let generator = Generator::new(component, true);

            if loader.has_override(component) {
                println!(
                    "{} User override: {}",
                    "✔".green(),
                    loader.override_path(component).display()
                );
            } else {
                println!(
                    "{} No user override (create one with `dotforge override {component}`)",
                    "·".dimmed()
                );
            }

            for spec in &config.files {
                let target = crate::paths::expand(&spec.target);
                let generated = generator.generated_path(&target);
                describe_link(&target, &generated);
            }
        }

        ConfigAction::Generate { dry_run } => {
            let generator = Generator::new(component, dry_run);
            let mut generated = Vec::new();
            let mut failed = 0usize;

            for spec in &config.files {
                match generator.generate(spec) {
                    Ok(file) => {
                        println!(
                            "  {} {} ({}, {})",
                            "✔".green(),
                            file.generated.display(),
                            file.format,
                            file.action
                        );
                        generated.push(file);
                    }
                    Err(err) => {
                        tracing::error!(target = %spec.target, error = %err, "generate failed");
                        eprintln!("  {} {}: {}", "✗".red(), spec.target, err);
                        failed += 1;
                    }
                }
            }

            // Point each declared target at its generated file. In dry-run
            // the generated file may not be on disk yet, so the link step is
            // previewed rather than reconciled.
            let (linked, unchanged) = if dry_run {
                for file in &generated {
                    println!(
                        "  {} Would link: {} -> {}",
                        "→".cyan(),
                        file.target.display(),
                        file.generated.display()
                    );
                }
                (0, 0)
            } else {
                let links = generator.link_directives(&generated);
                let report = Syncer::new(generator.component_dir(), false).sync(&links);
                for entry in &report.synced {
                    println!(
                        "  {} {} -> generated ({})",
                        "✔".green(),
                        entry.target.display(),
                        entry.action
                    );
                }
                for failure in &report.errors {
                    eprintln!("  {} {}: {}", "✗".red(), failure.target.display(), failure.error);
                }
                failed += report.errors.len();
                (report.synced.len(), report.skipped.len())
            };

            println!(
                "\nGenerated: {}, Linked: {}, Unchanged: {}, Errors: {}",
                generated
                    .iter()
                    .filter(|f| f.action != ACTION_UNCHANGED)
                    .count()
                    .to_string()
                    .green(),
                linked.to_string().green(),
                unchanged.to_string().dimmed(),
                failed.to_string().red()
            );

            if failed > 0 {
                std::process::exit(1);
            }
        }

        ConfigAction::Show => {
            let generator = Generator::new(component, true);
            for spec in &config.files {
                let target = crate::paths::expand(&spec.target);
                let generated = generator.generated_path(&target);

                println!("{} {}", "#".dimmed(), generated.display().to_string().dimmed());
                match fs::read_to_string(&generated) {
                    Ok(content) => println!("{content}"),
                    // Nothing on disk yet; show what generate would produce.
                    Err(_) => {
                        let file = generator.render(spec)?;
                        println!("{}", String::from_utf8_lossy(&file.content));
                    }
                }
            }
        }
    }

    Ok(())
}

fn describe_link(target: &Path, generated: &Path) {
    match fs::symlink_metadata(target) {
        Err(_) => println!("{} Missing: {}", "!".yellow(), target.display()),
        Ok(meta) if !meta.file_type().is_symlink() => {
            println!("{} Exists but not a symlink: {}", "·".dimmed(), target.display());
        }
        Ok(_) => match fs::read_link(target) {
            Ok(dest) if dest == generated => {
                println!("{} OK: {} -> {}", "✔".green(), target.display(), dest.display());
            }
            Ok(dest) => println!(
                "{} Incorrect link: {} -> {} (expected: {})",
                "✗".red(),
                target.display(),
                dest.display(),
                generated.display()
            ),
            Err(_) => println!("{} Unknown link target: {}", "?".yellow(), target.display()),
        },
    }
}
