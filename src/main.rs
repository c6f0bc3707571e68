//! dotforge CLI
//!
//! Command-line interface for materializing declarative development
//! environment configuration onto disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dotforge::commands::{config, status, sync};
use dotforge::{Loader, bundle, paths};

#[derive(Parser)]
#[command(name = "dotforge")]
#[command(
    author,
    version,
    about = "Render, link, and merge dotfiles from layered component definitions"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Dotfiles root holding per-component sync sources
    #[arg(long, global = true, env = "DOTFORGE_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bundled components
    Components,

    /// Print a component's resolved configuration
    Show {
        /// Component name
        component: String,
    },

    /// Create an editable user override for a component
    Override {
        /// Component name
        component: String,

        /// Overwrite an existing override
        #[arg(short, long)]
        force: bool,
    },

    /// Generated-file operations (path, source, generate, show)
    Config(config::ConfigArgs),

    /// Reconcile a component's sync files against the filesystem
    Sync(sync::SyncArgs),

    /// Report reconciliation state without changing anything
    Status(status::StatusArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = Loader::new();
    let root = cli.root.unwrap_or_else(paths::dotfiles_root);

    match cli.command {
        Commands::Components => {
            for name in bundle::components() {
                if loader.has_override(name) {
                    println!("{name} {}", "(user override)".cyan());
                } else {
                    println!("{name}");
                }
            }
        }

        Commands::Show { component } => {
            let config = loader.load(&component)?;
            print!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Override { component, force } => {
            if loader.has_override(&component) && !force {
                println!(
                    "{} Override already exists: {} (use --force to overwrite)",
                    "!".yellow(),
                    loader.override_path(&component).display()
                );
                return Ok(());
            }
            let path = loader.create_override(&component)?;
            println!("{} Created override: {}", "✔".green(), path.display());
            println!("Edit it, then run {} to apply", format!("dotforge sync {component}").cyan());
        }

        Commands::Config(args) => config::run(args, &loader)?,

        Commands::Sync(args) => sync::run(args, &loader, &root)?,

        Commands::Status(args) => status::run(args, &loader, &root)?,
    }

    Ok(())
}
