use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use baseline::layout;
use baseline::repair;

#[derive(Parser)]
#[command(name = "baseline")]
#[command(about = "Base snapshot lineage repair for forked workspaces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile base-snapshot links across all registered workspaces
    Repair {
        /// Path to the global registry document (defaults to the config dir)
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Repair { registry, json } => {
            let registry_path = match registry {
                Some(path) => path,
                None => layout::registry_path()?,
            };
            let Some(summary) = repair::reconcile(&registry_path)? else {
                println!("No registry found at {}", registry_path.display());
                return Ok(());
            };
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).context("serialize summary json")?
                );
            } else {
                println!("Updated workspace configs: {}", summary.updated_configs);
                println!(
                    "Updated registry entries: {}",
                    summary.updated_registry_entries
                );
                println!("Updated parent configs: {}", summary.updated_parent_configs);
                println!(
                    "Copied base snapshot into workspaces: {}",
                    summary.copied_snapshots
                );
            }
        }
    }

    Ok(())
}
