//! `relman clear`: delete the whole snapshot at the storage root.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use relman_store::{SnapshotStore, StateStore};
use relman_sync::{clear, ClearResult};

use crate::commands::{dry_run_banner, init_logging, load_config, open_backend};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct ClearArgs {}

impl ClearArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global, |_| {})?;
        init_logging(&config, "warn");
        let backend = open_backend(&config)?;
        dry_run_banner(&config);

        let store = SnapshotStore::new(backend.clone());
        let state = StateStore::new(backend);
        let report = clear(&store, &state, config.dry_run, config.verbose)
            .with_context(|| format!("failed to clear {}", store.location()))?;

        let mut failed = 0usize;
        for result in &report.results {
            match result {
                ClearResult::Deleted { key } => println!("{} removed {key}", "✓".green()),
                ClearResult::WouldDelete { key, rendered } => {
                    println!("[dry-run] would remove {key}");
                    if let Some(rendered) = rendered {
                        println!("{rendered}");
                    }
                }
                ClearResult::Failed { key, error } => {
                    failed += 1;
                    println!("{} {key}: {error}", "✗".red());
                }
            }
        }
        if report.descriptor_removed {
            println!("{} removed manager state", "✓".green());
        }

        if report.results.is_empty() {
            println!("Nothing stored at {}.", store.location());
        }
        if failed > 0 {
            println!("{}", format!("{failed} release(s) could not be removed").red());
        }
        Ok(())
    }
}
