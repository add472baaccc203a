//! `relman transfer`: replay every stored release unchanged.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use relman_core::Config;
use relman_sync::{ConflictOutcome, DeployResult, Replayer, TransferOptions, TransferReport};

use crate::commands::{block_on, dry_run_banner, init_logging, load_config, open_backend, open_cluster};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Storage path to write into the manager's own release.
    #[arg(long)]
    pub new_path: Option<String>,

    /// Proceed even though the snapshot belongs to a live manager.
    #[arg(long)]
    pub force: bool,

    /// Maximum concurrent installs.
    #[arg(long)]
    pub threads: Option<usize>,
}

impl TransferArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global, |c| {
            c.import.force |= self.force;
            if let Some(path) = self.new_path.clone() {
                c.import.new_storage_path = Some(path);
            }
            if let Some(threads) = self.threads {
                c.import.threads = threads;
            }
        })?;
        init_logging(&config, "warn");
        replay(&config, TransferOptions::transfer(&config))
    }
}

/// Run a replay against the configured storage and cluster and print it.
pub(crate) fn replay(config: &Config, options: TransferOptions) -> Result<()> {
    let backend = open_backend(config)?;
    let source = open_cluster(config)?;
    dry_run_banner(config);

    let replayer = Replayer::new(source, backend, options);
    let report = block_on(async move { replayer.run().await })?.context("replay failed")?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &TransferReport) {
    match report.conflict {
        ConflictOutcome::Forced => println!(
            "{} existing state found but no new path given; continuing because of --force",
            "warning:".yellow()
        ),
        ConflictOutcome::DryRunWarning => println!(
            "{} existing state found but no new path given; a real run would stop here (use --force or --new-path)",
            "warning:".yellow()
        ),
        ConflictOutcome::PathOverrideWithoutState => println!(
            "{} new path given but no manager state found; nothing to relocate",
            "warning:".yellow()
        ),
        ConflictOutcome::Clear | ConflictOutcome::Relocating => {}
    }

    for result in &report.results {
        match result {
            DeployResult::Installed { name, namespace } => {
                println!("Deploying release {name} into {namespace}");
                println!("{} Successfully deployed {name}", "✓".green());
            }
            DeployResult::AlreadyExists { name, .. } => {
                println!("{} Skipping release: {name} already exists", "-".yellow());
            }
            DeployResult::Failed {
                name,
                namespace,
                error,
            } => {
                println!("Deploying release {name} into {namespace}");
                println!("{} Error deploying {name}: {error}", "✗".red());
            }
            DeployResult::WouldInstall {
                name,
                namespace,
                rendered,
            } => {
                println!("[dry-run] would deploy {name} into {namespace}");
                println!("{rendered}");
            }
        }
    }

    let total = report.results.len();
    if total == 0 {
        println!("No releases to deploy.");
    } else if report.failed() > 0 {
        println!(
            "{}/{} deployed, {}",
            report.installed(),
            total,
            format!("{} failed", report.failed()).red()
        );
    } else {
        println!("{}/{} deployed", report.installed(), total);
    }
}
