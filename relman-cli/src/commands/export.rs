//! `relman export`: snapshot deployed releases into storage.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use relman_sync::{ActionResult, ExportSummary, Exporter};

use crate::commands::{block_on, dry_run_banner, init_logging, load_config, open_backend, open_cluster};
use crate::GlobalArgs;

/// Arguments for `relman export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Keep running, exporting every polling interval.
    #[arg(long)]
    pub daemon: bool,

    /// Seconds between passes in daemon mode.
    #[arg(long)]
    pub polling_interval: Option<u64>,

    /// Name of the manager's own release, tracked in the state descriptor.
    #[arg(long)]
    pub manager_release: Option<String>,

    /// Only export releases from these namespaces.
    #[arg(long, value_delimiter = ',')]
    pub namespaces: Vec<String>,

    /// Address for the daemon's HTTP surface.
    #[arg(long)]
    pub listen: Option<String>,
}

impl ExportArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global, |c| {
            c.export.daemon |= self.daemon;
            if let Some(secs) = self.polling_interval {
                c.export.polling_interval_secs = secs;
            }
            if let Some(name) = self.manager_release.clone() {
                c.export.manager_release = Some(name);
            }
            if !self.namespaces.is_empty() {
                c.export.namespaces = self.namespaces.clone();
            }
            if let Some(listen) = self.listen.clone() {
                c.export.listen = listen;
            }
        })?;
        let daemon = config.export.daemon && !config.dry_run;
        init_logging(&config, if daemon { "info" } else { "warn" });

        let backend = open_backend(&config)?;
        let source = open_cluster(&config)?;

        if daemon {
            return relman_daemon::start_blocking(config, source, backend)
                .context("daemon exited with error");
        }
        if config.export.daemon {
            tracing::warn!("dry run: running a single export pass instead of the daemon");
        }

        dry_run_banner(&config);
        let mut exporter = Exporter::new(config.clone(), source, backend);
        let summary = block_on(async move {
            exporter.prepare();
            exporter.run_once().await
        })?
        .context("export failed")?;

        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &ExportSummary) {
    for action in &summary.actions {
        match action {
            ActionResult::Written { key } => println!("{} stored {key}", "✓".green()),
            ActionResult::Deleted { key } => println!("{} removed {key}", "✓".green()),
            ActionResult::WouldWrite { key, rendered } => {
                println!("[dry-run] would store {key}");
                println!("{rendered}");
            }
            ActionResult::WouldDelete { key } => println!("[dry-run] would remove {key}"),
            ActionResult::Failed { key, error } => {
                println!("{} {key}: {error}", "✗".red())
            }
        }
    }

    if summary.is_noop() {
        println!("Snapshot is up to date.");
    } else if summary.failed() > 0 {
        println!(
            "{} stored, {} removed, {}",
            summary.written(),
            summary.deleted(),
            format!("{} failed", summary.failed()).red()
        );
    } else {
        println!("{} stored, {} removed", summary.written(), summary.deleted());
    }
}
