//! `relman health`: ask a running export daemon whether it is healthy.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::commands::load_unvalidated;
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Daemon base URL (default: http://<export.listen>).
    #[arg(long)]
    pub url: Option<String>,

    /// Also print the release keys the daemon sees.
    #[arg(long)]
    pub releases: bool,
}

impl HealthArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let base = match self.url {
            Some(url) => url,
            None => {
                let config = load_unvalidated(global)?;
                format!("http://{}", config.export.listen)
            }
        };
        let base = base.trim_end_matches('/');
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(5))
            .build();

        match agent.get(&format!("{base}/healthz")).call() {
            Ok(_) => println!("{} {base} is healthy", "✓".green()),
            Err(ureq::Error::Status(code, _)) => {
                println!("{} {base} is unhealthy", "✗".red());
                anyhow::bail!("daemon reported status {code}");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("could not reach daemon at {base}"))
            }
        }

        if self.releases {
            let keys: Vec<String> = agent
                .get(&format!("{base}/releases"))
                .call()
                .with_context(|| format!("failed to list releases from {base}"))?
                .into_json()
                .context("daemon returned malformed release list")?;
            for key in keys {
                println!("  {key}");
            }
        }
        Ok(())
    }
}
