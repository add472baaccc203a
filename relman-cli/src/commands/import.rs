//! `relman import`: replay with namespace filters, value overrides and remap.

use anyhow::Result;
use clap::Args;

use relman_sync::TransferOptions;

use crate::commands::{init_logging, load_config, transfer::replay};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Only replay releases from this namespace.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Install filtered releases here instead. Requires --namespace.
    #[arg(long)]
    pub target_namespace: Option<String>,

    /// Skip releases from these namespaces. Ignored with --namespace.
    #[arg(long, value_delimiter = ',')]
    pub exclude_namespaces: Vec<String>,

    /// Override a value, `path.to.key=value`. Repeatable.
    #[arg(long = "set", value_parser = parse_override)]
    pub values: Vec<(String, String)>,

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

impl ImportArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global, |c| {
            let import = &mut c.import;
            import.force |= self.force;
            if let Some(ns) = self.namespace.clone() {
                import.namespace = Some(ns);
            }
            if let Some(ns) = self.target_namespace.clone() {
                import.target_namespace = Some(ns);
            }
            if !self.exclude_namespaces.is_empty() {
                import.exclude_namespaces = self.exclude_namespaces.clone();
            }
            import.values.extend(self.values.iter().cloned());
            if let Some(path) = self.new_path.clone() {
                import.new_storage_path = Some(path);
            }
            if let Some(threads) = self.threads {
                import.threads = threads;
            }
        })?;
        init_logging(&config, "warn");
        replay(&config, TransferOptions::import(&config))
    }
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((path, value)) if !path.is_empty() => Ok((path.to_string(), value.to_string())),
        _ => Err(format!("expected path=value, got '{raw}'")),
    }
}
