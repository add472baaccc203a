//! `relman list`: show the release keys stored at the storage root.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use relman_core::codec::ReleaseKey;
use relman_store::SnapshotStore;

use crate::commands::{init_logging, load_config, open_backend};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the keys as a JSON array.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct KeyRow {
    #[tabled(rename = "key")]
    key: String,
    #[tabled(rename = "release")]
    name: String,
    #[tabled(rename = "version")]
    version: String,
    #[tabled(rename = "deployed")]
    deployed: String,
}

impl KeyRow {
    fn from_key(key: String) -> Self {
        match ReleaseKey::parse(&key) {
            Some(parsed) => Self {
                name: parsed.name,
                version: parsed.version.to_string(),
                deployed: parsed
                    .deployed
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                key,
            },
            None => Self {
                name: "?".to_string(),
                version: "?".to_string(),
                deployed: "-".to_string(),
                key,
            },
        }
    }
}

impl ListArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global, |_| {})?;
        init_logging(&config, "warn");
        let store = SnapshotStore::new(open_backend(&config)?);
        let keys = store
            .list_keys()
            .with_context(|| format!("failed to list {}", store.location()))?;

        if self.json {
            let keys: Vec<&String> = keys.iter().collect();
            println!("{}", serde_json::to_string_pretty(&keys)?);
            return Ok(());
        }

        if keys.is_empty() {
            println!("No releases stored at {}.", store.location());
            return Ok(());
        }
        let rows: Vec<KeyRow> = keys.into_iter().map(KeyRow::from_key).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
