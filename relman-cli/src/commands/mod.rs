pub mod clear;
pub mod export;
pub mod health;
pub mod import;
pub mod list;
pub mod transfer;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};

use relman_core::{config, Config, DirectorySource};
use relman_store::LocalBackend;

use crate::GlobalArgs;

/// Load the config file, overlay global flags, then `overlay` for the
/// subcommand's own flags. The result is validated and frozen.
pub fn load_config(global: &GlobalArgs, overlay: impl FnOnce(&mut Config)) -> Result<Arc<Config>> {
    let mut config = load_unvalidated(global)?;
    overlay(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(Arc::new(config))
}

/// Config with global flags applied but no validation, for commands that do
/// not touch storage.
pub fn load_unvalidated(global: &GlobalArgs) -> Result<Config> {
    let mut config = config::load(global.config.as_deref()).context("failed to load config")?;
    if let Some(path) = &global.path {
        config.storage.path = Some(path.clone());
    }
    if let Some(dir) = &global.cluster_dir {
        config.cluster.dir = Some(dir.clone());
    }
    config.dry_run |= global.dry_run;
    config.verbose |= global.verbose;
    config.debug |= global.debug;
    Ok(config)
}

/// Install logging. `RUST_LOG` wins; otherwise debug, or `default` level.
pub fn init_logging(config: &Config, default: &str) {
    let directive = if config.debug { "debug" } else { default };
    relman_daemon::init_tracing(directive);
}

/// Open the storage root, creating it if needed.
pub fn open_backend(config: &Config) -> Result<Arc<LocalBackend>> {
    let path = config
        .storage
        .path
        .as_ref()
        .context("no storage path configured")?;
    let backend = LocalBackend::new(path);
    backend
        .ensure_root()
        .with_context(|| format!("failed to initialize storage at {}", path.display()))?;
    Ok(Arc::new(backend))
}

pub fn open_cluster(config: &Config) -> Result<Arc<DirectorySource>> {
    let dir = config
        .cluster
        .dir
        .as_ref()
        .context("no cluster directory configured (--cluster-dir or cluster.dir)")?;
    Ok(Arc::new(DirectorySource::new(dir)))
}

/// Run a future to completion on a fresh multi-thread runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    Ok(runtime.block_on(future))
}

pub fn dry_run_banner(config: &Config) {
    if config.dry_run {
        println!("Dry run. No changes will be made.");
    }
}
