//! relman: snapshot, replay and clear cluster releases.
//!
//! # Usage
//!
//! ```text
//! relman [--config FILE] [--path DIR] [--cluster-dir DIR] [--dry-run] [--verbose] [--debug] <command>
//!
//! relman export [--daemon] [--manager-release NAME] [--namespaces a,b] [--polling-interval SECS]
//! relman import [--namespace NS] [--target-namespace NS] [--exclude-namespaces a,b]
//!               [--set path=value]... [--new-path PATH] [--force] [--threads N]
//! relman transfer [--new-path PATH] [--force] [--threads N]
//! relman clear
//! relman list [--json]
//! relman health [--url URL] [--releases]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{
    clear::ClearArgs, export::ExportArgs, health::HealthArgs, import::ImportArgs,
    list::ListArgs, transfer::TransferArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "relman",
    version,
    about = "Export, replay and clear snapshots of deployed releases",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every subcommand. They overlay the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: ~/.relman/config.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage root holding the snapshot.
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Directory standing in for the cluster (`<dir>/<namespace>/<name>.json`).
    #[arg(long, global = true)]
    pub cluster_dir: Option<PathBuf>,

    /// Print what would happen without changing anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Include chart default values when rendering releases.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Snapshot deployed releases into storage, once or as a daemon.
    Export(ExportArgs),

    /// Replay stored releases onto the cluster with filters and overrides.
    Import(ImportArgs),

    /// Replay every stored release onto the cluster unchanged.
    Transfer(TransferArgs),

    /// Delete every stored release and the manager state.
    Clear(ClearArgs),

    /// List stored release keys.
    List(ListArgs),

    /// Query a running daemon's liveness endpoint.
    Health(HealthArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = cli.global;
    match cli.command {
        Commands::Export(args) => args.run(&global),
        Commands::Import(args) => args.run(&global),
        Commands::Transfer(args) => args.run(&global),
        Commands::Clear(args) => args.run(&global),
        Commands::List(args) => args.run(&global),
        Commands::Health(args) => args.run(&global),
    }
}
