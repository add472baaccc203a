//! # relman-sync
//!
//! Reconciliation and replay engine.
//!
//! [`Exporter`] snapshots live releases into storage one pass at a time,
//! [`Replayer`] deploys a stored snapshot onto a cluster after the state
//! conflict check, and [`clear`] removes a snapshot.

pub mod clear;
pub mod diff;
pub mod error;
pub mod export;
pub mod tracker;
pub mod transfer;

pub use clear::{clear, ClearReport, ClearResult};
pub use diff::ReleaseDiff;
pub use error::SyncError;
pub use export::{ActionResult, ExportSummary, Exporter};
pub use tracker::{ManagerTracker, TrackOutcome};
pub use transfer::{ConflictOutcome, DeployResult, Replayer, TransferOptions, TransferReport};
