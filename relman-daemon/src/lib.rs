//! Daemon mode: polling export loop, liveness and the HTTP surface.

mod error;
pub mod health;
pub mod http;
mod runtime;

pub use error::DaemonError;
pub use health::{HealthTracker, MAX_FAILURES};
pub use runtime::{export_loop, init_tracing, run, start_blocking};
