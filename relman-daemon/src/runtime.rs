use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use relman_core::{Config, ReleaseSource};
use relman_store::{Backend, SnapshotStore};
use relman_sync::Exporter;

use crate::error::{io_err, DaemonError};
use crate::health::HealthTracker;
use crate::http::{self, HttpState};

/// Build a runtime and run the daemon on it until shutdown.
pub fn start_blocking(
    config: Arc<Config>,
    source: Arc<dyn ReleaseSource>,
    backend: Arc<dyn Backend>,
) -> Result<(), DaemonError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config, source, backend))
}

/// Run the export loop, the HTTP surface and the ctrl-c handler until one
/// of them asks for shutdown.
pub async fn run(
    config: Arc<Config>,
    source: Arc<dyn ReleaseSource>,
    backend: Arc<dyn Backend>,
) -> Result<(), DaemonError> {
    let health = Arc::new(HealthTracker::new());
    let store = SnapshotStore::new(backend.clone());

    let mut exporter = Exporter::new(config.clone(), source, backend);
    exporter.prepare();

    let listen = config.export.listen.clone();
    let listener = TcpListener::bind(&listen)
        .await
        .map_err(|e| io_err(&listen, e))?;
    tracing::info!(listen = %listen, "http surface listening");

    let interval = Duration::from_secs(config.export.polling_interval_secs);
    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    let export_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        let health = health.clone();
        tokio::spawn(async move {
            let result = export_loop(exporter, health, interval, shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let http_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        let state = HttpState { health, store };
        tokio::spawn(async move {
            let result = http::serve(listener, state, shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, stopping after the current pass");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(DaemonError::Signal(err.to_string())),
                    }
                }
            }
        })
    };

    let (export_result, http_result, signal_result) =
        tokio::join!(export_handle, http_handle, signal_handle);

    handle_join("export_loop", export_result)?;
    handle_join("http_server", http_result)?;
    handle_join("signal_handler", signal_result)?;
    Ok(())
}

/// Run export passes every `interval` until shutdown.
///
/// Shutdown is checked between passes and during the sleep; a pass that has
/// started always runs to completion. Failed passes count against liveness.
pub async fn export_loop(
    mut exporter: Exporter,
    health: Arc<HealthTracker>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    loop {
        if shutdown_requested(&mut shutdown_rx) {
            break;
        }

        tracing::debug!("checking for installed releases");
        match exporter.run_once().await {
            Ok(summary) => {
                health.record_success();
                if summary.failed() > 0 {
                    tracing::warn!(failed = summary.failed(), "export pass had failures");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "export pass failed");
                health.record_failure();
            }
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    tracing::info!("export loop stopped");
    Ok(())
}

fn shutdown_requested(rx: &mut broadcast::Receiver<()>) -> bool {
    use broadcast::error::TryRecvError;
    !matches!(rx.try_recv(), Err(TryRecvError::Empty))
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Join(format!("{task} task join failure: {err}"))),
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
