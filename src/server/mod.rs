pub mod config;

use std::future::Future;
use tracing::{error, info};

/// Resolves once `signal` fires. If the listener cannot be installed the
/// error is logged and this never resolves, so the server keeps running.
pub async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
