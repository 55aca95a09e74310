//! OS signal handling.

/// Wait for the interrupt signal (ctrl-c / SIGINT).
pub async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
