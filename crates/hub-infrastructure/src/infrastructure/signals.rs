//! Termination signals
//!
//! Ctrl-C (SIGINT) and SIGTERM both request a graceful stop of the hub.

use crate::error_ext::ErrorContext;
use hub_domain::error::Result;
use std::fmt;
use tracing::info;

/// Signal that ended the wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for the first termination signal
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm =
        signal(SignalKind::terminate()).io_context("failed to install the SIGTERM handler")?;

    let received = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.io_context("failed to listen for Ctrl-C")?;
            ShutdownSignal::Interrupt
        }
        _ = sigterm.recv() => ShutdownSignal::Terminate,
    };
    info!(signal = %received, "Shutdown signal received");
    Ok(received)
}

/// Wait for the first termination signal
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> Result<ShutdownSignal> {
    tokio::signal::ctrl_c()
        .await
        .io_context("failed to listen for Ctrl-C")?;
    info!(signal = %ShutdownSignal::Interrupt, "Shutdown signal received");
    Ok(ShutdownSignal::Interrupt)
}
