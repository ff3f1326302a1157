//! Server lifecycle management.
//!
//! Binds the HTTP listener, serves the router and shuts down gracefully on
//! SIGINT/SIGTERM. The capture task needs no shutdown signal of its own: it
//! self-cancels once readers stop arriving.

use std::sync::Arc;

use tracing::{error, info};

use camcast_core::{Config, FrameBroadcaster, SettingsStore};

use crate::http::{create_router, AppState};

pub struct CamcastServer {
    config: Config,
    broadcaster: Arc<FrameBroadcaster>,
    settings: SettingsStore,
}

impl CamcastServer {
    pub fn new(config: Config, broadcaster: Arc<FrameBroadcaster>, settings: SettingsStore) -> Self {
        Self {
            config,
            broadcaster,
            settings,
        }
    }

    /// Serve until a shutdown signal arrives.
    pub async fn start(self) -> anyhow::Result<()> {
        let state = AppState {
            broadcaster: self.broadcaster,
            settings: self.settings,
        };
        let router = create_router(state);

        let http_addr: std::net::SocketAddr = self.config.http_address().parse()?;
        let listener = tokio::net::TcpListener::bind(http_addr).await?;
        info!("HTTP server listening on {}", http_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received SIGTERM signal");
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
