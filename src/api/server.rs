//! HTTP server lifecycle — starts/stops an axum server for a router.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;

use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Session metadata for a running server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSession {
    pub session_id: String,
    pub service: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running server.
pub struct ServerHandle {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!(service = %self.session.service, "Server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish (after `shutdown`, or on error).
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Server task ended abnormally: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` and serve `app` in a background tokio task.
///
/// Port 0 binds an ephemeral port; the chosen port is reported in the
/// returned session metadata.
pub async fn start_server(
    service: &str,
    app: Router,
    addr: SocketAddr,
) -> Result<ServerHandle, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        service: service.to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let service_name = session.service.clone();
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(service = %service_name, %addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!(service = %service_name, "Server stopped");
    });

    Ok(ServerHandle {
        session,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
