//! Bind/serve/shutdown wrapper around axum
//!
//! Keeps `main` free of listener plumbing: build a router with
//! [`crate::create_router`], hand it to [`Server::start`], then
//! [`Server::wait`] until Ctrl+C.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::{signal, task::JoinHandle};
use tracing::info;

/// HTTP server lifecycle handle
pub struct Server {
    name: String,
    http_port: u16,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
            join_handle: None,
        }
    }

    /// Binds the listener and starts serving `router` in the background.
    ///
    /// Binding happens before anything is spawned so a port conflict comes
    /// back as an error instead of killing a detached task.
    pub async fn start(&mut self, router: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("cannot bind HTTP port {}", self.http_port))?;
        info!("✅ {} listening on http://{}", self.name, addr);

        let server_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router.into_make_service()).await {
                tracing::error!("❌ HTTP server stopped: {}", e);
            }
        });

        let shutdown_task = tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Ctrl+C received, shutting down");
            }
        });

        self.join_handle = Some(tokio::spawn(async move {
            tokio::select! {
                _ = server_task => {},
                _ = shutdown_task => {},
            }
        }));
        Ok(())
    }

    /// Waits until the server stops (Ctrl+C or serve error)
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }
}
