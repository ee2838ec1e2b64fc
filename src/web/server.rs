//! HTTP server
//!
//! Uses axum to serve the dashboard; supports start and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{self, AppState};
use crate::config::DashboardConfig;
use crate::data::filter::YearRange;
use crate::data::model::Dataset;

/// Build the dashboard routes over a shared dataset.
pub fn router(dataset: Arc<Dataset>, year_bounds: YearRange) -> Router {
    let state = Arc::new(AppState {
        dataset,
        year_bounds,
    });

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health_check))
        .route("/api/options", get(handlers::options))
        .route("/api/dashboard", post(handlers::dashboard))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Server control handle
pub struct ServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
    port: u16,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Signal a graceful shutdown; pair with [`ServerHandle::wait`].
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait until the server has stopped and in-flight requests finished.
    pub async fn wait(mut self) {
        if let Err(e) = (&mut self.task).await {
            log::error!("Server task failed: {e}");
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Web dashboard server
pub struct DashboardServer {
    dataset: Arc<Dataset>,
    config: DashboardConfig,
}

impl DashboardServer {
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Self { dataset, config }
    }

    /// Start the server.
    ///
    /// # Arguments
    /// * `port` - optional port; the configured one is used when absent,
    ///   and 0 binds any free port
    pub async fn start(&self, port: Option<u16>) -> Result<ServerHandle, String> {
        let port = port.unwrap_or(self.config.port);
        DashboardConfig::validate_port(port)?;

        let app = router(self.dataset.clone(), self.config.year_bounds);

        // Local only
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| format!("Failed to bind to port {}: {}", port, e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let graceful = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = graceful.await {
                log::error!("Server error: {}", e);
            }
        });

        log::info!("Dashboard available at http://{addr}/");

        Ok(ServerHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
            port: addr.port(),
        })
    }

    /// Whether a port can be bound locally.
    pub async fn check_port_available(port: u16) -> bool {
        tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))
            .await
            .is_ok()
    }
}
