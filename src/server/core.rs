use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use log::{debug, error, info};
use tokio::net::TcpListener;
use tokio::signal;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::error::ChatServerError;
use crate::handlers::{chat_handler, health_handler};
use crate::middleware::{RateLimitStore, admission_layer};
use crate::server::state::AppState;

pub struct Server {
    state: Arc<AppState>,
    listener: TcpListener,
}

impl Server {
    /// Load the catalog and bind the listener. Either failing is fatal.
    pub async fn new(config: ServerConfig) -> Result<Self, ChatServerError> {
        let catalog = Catalog::load(&config.server.catalog_path())?;
        let state = AppState::new(config, catalog)?;

        let socket = state.config.server.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        Ok(Self { state, listener })
    }

    pub async fn start(self) -> Result<(), ChatServerError> {
        let admission = &self.state.config.admission;
        info!(
            "Starting shop chat server ({} products, {} requests per {}s per client, {} mode)",
            self.state.catalog.len(),
            admission.rate_limit_max_requests,
            admission.rate_limit_window_secs,
            if self.state.gateway.is_demo() { "demo" } else { "live" }
        );

        spawn_bucket_purge(self.state.admission.limiter(), admission.purge_interval());

        let app = build_router(Arc::clone(&self.state));
        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Server shut down");
        Ok(())
    }
}

/// Routes: the chat endpoint behind the admission guard, health outside it
pub fn build_router(state: Arc<AppState>) -> Router {
    let guarded = Router::new()
        .route("/api/chat", post(chat_handler))
        .route_layer(from_fn_with_state(Arc::clone(&state), admission_layer));

    Router::new()
        .route("/api/health", get(health_handler))
        .merge(guarded)
        .with_state(state)
}

/// Periodically drop buckets whose timestamps have all expired
fn spawn_bucket_purge(limiter: Arc<dyn RateLimitStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = limiter.purge_idle();
            if removed > 0 {
                debug!("Purged {} idle rate-limit buckets", removed);
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
