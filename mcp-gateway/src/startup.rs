//! Router assembly and server lifecycle.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, request_id_middleware};
use service_core::observability::REQUEST_ID_HEADER;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::config::GatewayConfig;
use crate::handlers::{
    app::{health_check, not_found},
    mcp_servers::{list_servers, test_server, update_servers},
    metrics::metrics,
};
use crate::services::BackendClient;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/mcp-servers", get(list_servers).post(update_servers))
        .route("/api/mcp-servers/test", post(test_server))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener and wire the router. Port 0 picks a free port.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let backend_client = BackendClient::new(config.backend.clone()).map_err(|e| {
            tracing::error!("Failed to build backend HTTP client: {}", e);
            AppError::InternalError(anyhow::Error::new(e))
        })?;
        let backend_client = Arc::new(backend_client);
        tracing::info!(
            backend_url = %backend_client.base_url(),
            "Forwarding MCP server requests to backend"
        );

        crate::services::metrics::init_metrics();

        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(backend_client));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("mcp-gateway listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
