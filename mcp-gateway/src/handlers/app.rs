use axum::{Json, response::IntoResponse};
use serde_json::json;
use service_core::error::AppError;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mcp-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Route not found"))
}
