//! MCP server management routes. Each one is a thin pass-through to the
//! backend; see [`crate::services::gateway`].

use crate::AppState;
use crate::services::gateway::{
    ForwardedRequest, LIST_SERVERS, TEST_SERVER, UPDATE_SERVERS,
};
use axum::{
    Extension,
    body::Bytes,
    extract::State,
    response::Response,
};
use service_core::error::AppError;
use service_core::middleware::RequestId;

fn request_id(id: Option<Extension<RequestId>>) -> Option<String> {
    id.map(|Extension(id)| id.0)
}

/// `GET /api/mcp-servers`
pub async fn list_servers(
    State(state): State<AppState>,
    id: Option<Extension<RequestId>>,
) -> Result<Response, AppError> {
    tracing::info!("List MCP servers request received");

    state
        .gateway
        .forward(
            &LIST_SERVERS,
            ForwardedRequest::get().with_request_id(request_id(id)),
        )
        .await
}

/// `POST /api/mcp-servers`
pub async fn update_servers(
    State(state): State<AppState>,
    id: Option<Extension<RequestId>>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::info!("Update MCP servers request received");

    state
        .gateway
        .forward(
            &UPDATE_SERVERS,
            ForwardedRequest::post(body).with_request_id(request_id(id)),
        )
        .await
}

/// `POST /api/mcp-servers/test`. Requires `hostname` in the body.
pub async fn test_server(
    State(state): State<AppState>,
    id: Option<Extension<RequestId>>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::info!("MCP server connection test request received");

    state
        .gateway
        .forward(
            &TEST_SERVER,
            ForwardedRequest::post(body).with_request_id(request_id(id)),
        )
        .await
}
