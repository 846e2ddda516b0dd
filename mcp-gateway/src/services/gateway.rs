//! Generic forwarding gateway.
//!
//! Every MCP route is the same pass-through: optionally check one required
//! field, make exactly one backend call, and either relay the backend's JSON
//! with `Cache-Control: no-cache` or answer 500 with a fixed,
//! operation-specific message plus the underlying error text. A
//! [`ForwardRoute`] captures what differs between routes; [`Gateway::forward`]
//! is the shared control flow.

use crate::services::backend_client::{BackendClient, BackendEndpoint};
use crate::services::metrics::record_backend_call;
use axum::{
    Json,
    body::Bytes,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Why a forwarded call did not produce a usable backend response. The
/// `Display` text becomes the `details` field of the error envelope.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("{0}")]
    InvalidRequestBody(serde_json::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend API error! status: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("{0}")]
    Decode(serde_json::Error),
}

/// Shape of the 500 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{error, details}`
    Plain,
    /// `{success: false, error, details}`
    ConnectionCheck,
}

/// A body field that must be present (and truthy) before any backend call.
#[derive(Debug, Clone, Copy)]
pub struct RequiredField {
    pub name: &'static str,
    pub message: &'static str,
}

/// Everything that varies between forwarded operations.
#[derive(Debug, Clone, Copy)]
pub struct ForwardRoute {
    pub endpoint: BackendEndpoint,
    pub is_success: fn(StatusCode) -> bool,
    pub failure_message: &'static str,
    pub envelope: Envelope,
    pub required: Option<RequiredField>,
    /// Log line for a relayed backend reply.
    pub summary: fn(&Value) -> String,
}

fn is_2xx(status: StatusCode) -> bool {
    status.is_success()
}

fn fetched_servers(data: &Value) -> String {
    match data.as_array() {
        Some(servers) => format!("Fetched {} MCP servers", servers.len()),
        None => "Fetched MCP servers".to_string(),
    }
}

fn updated_servers(_: &Value) -> String {
    "Updated MCP servers".to_string()
}

fn connection_verdict(data: &Value) -> String {
    let verdict = if is_truthy(data.get("success")) {
        "SUCCESS"
    } else {
        "FAILED"
    };
    format!("Connection test completed: {}", verdict)
}

pub const LIST_SERVERS: ForwardRoute = ForwardRoute {
    endpoint: BackendEndpoint::McpServers,
    is_success: is_2xx,
    failure_message: "Failed to fetch MCP servers",
    envelope: Envelope::Plain,
    required: None,
    summary: fetched_servers,
};

pub const UPDATE_SERVERS: ForwardRoute = ForwardRoute {
    endpoint: BackendEndpoint::McpServers,
    is_success: is_2xx,
    failure_message: "Failed to update MCP servers",
    envelope: Envelope::Plain,
    required: None,
    summary: updated_servers,
};

pub const TEST_SERVER: ForwardRoute = ForwardRoute {
    endpoint: BackendEndpoint::McpServerTest,
    is_success: is_2xx,
    failure_message: "Failed to test MCP server connection",
    envelope: Envelope::ConnectionCheck,
    required: Some(RequiredField {
        name: "hostname",
        message: "Hostname is required",
    }),
    summary: connection_verdict,
};

/// The inbound side of a forwarded call.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    /// Raw inbound body. Parsed as JSON only for methods that carry one.
    pub body: Option<Bytes>,
    pub request_id: Option<String>,
}

impl ForwardedRequest {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            request_id: None,
        }
    }

    pub fn post(body: Bytes) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

pub struct Gateway {
    backend: Arc<BackendClient>,
}

impl Gateway {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Forward `request` according to `route` and shape the reply.
    pub async fn forward(
        &self,
        route: &ForwardRoute,
        request: ForwardedRequest,
    ) -> Result<Response, AppError> {
        let endpoint = route.endpoint.name();

        let body = match parse_body(&request) {
            Ok(body) => body,
            Err(e) => return Err(failure(route, e)),
        };

        if let Some(required) = route.required {
            if !has_field(body.as_ref(), required.name) {
                tracing::warn!(
                    endpoint = endpoint,
                    field = required.name,
                    "Rejected request missing required field"
                );
                return Err(AppError::BadRequest(anyhow::anyhow!(required.message)));
            }
        }

        let started = Instant::now();
        let outcome = self.call(route, &request, body.as_ref()).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(data) => {
                record_backend_call(endpoint, "success", elapsed);
                tracing::info!(
                    endpoint = endpoint,
                    method = %request.method,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "{}",
                    (route.summary)(&data)
                );

                Ok((
                    StatusCode::OK,
                    [(header::CACHE_CONTROL, "no-cache")],
                    Json(data),
                )
                    .into_response())
            }
            Err(e) => {
                record_backend_call(endpoint, "failure", elapsed);
                Err(failure(route, e))
            }
        }
    }

    async fn call(
        &self,
        route: &ForwardRoute,
        request: &ForwardedRequest,
        body: Option<&Value>,
    ) -> Result<Value, ForwardError> {
        let response = self
            .backend
            .send(
                route.endpoint,
                request.method.clone(),
                body,
                request.request_id.as_deref(),
            )
            .await?;

        let status = response.status();
        if !(route.is_success)(status) {
            tracing::error!(
                endpoint = route.endpoint.name(),
                status = status.as_u16(),
                "Backend returned an error status"
            );
            return Err(ForwardError::Status(status));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ForwardError::Decode)
    }
}

/// GET bodies are ignored; anything else must be JSON.
fn parse_body(request: &ForwardedRequest) -> Result<Option<Value>, ForwardError> {
    if request.method == Method::GET {
        return Ok(None);
    }

    match &request.body {
        Some(bytes) => serde_json::from_slice(bytes)
            .map(Some)
            .map_err(ForwardError::InvalidRequestBody),
        None => Ok(None),
    }
}

/// A field is present when it is truthy: `null`, `false`, `0` and `""`
/// count as missing, and so does any field of a non-object body.
fn has_field(body: Option<&Value>, name: &str) -> bool {
    is_truthy(body.and_then(|b| b.get(name)))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

/// Fold any failure into the route's error envelope, keeping the whole
/// source chain in `details`.
fn failure(route: &ForwardRoute, err: ForwardError) -> AppError {
    let details = error_chain(&err);
    tracing::error!(
        endpoint = route.endpoint.name(),
        error = %details,
        "{}",
        route.failure_message
    );

    match route.envelope {
        Envelope::Plain => AppError::upstream(route.failure_message, details),
        Envelope::ConnectionCheck => AppError::upstream_check(route.failure_message, details),
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
