//! HTTP client for the backend service that owns MCP server configuration.

use crate::config::BackendSettings;
use reqwest::{Client, Method, header};
use serde_json::Value;
use service_core::observability::TracedClientExt;

/// Resources the gateway forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEndpoint {
    McpServers,
    McpServerTest,
}

impl BackendEndpoint {
    /// Path below the backend's `/api` prefix.
    pub fn path(self) -> &'static str {
        match self {
            BackendEndpoint::McpServers => "/mcp-servers",
            BackendEndpoint::McpServerTest => "/mcp-servers/test",
        }
    }

    /// Stable label for logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            BackendEndpoint::McpServers => "mcp_servers",
            BackendEndpoint::McpServerTest => "mcp_server_test",
        }
    }
}

/// Build an absolute backend URL: `{base_url}/api{path}`.
///
/// A missing leading slash on `path` is added and a trailing slash on
/// `base_url` is dropped.
pub fn api_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let url = if path.starts_with('/') {
        format!("{}/api{}", base, path)
    } else {
        format!("{}/api/{}", base, path)
    };

    tracing::debug!(url = %url, "Resolved backend URL");
    url
}

pub struct BackendClient {
    client: Client,
    base_url: String,
    mcp_servers_url: String,
    mcp_server_test_url: String,
}

impl BackendClient {
    /// Environment proxies are bypassed; the backend is an internal peer.
    pub fn new(settings: BackendSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().no_proxy().build()?;
        let mcp_servers_url = api_url(&settings.base_url, BackendEndpoint::McpServers.path());
        let mcp_server_test_url =
            api_url(&settings.base_url, BackendEndpoint::McpServerTest.path());

        Ok(Self {
            client,
            base_url: settings.base_url,
            mcp_servers_url,
            mcp_server_test_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `endpoint`, fixed at construction.
    pub fn url(&self, endpoint: BackendEndpoint) -> &str {
        match endpoint {
            BackendEndpoint::McpServers => &self.mcp_servers_url,
            BackendEndpoint::McpServerTest => &self.mcp_server_test_url,
        }
    }

    /// Issue a single JSON request to `endpoint` with trace context
    /// propagation. The body, when present, is sent as-is.
    pub async fn send(
        &self,
        endpoint: BackendEndpoint,
        method: Method,
        body: Option<&Value>,
        request_id: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = self.url(endpoint);

        let mut request = self
            .client
            .traced(method.clone(), url)
            .header(header::CONTENT_TYPE.as_str(), "application/json")
            .request_id(request_id);
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "Backend request failed");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_adds_missing_leading_slash() {
        assert_eq!(
            api_url("http://localhost:8000", "mcp-servers"),
            "http://localhost:8000/api/mcp-servers"
        );
        assert_eq!(
            api_url("http://localhost:8000", "/mcp-servers"),
            "http://localhost:8000/api/mcp-servers"
        );
    }

    #[test]
    fn api_url_does_not_double_slash_after_base() {
        assert_eq!(
            api_url("http://backend:9000/", "/mcp-servers/test"),
            "http://backend:9000/api/mcp-servers/test"
        );
    }

    #[test]
    fn default_settings_map_to_local_backend() {
        let client = BackendClient::new(BackendSettings::default()).unwrap();

        assert_eq!(
            client.url(BackendEndpoint::McpServers),
            "http://localhost:8000/api/mcp-servers"
        );
        assert_eq!(
            client.url(BackendEndpoint::McpServerTest),
            "http://localhost:8000/api/mcp-servers/test"
        );
    }

    #[test]
    fn endpoints_follow_configured_base_url() {
        let client = BackendClient::new(BackendSettings::new(Some(
            "http://10.1.2.3:8123".to_string(),
        )))
        .unwrap();

        assert_eq!(client.base_url(), "http://10.1.2.3:8123");
        assert_eq!(
            client.url(BackendEndpoint::McpServers),
            "http://10.1.2.3:8123/api/mcp-servers"
        );
    }
}
