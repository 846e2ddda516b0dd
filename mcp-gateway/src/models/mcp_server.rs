use serde::{Deserialize, Serialize};

/// An MCP server registration as the backend stores it. The gateway relays
/// these bodies untouched; the type documents the wire format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub id: String,
    pub name: String,
    pub hostname: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_connected: Option<bool>,
}

/// Body of `POST /api/mcp-servers/test`. Extra fields pass through.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConnectionTestRequest {
    pub hostname: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Backend verdict for a connection test.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConnectionTestResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
