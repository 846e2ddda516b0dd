pub mod app;
pub mod mcp_servers;
pub mod metrics;
