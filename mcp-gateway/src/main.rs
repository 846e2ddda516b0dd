use dotenvy::dotenv;
use mcp_gateway::config::GatewayConfig;
use mcp_gateway::startup::Application;
use service_core::observability::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = GatewayConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "mcp-gateway",
        &configuration.common.log_level,
        configuration.common.otlp_endpoint.as_deref(),
    );

    let application = Application::build(configuration).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    tracing::info!("mcp-gateway stopped");
    Ok(())
}
