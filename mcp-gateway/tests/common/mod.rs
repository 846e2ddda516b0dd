use mcp_gateway::config::{BackendSettings, GatewayConfig};
use mcp_gateway::startup::Application;
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the gateway on a random port, forwarding to `backend_url`.
    pub async fn spawn(backend_url: &str) -> Self {
        let config = GatewayConfig {
            common: CoreConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                ..CoreConfig::default()
            },
            backend: BackendSettings::new(Some(backend_url.to_string())),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to build reqwest client");
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            client,
        }
    }

    pub async fn get_servers(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/api/mcp-servers", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_servers(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/mcp-servers", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_test(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/mcp-servers/test", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A base URL nothing listens on: bind an ephemeral port, then release it.
#[allow(dead_code)]
pub async fn unreachable_backend_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}
