use serde_json::Value;

mod common;
use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn("http://127.0.0.1:9").await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("response should carry a request id");
    assert!(uuid::Uuid::parse_str(&request_id).is_ok());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "mcp-gateway");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = TestApp::spawn("http://127.0.0.1:9").await;

    // One forwarded call so the backend counters have a sample
    let _ = app.get_servers().await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("backend_requests_total"));
    assert!(text.contains("endpoint=\"mcp_servers\""));
}

#[tokio::test]
async fn http_request_series_reach_metrics_endpoint() {
    let app = TestApp::spawn("http://127.0.0.1:9").await;

    let _ = app.get_servers().await;

    let text = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .unwrap();

    assert!(text.contains("http_requests_total"));
    assert!(text.contains("path=\"/api/mcp-servers\""));
    assert!(text.contains("http_request_duration_seconds"));
}
