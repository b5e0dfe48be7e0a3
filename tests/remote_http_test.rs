//! Remote HTTP client integration tests
//!
//! Exercises `HttpRemote` against a `wiremock` stand-in for the VAP API:
//! URL composition, bearer credentials, and the error messages surfaced for
//! failed task-API calls.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vap_mcp_proxy::config::Config;
use vap_mcp_proxy::remote::http::HttpRemote;
use vap_mcp_proxy::remote::RemoteApi;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Config pointing both remote endpoints at the mock server.
fn config_for(server: &MockServer, api_key: Option<&str>) -> Config {
    Config {
        api_key: api_key.map(str::to_string),
        api_url: format!("{}/mcp", server.uri()),
        api_base_url: server.uri(),
        debug: false,
    }
}

fn remote_for(server: &MockServer) -> HttpRemote {
    HttpRemote::new(&config_for(server, Some("sk-test"))).expect("client builds")
}

// ---------------------------------------------------------------------------
// Protocol endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_post_mcp_sends_bearer_and_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/tools/list"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tools": [{"name": "x"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = remote_for(&server).post_mcp("/tools/list", None).await.unwrap();
    assert_eq!(reply["tools"][0]["name"], "x");
}

#[tokio::test]
async fn test_post_mcp_without_key_sends_no_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let remote = HttpRemote::new(&config_for(&server, None)).unwrap();
    remote.post_mcp("/initialize", Some(json!({}))).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0]
        .headers
        .iter()
        .any(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization")));
}

#[tokio::test]
async fn test_post_mcp_http_error_is_remote_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = remote_for(&server).post_mcp("/tools/call", None).await.unwrap_err();
    assert!(err.to_string().contains("500"), "got: {err}");
}

#[tokio::test]
async fn test_post_mcp_non_json_reply_is_remote_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert!(remote_for(&server).post_mcp("/tools/list", None).await.is_err());
}

#[tokio::test]
async fn test_unreachable_remote_is_remote_error() {
    let config = Config {
        api_key: None,
        api_url: "http://127.0.0.1:1/mcp".to_string(),
        api_base_url: "http://127.0.0.1:1".to_string(),
        debug: false,
    };
    let remote = HttpRemote::new(&config).unwrap();
    assert!(remote.post_mcp("/tools/list", None).await.is_err());
    assert!(remote.get_v3("/v3/tasks/abc").await.is_err());
}

// ---------------------------------------------------------------------------
// Task endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_post_v3_uses_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/tasks"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t-9"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = remote_for(&server)
        .post_v3("/v3/tasks", Some(json!({"type": "video"})))
        .await
        .unwrap();
    assert_eq!(reply["task_id"], "t-9");
}

#[tokio::test]
async fn test_post_v3_prefers_detail_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/tasks"))
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(json!({"detail": {"message": "Insufficient balance", "code": "E402"}})),
        )
        .mount(&server)
        .await;

    let err = remote_for(&server).post_v3("/v3/tasks", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Insufficient balance");
}

#[tokio::test]
async fn test_post_v3_detail_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "prompt too long"})))
        .mount(&server)
        .await;

    let err = remote_for(&server).post_v3("/v3/tasks", None).await.unwrap_err();
    assert_eq!(err.to_string(), "prompt too long");
}

#[tokio::test]
async fn test_post_v3_plain_text_body_truncated() {
    let server = MockServer::start().await;
    let long = "x".repeat(800);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string(long))
        .mount(&server)
        .await;

    let err = remote_for(&server).post_v3("/v3/tasks", None).await.unwrap_err();
    assert_eq!(err.to_string().chars().count(), 500);
}

#[tokio::test]
async fn test_get_v3_fetches_task() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/tasks/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = remote_for(&server).get_v3("/v3/tasks/abc").await.unwrap();
    assert_eq!(reply["status"], "queued");
}

#[tokio::test]
async fn test_get_v3_not_found_is_remote_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = remote_for(&server).get_v3("/v3/tasks/missing").await.unwrap_err();
    assert!(err.to_string().contains("404"), "got: {err}");
}
