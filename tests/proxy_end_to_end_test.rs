//! End-to-end dispatch tests
//!
//! Drives `Dispatcher` with raw JSON-RPC messages while `HttpRemote` talks to
//! a `wiremock` server, covering every method in the table and the local
//! tool handlers.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vap_mcp_proxy::config::Config;
use vap_mcp_proxy::mcp::Dispatcher;
use vap_mcp_proxy::remote::http::HttpRemote;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dispatcher_for(server: &MockServer) -> Dispatcher {
    let config = Config {
        api_key: Some("sk-e2e".to_string()),
        api_url: format!("{}/mcp", server.uri()),
        api_base_url: server.uri(),
        debug: false,
    };
    Dispatcher::new(Arc::new(HttpRemote::new(&config).expect("client builds")))
}

/// Dispatch one message and return the serialized response.
async fn call(dispatcher: &Dispatcher, message: Value) -> Value {
    let response = dispatcher
        .dispatch_value(message)
        .await
        .expect("request must be answered");
    serde_json::to_value(response).unwrap()
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Forwarded methods
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_initialize_forwards_handshake_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/initialize"))
        .and(body_json(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "inspector"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"serverInfo": {"name": "vap"}})))
        .expect(1)
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {"protocolVersion": "2024-11-05", "clientInfo": {"name": "inspector"}}
        }),
    )
    .await;

    assert_eq!(
        response,
        json!({"jsonrpc": "2.0", "id": 1, "result": {"serverInfo": {"name": "vap"}}})
    );
}

#[tokio::test]
async fn test_resources_read_wraps_uri() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/resources/read"))
        .and(body_json(json!({"params": {"uri": "vap://pricing"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contents": []})))
        .expect(1)
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({"jsonrpc": "2.0", "id": "r", "method": "resources/read", "params": {"uri": "vap://pricing"}}),
    )
    .await;
    assert_eq!(response["result"], json!({"contents": []}));
}

#[tokio::test]
async fn test_remote_failure_becomes_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/tools/list"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/list"}),
    )
    .await;
    assert_eq!(response["id"], 5);
    assert_eq!(response["error"]["code"], -32000);
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_unknown_tool_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mcp/tools/call"))
        .and(body_json(json!({"name": "generate_image", "arguments": {"prompt": "cat"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "queued"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({
            "jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": {"name": "generate_image", "arguments": {"prompt": "cat"}}
        }),
    )
    .await;
    assert_eq!(tool_text(&response), "queued");
}

// ---------------------------------------------------------------------------
// Local tools
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_generate_video_posts_normalized_task() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/tasks"))
        .and(body_json(json!({
            "type": "video",
            "params": {
                "prompt": "a fox in snow",
                "duration": 8,
                "aspect_ratio": "16:9",
                "resolution": "720p",
                "generate_audio": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "vid-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": {"name": "generate_video", "arguments": {
                "prompt": "a fox in snow", "duration": 10, "aspect_ratio": "4:3"
            }}
        }),
    )
    .await;

    let text = tool_text(&response);
    assert!(text.contains("Task ID: vid-1"), "{text}");
    assert!(text.contains("Duration: 8 seconds"));
    assert!(text.contains("Aspect Ratio: 16:9"));
    assert!(text.contains("Estimated Cost: $4.80"));
    assert!(response["result"].get("isError").is_none());
}

#[tokio::test]
async fn test_generate_video_insufficient_balance_is_tool_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/tasks"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({"detail": {"message": "Insufficient balance"}})),
        )
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({
            "jsonrpc": "2.0", "id": 4, "method": "tools/call",
            "params": {"name": "generate_video", "arguments": {"prompt": "x"}}
        }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(tool_text(&response), "Error: Insufficient balance");
}

#[tokio::test]
async fn test_estimate_video_cost_never_calls_remote() {
    let server = MockServer::start().await;

    let response = call(
        &dispatcher_for(&server),
        json!({
            "jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "estimate_video_cost", "arguments": {"duration": 4, "generate_audio": false}}
        }),
    )
    .await;

    assert!(tool_text(&response).contains("$1.96"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_task_completed_video() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/tasks/vid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "type": "video",
            "estimated_cost": "4.80",
            "actual_cost": "4.80",
            "result": {"video_url": "https://cdn.example/v.mp4"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = call(
        &dispatcher_for(&server),
        json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/call",
            "params": {"name": "get_task", "arguments": {"task_id": "vid-1"}}
        }),
    )
    .await;

    let text = tool_text(&response);
    assert!(text.starts_with("Task: vid-1\nType: video\nStatus: completed"), "{text}");
    assert!(text.contains("Actual Cost: $4.80"));
    assert!(text.contains("Video URL: https://cdn.example/v.mp4"));
}

#[tokio::test]
async fn test_get_task_id_stays_inside_tasks_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "balance"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/tasks/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued", "type": "image"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/tasks/..%2Fbalance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued", "type": "video"})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    for (id, task_id) in [(9, "a/b"), (10, "../balance")] {
        let response = call(
            &dispatcher,
            json!({
                "jsonrpc": "2.0", "id": id, "method": "tools/call",
                "params": {"name": "get_task", "arguments": {"task_id": task_id}}
            }),
        )
        .await;
        let text = tool_text(&response);
        assert!(text.starts_with(&format!("Task: {}\n", task_id)), "{text}");
        assert!(text.contains("Task is still queued"), "{text}");
    }

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, ["/v3/tasks/a%2Fb", "/v3/tasks/..%2Fbalance"]);
}

// ---------------------------------------------------------------------------
// Envelope rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_notification_never_reaches_remote() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher_for(&server);

    let response = dispatcher
        .dispatch_value(json!({"jsonrpc": "2.0", "method": "tools/list"}))
        .await;

    assert!(response.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_method_not_forwarded() {
    let server = MockServer::start().await;

    let response = call(
        &dispatcher_for(&server),
        json!({"jsonrpc": "2.0", "id": 8, "method": "prompts/list"}),
    )
    .await;

    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Method not found: prompts/list");
    assert!(server.received_requests().await.unwrap().is_empty());
}
