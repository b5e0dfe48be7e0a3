//! HTTP transport for MCP inspectors
//!
//! This module implements the connection-oriented front-end: a small axum
//! server exposing
//!
//! - `GET /` and `GET /health` -- unauthenticated status document
//! - `POST /` -- one JSON-RPC message per request body
//! - `OPTIONS *` -- CORS pre-flight, `200` with no body
//!
//! Every response carries permissive CORS headers.
//!
//! # Status codes
//!
//! | Outcome                         | Status | Body                          |
//! |---------------------------------|--------|-------------------------------|
//! | request answered                | 200    | JSON-RPC response             |
//! | notification                    | 200    | `{"status":"ok"}`             |
//! | empty or malformed JSON body    | 400    | JSON-RPC parse error          |
//! | unexpected internal failure     | 500    | JSON-RPC `-32000` error       |
//! | unknown GET path                | 404    | `{"error":"Not found"}`       |
//!
//! Requests are independent: no state is shared between them apart from the
//! read-only [`Dispatcher`].

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::error::{ProxyError, Result};
use crate::mcp::dispatcher::Dispatcher;
use crate::mcp::types::{JsonRpcResponse, APPLICATION_ERROR};
use crate::remote::truncate;

/// Server name reported by the health endpoint.
pub const SERVER_NAME: &str = "VAP MCP Proxy";

/// Maximum characters of a request body written to debug logs.
const MAX_LOGGED_BODY_CHARS: usize = 500;

/// Build the axum router for the HTTP transport.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vap_mcp_proxy::config::Config;
/// use vap_mcp_proxy::mcp::dispatcher::Dispatcher;
/// use vap_mcp_proxy::mcp::transport::http::router;
/// use vap_mcp_proxy::remote::http::HttpRemote;
///
/// let remote = HttpRemote::new(&Config::default()).unwrap();
/// let app = router(Dispatcher::new(Arc::new(remote)));
/// ```
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/", get(health_handler).post(rpc_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(cors_middleware))
        .with_state(dispatcher)
}

/// Bind `0.0.0.0:port` and serve until the process is stopped.
///
/// # Errors
///
/// Returns [`ProxyError::Transport`] if the port cannot be bound or the
/// server fails.
pub async fn serve(dispatcher: Dispatcher, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ProxyError::Transport(format!("failed to bind {}: {}", addr, e)))?;

    tracing::info!("VAP MCP HTTP Server listening on port {}", port);
    tracing::info!("Endpoints: POST / (JSON-RPC), GET /health");

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ProxyError::Transport(format!("HTTP server error: {}", e)))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down HTTP server...");
    }
}

/// Health document for `GET /` and `GET /health`.
pub fn health_document() -> Value {
    json!({
        "status": "ok",
        "server": SERVER_NAME,
        "mode": "http",
        "version": env!("CARGO_PKG_VERSION"),
    })
}

async fn health_handler() -> Json<Value> {
    Json(health_document())
}

async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

async fn rpc_handler(State(dispatcher): State<Dispatcher>, body: Bytes) -> (StatusCode, Json<Value>) {
    let (status, body) = handle_rpc_body(&dispatcher, &body).await;
    (status, Json(body))
}

/// Process one JSON-RPC POST body.
///
/// # Returns
///
/// The HTTP status and JSON body to send back. The body is always JSON,
/// including for notifications (`{"status":"ok"}`).
pub async fn handle_rpc_body(dispatcher: &Dispatcher, body: &[u8]) -> (StatusCode, Value) {
    if body.is_empty() {
        return parse_failure("Empty request body".to_string());
    }

    tracing::debug!(
        "HTTP Request: {}...",
        truncate(&String::from_utf8_lossy(body), MAX_LOGGED_BODY_CHARS)
    );

    let message: Value = match serde_json::from_slice(body) {
        Ok(message) => message,
        Err(e) => {
            tracing::error!("Invalid JSON: {}", e);
            return parse_failure(format!("Parse error: {}", e));
        }
    };

    match dispatcher.dispatch_value(message).await {
        None => (StatusCode::OK, json!({ "status": "ok" })),
        Some(response) => match serde_json::to_value(&response) {
            Ok(value) => (StatusCode::OK, value),
            Err(e) => {
                tracing::error!("HTTP handler error: {}", e);
                let failure = JsonRpcResponse::failure(Value::Null, APPLICATION_ERROR, e.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, envelope_value(&failure))
            }
        },
    }
}

fn parse_failure(message: String) -> (StatusCode, Value) {
    (
        StatusCode::BAD_REQUEST,
        envelope_value(&JsonRpcResponse::parse_error(message)),
    )
}

fn envelope_value(response: &JsonRpcResponse) -> Value {
    let error = response.error.as_ref();
    json!({
        "jsonrpc": response.jsonrpc,
        "id": response.id,
        "error": {
            "code": error.map(|e| e.code).unwrap_or(APPLICATION_ERROR),
            "message": error.map(|e| e.message.as_str()).unwrap_or_default(),
        }
    })
}

/// Answer pre-flight requests directly and add CORS headers to everything.
async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        (StatusCode::OK, Body::empty()).into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
