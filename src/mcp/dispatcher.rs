//! JSON-RPC dispatch
//!
//! [`Dispatcher`] turns one decoded JSON-RPC message into at most one
//! response:
//!
//! - no `id` -> notification: logged, never answered, whatever happens
//! - `id` present, unknown method -> `-32601`
//! - handler result carrying a string `error` -> `-32000` with that message
//! - handler failure or panic -> `-32000` with its description
//! - otherwise -> success envelope wrapping the handler result
//!
//! The method table is the closed [`Method`] enumeration.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};

use crate::error::Result;
use crate::mcp::types::{
    JsonRpcRequest, JsonRpcResponse, APPLICATION_ERROR, INVALID_REQUEST, METHOD_INITIALIZE,
    METHOD_INITIALIZED, METHOD_NOT_FOUND, METHOD_RESOURCES_LIST, METHOD_RESOURCES_READ,
    METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, NOTIFICATION_PREFIX,
};
use crate::remote::RemoteApi;
use crate::tools;

/// The JSON-RPC methods the proxy answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
}

impl Method {
    /// Look up a method by its wire name.
    ///
    /// # Examples
    ///
    /// ```
    /// use vap_mcp_proxy::mcp::dispatcher::Method;
    ///
    /// assert_eq!(Method::from_name("tools/call"), Some(Method::ToolsCall));
    /// assert_eq!(Method::from_name("prompts/list"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            METHOD_INITIALIZE => Some(Self::Initialize),
            METHOD_TOOLS_LIST => Some(Self::ToolsList),
            METHOD_TOOLS_CALL => Some(Self::ToolsCall),
            METHOD_RESOURCES_LIST => Some(Self::ResourcesList),
            METHOD_RESOURCES_READ => Some(Self::ResourcesRead),
            _ => None,
        }
    }

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Self::Initialize => METHOD_INITIALIZE,
            Self::ToolsList => METHOD_TOOLS_LIST,
            Self::ToolsCall => METHOD_TOOLS_CALL,
            Self::ResourcesList => METHOD_RESOURCES_LIST,
            Self::ResourcesRead => METHOD_RESOURCES_READ,
        }
    }

    /// Run the handler for this method.
    async fn handle(self, remote: &dyn RemoteApi, params: &Value) -> Result<Value> {
        let forwarded = match self {
            Self::ToolsCall => return tools::call_tool(remote, params).await,
            Self::Initialize => {
                let payload = json!({
                    "protocolVersion": params.get("protocolVersion").cloned().unwrap_or(Value::Null),
                    "capabilities": params.get("capabilities").cloned().unwrap_or_else(|| json!({})),
                    "clientInfo": params.get("clientInfo").cloned().unwrap_or_else(|| json!({})),
                });
                remote.post_mcp("/initialize", Some(payload)).await
            }
            Self::ToolsList => remote.post_mcp("/tools/list", Some(json!({}))).await,
            Self::ResourcesList => remote.post_mcp("/resources/list", Some(json!({}))).await,
            Self::ResourcesRead => {
                let uri = params.get("uri").cloned().unwrap_or(Value::Null);
                remote
                    .post_mcp("/resources/read", Some(json!({ "params": { "uri": uri } })))
                    .await
            }
        };
        Ok(forwarded.unwrap_or_else(|e| e.into_value()))
    }
}

/// Routes JSON-RPC messages to their handlers.
///
/// Cheap to clone; the remote client is shared read-only between requests.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    remote: Arc<dyn RemoteApi>,
}

impl Dispatcher {
    /// Create a dispatcher forwarding to `remote`.
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self { remote }
    }

    /// Dispatch an already-decoded JSON value.
    ///
    /// Values that are not JSON-RPC request objects are answered with
    /// `-32600` keyed to the `id` they carry, or `null`. A malformed object
    /// without an `id` is still a notification and gets no answer.
    ///
    /// # Returns
    ///
    /// `None` for notifications, otherwise exactly one response.
    pub async fn dispatch_value(&self, message: Value) -> Option<JsonRpcResponse> {
        let recovered_id = message.get("id").cloned();
        let is_object = message.is_object();
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.dispatch(request).await,
            Err(e) if is_object && recovered_id.is_none() => {
                tracing::warn!("Ignoring malformed notification: {}", e);
                None
            }
            Err(e) => {
                tracing::error!("Invalid JSON-RPC message: {}", e);
                Some(JsonRpcResponse::failure(
                    recovered_id.unwrap_or(Value::Null),
                    INVALID_REQUEST,
                    "Invalid Request",
                ))
            }
        }
    }

    /// Dispatch a decoded JSON-RPC message.
    ///
    /// # Returns
    ///
    /// `None` for notifications, otherwise exactly one response.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request.method);
            return None;
        };

        tracing::info!("Processing method: {}", request.method);

        let Some(method) = Method::from_name(&request.method) else {
            tracing::warn!("Unknown method: {}", request.method);
            return Some(JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ));
        };

        let params = request.params_or_empty();
        let outcome = AssertUnwindSafe(method.handle(self.remote.as_ref(), &params))
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(Ok(result)) => match result.get("error") {
                Some(Value::String(message)) => {
                    tracing::error!("{} failed: {}", method.name(), message);
                    JsonRpcResponse::failure(id, APPLICATION_ERROR, message.clone())
                }
                _ => JsonRpcResponse::success(id, result),
            },
            Ok(Err(e)) => {
                tracing::error!("Handler error: {:#}", e);
                JsonRpcResponse::failure(id, APPLICATION_ERROR, e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("Handler panicked: {}", message);
                JsonRpcResponse::failure(id, APPLICATION_ERROR, message)
            }
        };
        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        if method == METHOD_INITIALIZED {
            tracing::info!("Client initialized successfully");
        } else if method.starts_with(NOTIFICATION_PREFIX) {
            tracing::debug!("Received notification: {}", method);
        } else {
            tracing::warn!("Unknown notification: {}", method);
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}
