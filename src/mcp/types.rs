//! JSON-RPC 2.0 primitives and the MCP wire types used by the proxy
//!
//! Only the subset of the Model Context Protocol that the proxy actually
//! touches is modelled here. Everything the remote service returns for
//! `initialize`, `tools/list`, and `resources/*` is passed through as an
//! opaque [`serde_json::Value`]; the proxy only builds `tools/call` results
//! itself. Struct fields are `camelCase` on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// JSON-RPC method constants
// ---------------------------------------------------------------------------

/// Lifecycle: client sends `initialize` to open a session.
pub const METHOD_INITIALIZE: &str = "initialize";
/// Lifecycle: client sends `notifications/initialized` after the server ACKs.
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
/// Request the list of available tools.
pub const METHOD_TOOLS_LIST: &str = "tools/list";
/// Invoke a named tool.
pub const METHOD_TOOLS_CALL: &str = "tools/call";
/// Request the list of available resources.
pub const METHOD_RESOURCES_LIST: &str = "resources/list";
/// Read the contents of a resource by URI.
pub const METHOD_RESOURCES_READ: &str = "resources/read";

/// Namespace prefix shared by all MCP notifications.
pub const NOTIFICATION_PREFIX: &str = "notifications/";

// ---------------------------------------------------------------------------
// JSON-RPC error codes
// ---------------------------------------------------------------------------

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Application-level failure while handling a request.
pub const APPLICATION_ERROR: i64 = -32000;

/// The JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 wire types
// ---------------------------------------------------------------------------

/// An inbound JSON-RPC 2.0 message (request or notification).
///
/// `id` distinguishes the two: an absent `id` makes the message a
/// notification, while any present `id` -- including an explicit `null` --
/// makes it a request that must be answered.
///
/// # Examples
///
/// ```
/// use vap_mcp_proxy::mcp::types::JsonRpcRequest;
///
/// let req: JsonRpcRequest =
///     serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"tools/list"}"#).unwrap();
/// assert!(!req.is_notification());
///
/// let note: JsonRpcRequest =
///     serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
/// assert!(note.is_notification());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version identifier; expected to be `"2.0"` but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    /// Request correlation identifier. `Some(Value::Null)` for an explicit
    /// `null`, `None` when the key is absent.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    /// The method name to invoke.
    #[serde(default)]
    pub method: String,
    /// Optional method parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Whether this message is a notification (no response is ever sent).
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Parameters, with `null` or absent treated as an empty object.
    pub fn params_or_empty(&self) -> Value {
        match &self.params {
            Some(Value::Null) | None => Value::Object(Default::default()),
            Some(params) => params.clone(),
        }
    }
}

/// Deserialize a field that is present in the input, keeping `null` as
/// `Some(Value::Null)` rather than collapsing it to `None`.
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A JSON-RPC 2.0 response object.
///
/// `id` is always serialized (as `null` when the request id could not be
/// recovered). Exactly one of `result` or `error` is present; use
/// [`JsonRpcResponse::success`] and [`JsonRpcResponse::failure`] to build
/// one.
///
/// # Examples
///
/// ```
/// use vap_mcp_proxy::mcp::types::JsonRpcResponse;
///
/// let resp = JsonRpcResponse::failure(serde_json::json!(7), -32601, "Method not found: foo/bar");
/// let json = serde_json::to_value(&resp).unwrap();
/// assert_eq!(json["error"]["code"], -32601);
/// assert!(json.get("result").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// Protocol version identifier; always `"2.0"`.
    pub jsonrpc: String,
    /// Mirrors the `id` from the corresponding request.
    pub id: Value,
    /// Successful result value; mutually exclusive with `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error object; mutually exclusive with `result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success envelope.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error envelope.
    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Parse-error envelope keyed to a `null` id.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::failure(Value::Null, PARSE_ERROR, message)
    }

    /// Whether this envelope carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A JSON-RPC 2.0 error object.
///
/// Implements `Display` as `"JSON-RPC error {code}: {message}"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable error description.
    pub message: String,
    /// Optional additional error context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

// ---------------------------------------------------------------------------
// Tool types
// ---------------------------------------------------------------------------

/// Parameters for a `tools/call` request.
///
/// Missing or `null` fields default to an empty name and an empty argument
/// object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to invoke.
    #[serde(default)]
    pub name: String,
    /// Arguments to pass to the tool.
    #[serde(default)]
    pub arguments: Value,
}

impl CallToolParams {
    /// Extract from raw `tools/call` params without failing.
    ///
    /// A non-string `name` is treated as empty; a `null` or absent
    /// `arguments` becomes `{}`.
    pub fn from_params(params: &Value) -> Self {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let arguments = match params.get("arguments") {
            Some(Value::Null) | None => Value::Object(Default::default()),
            Some(args) => args.clone(),
        };
        Self { name, arguments }
    }
}

/// Result of a `tools/call` produced locally by the proxy.
///
/// # Examples
///
/// ```
/// use vap_mcp_proxy::mcp::types::CallToolResult;
///
/// let ok = serde_json::to_value(CallToolResult::text("done")).unwrap();
/// assert!(ok.get("isError").is_none());
///
/// let err = serde_json::to_value(CallToolResult::error("Error: prompt is required")).unwrap();
/// assert_eq!(err["isError"], true);
/// assert_eq!(err["content"][0]["type"], "text");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// The content items produced by the tool.
    pub content: Vec<ToolResponseContent>,
    /// When `true`, the tool signalled an error condition within its content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    /// A successful result with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResponseContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    /// An error-flagged result with a single text item.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResponseContent::Text { text: text.into() }],
            is_error: Some(true),
        }
    }

    /// Whether this result is flagged as an error.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Concatenated text of all text items.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|item| match item {
                ToolResponseContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single content item in a tool result.
///
/// Discriminated by the `"type"` field on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolResponseContent {
    /// Plain text output.
    Text {
        /// The text content.
        text: String,
    },
}
