//! `tools/call` handling
//!
//! Three tools are normalized locally before (or instead of) reaching the
//! remote service:
//!
//! - `generate_video` -- see [`video::generate_video`]
//! - `estimate_video_cost` -- see [`video::estimate_video_cost`]
//! - `get_task` -- see [`task::get_task`]
//!
//! Every other tool name is forwarded verbatim as `{name, arguments}` to the
//! tool-protocol `/tools/call` endpoint.

use serde_json::{json, Value};

use crate::error::Result;
use crate::mcp::types::CallToolParams;
use crate::remote::RemoteApi;

pub mod task;
pub mod video;

/// Tools with bespoke handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTool {
    GenerateVideo,
    EstimateVideoCost,
    GetTask,
}

impl LocalTool {
    /// Map a tool name onto a locally handled tool, if it is one.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "generate_video" => Some(Self::GenerateVideo),
            "estimate_video_cost" => Some(Self::EstimateVideoCost),
            "get_task" => Some(Self::GetTask),
            _ => None,
        }
    }

    /// Run the tool and serialize its result.
    pub async fn call(self, remote: &dyn RemoteApi, arguments: &Value) -> Result<Value> {
        let result = match self {
            Self::GenerateVideo => video::generate_video(remote, arguments).await,
            Self::EstimateVideoCost => video::estimate_video_cost(arguments),
            Self::GetTask => task::get_task(remote, arguments).await,
        };
        Ok(serde_json::to_value(result)?)
    }
}

/// Handle a `tools/call` request.
///
/// # Returns
///
/// The JSON result for the JSON-RPC response. A failed generic forward
/// yields `{"error": message}`, which the dispatcher reports as a JSON-RPC
/// error; failures inside locally handled tools are flagged tool results
/// instead.
pub async fn call_tool(remote: &dyn RemoteApi, params: &Value) -> Result<Value> {
    let CallToolParams { name, arguments } = CallToolParams::from_params(params);

    if let Some(tool) = LocalTool::from_name(&name) {
        tracing::debug!("Handling tool locally: {}", name);
        return tool.call(remote, &arguments).await;
    }

    let payload = json!({ "name": name, "arguments": arguments });
    Ok(remote
        .post_mcp("/tools/call", Some(payload))
        .await
        .unwrap_or_else(|e| e.into_value()))
}

/// Render a JSON value for human-readable text: strings without quotes,
/// `null` as `N/A`, everything else as compact JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}
