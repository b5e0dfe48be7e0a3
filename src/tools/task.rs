//! Task status lookup (`get_task`)
//!
//! Fetches a task document from `GET /v3/tasks/{task_id}` and renders a
//! multi-line summary. Result shapes differ by task type, so the output URL
//! is picked out of the loosely-typed `result` object:
//!
//! - video: `result.video_url` or `result.output_url`
//! - image: `result.image_url` or `result.output_url`, else `items[0].image_url`
//! - music: `items[0].audio_url`

use std::fmt;

use serde_json::Value;
use url::Url;

use crate::mcp::types::CallToolResult;
use crate::remote::{RemoteApi, TASKS_ENDPOINT};
use crate::tools::display_value;

/// Lifecycle state of a remote task.
///
/// The set is open-ended; unrecognised values are kept verbatim in
/// [`TaskStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Queued,
    Executing,
    Completed,
    Failed,
    Other(String),
}

impl TaskStatus {
    /// Whether the task has not reached a terminal state yet.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Queued | Self::Executing)
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "queued" => Self::Queued,
            "executing" => Self::Executing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(s) => s.as_str(),
        };
        f.write_str(s)
    }
}

/// Task document returned by the task endpoint.
///
/// Every field is optional on the wire; costs are kept as raw JSON because
/// the service sends them as numbers or strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteTask {
    pub status: Option<String>,
    pub task_type: Option<String>,
    pub estimated_cost: Option<Value>,
    pub actual_cost: Option<Value>,
    pub error_message: Option<String>,
    pub result: Option<Value>,
}

impl RemoteTask {
    /// Read each field on its own so one odd field never hides the rest.
    ///
    /// Text fields holding a non-string value are rendered as JSON text;
    /// `null` counts as absent.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| -> Option<String> {
            match value.get(key)? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(display_value(other)),
            }
        };
        let raw = |key: &str| value.get(key).filter(|v| !v.is_null()).cloned();

        Self {
            status: text("status"),
            task_type: text("type"),
            estimated_cost: raw("estimated_cost"),
            actual_cost: raw("actual_cost"),
            error_message: text("error_message"),
            result: raw("result"),
        }
    }

    /// Status, `"unknown"` when absent.
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from(self.status.as_deref().unwrap_or("unknown"))
    }

    /// Output URLs found in the result.
    pub fn outputs(&self) -> TaskOutputs {
        self.result
            .as_ref()
            .map(TaskOutputs::from_result)
            .unwrap_or_default()
    }
}

/// Candidate output URLs of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutputs {
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

impl TaskOutputs {
    /// Extract URLs from a task `result` object.
    pub fn from_result(result: &Value) -> Self {
        let url = |value: &Value, key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let output_url = url(result, "output_url");
        let video_url = url(result, "video_url").or_else(|| output_url.clone());
        let mut image_url = url(result, "image_url").or(output_url);

        let first_item = result
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first());

        let mut audio_url = None;
        if let Some(item) = first_item {
            audio_url = url(item, "audio_url");
            if image_url.is_none() {
                image_url = url(item, "image_url");
            }
        }

        Self {
            audio_url,
            video_url,
            image_url,
        }
    }

    /// Line announcing the preferred output: audio, then video, then image.
    pub fn summary_line(&self) -> Option<String> {
        if let Some(url) = &self.audio_url {
            Some(format!("\n🎵 Audio URL: {}", url))
        } else if let Some(url) = &self.video_url {
            Some(format!("\n🎬 Video URL: {}", url))
        } else {
            self.image_url
                .as_ref()
                .map(|url| format!("\n🖼️ Image URL: {}", url))
        }
    }
}

/// Whether a cost value should be shown; absent, `null`, zero and `""` are
/// not.
fn is_reportable_cost(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "N/A",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render the summary text for a fetched task.
pub fn render_task_summary(task_id: &str, task: &RemoteTask) -> String {
    let status = task.status();
    let estimated_cost = task
        .estimated_cost
        .as_ref()
        .map(display_value)
        .unwrap_or_else(|| "N/A".to_string());

    let mut lines = vec![
        format!("Task: {}", task_id),
        format!("Type: {}", task.task_type.as_deref().unwrap_or("unknown")),
        format!("Status: {}", status),
        format!("Estimated Cost: ${}", estimated_cost),
    ];

    if let Some(actual) = task.actual_cost.as_ref().filter(|v| is_reportable_cost(v)) {
        lines.push(format!("Actual Cost: ${}", display_value(actual)));
    }

    match &status {
        TaskStatus::Completed => {
            if let Some(line) = task.outputs().summary_line() {
                lines.push(line);
            }
        }
        TaskStatus::Failed => {
            if let Some(message) = task.error_message.as_deref().filter(|m| !m.is_empty()) {
                lines.push(format!("\n❌ Error: {}", message));
            }
        }
        s if s.is_in_progress() => {
            lines.push(format!("\n⏳ Task is still {}. Check again shortly.", s));
        }
        _ => {}
    }

    lines.join("\n")
}

/// Read `task_id` from tool arguments; strings and numbers are accepted.
fn task_id_argument(arguments: &Value) -> Option<String> {
    match arguments.get("task_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Endpoint for one task, with `task_id` percent-encoded as a single path
/// segment. `.` and `..` cannot be expressed as a segment and yield `None`.
fn task_endpoint(task_id: &str) -> Option<String> {
    if matches!(task_id, "." | "..") {
        return None;
    }
    let mut url = Url::parse("http://task.invalid").ok()?.join(TASKS_ENDPOINT).ok()?;
    url.path_segments_mut().ok()?.push(task_id);
    Some(url.path().to_string())
}

/// Handle `get_task`.
pub async fn get_task(remote: &dyn RemoteApi, arguments: &Value) -> CallToolResult {
    let Some(task_id) = task_id_argument(arguments) else {
        return CallToolResult::error("Error: task_id is required");
    };
    let Some(endpoint) = task_endpoint(&task_id) else {
        return CallToolResult::error(format!("Error: invalid task_id: {}", task_id));
    };

    let response = match remote.get_v3(&endpoint).await {
        Ok(response) => response,
        Err(e) => return CallToolResult::error(format!("Error: {}", e)),
    };

    if let Some(error) = response.get("error") {
        return CallToolResult::error(format!("Error: {}", display_value(error)));
    }

    let task = RemoteTask::from_value(&response);
    CallToolResult::text(render_task_summary(&task_id, &task))
}
