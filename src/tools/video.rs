//! Video generation tools (Veo 3.1)
//!
//! `generate_video` creates a remote task of type `"video"`;
//! `estimate_video_cost` is answered locally from a fixed price table.
//!
//! Arguments are coerced rather than rejected: an unsupported duration
//! becomes 8 seconds, an unsupported aspect ratio `16:9`, and an unsupported
//! resolution `720p`. Only a missing prompt is an error.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::mcp::types::CallToolResult;
use crate::remote::{RemoteApi, TASKS_ENDPOINT};
use crate::tools::display_value;

/// Durations (seconds) the video model accepts.
pub const ALLOWED_DURATIONS: [u8; 3] = [4, 6, 8];
/// Duration used when the requested one is unsupported.
pub const DEFAULT_DURATION: u8 = 8;
/// Aspect ratios the video model accepts.
pub const ALLOWED_ASPECT_RATIOS: [&str; 2] = ["16:9", "9:16"];
/// Aspect ratio used when the requested one is unsupported.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
/// Resolutions the video model accepts.
pub const ALLOWED_RESOLUTIONS: [&str; 2] = ["720p", "1080p"];
/// Resolution used when the requested one is unsupported.
pub const DEFAULT_RESOLUTION: &str = "720p";

/// Text returned by `estimate_video_cost`.
///
/// The figure is fixed and does not follow the computed price.
pub const VIDEO_COST_ESTIMATE_TEXT: &str =
    "Video Generation Cost: $1.96 USD (fixed price)\n\nProvider: Veo 3.1\nRequires: Tier 2+";

/// A USD amount held in whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Usd(pub u32);

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Price per allowed duration when audio is generated.
const COSTS_WITH_AUDIO: [(u8, Usd); 3] = [(4, Usd(240)), (6, Usd(360)), (8, Usd(480))];
/// Price per allowed duration without audio.
const COSTS_NO_AUDIO: [(u8, Usd); 3] = [(4, Usd(120)), (6, Usd(180)), (8, Usd(240))];
/// Price used when a duration is missing from the table.
const FALLBACK_COST: Usd = Usd(480);

/// Look up the fixed price for a duration and audio flag.
///
/// # Examples
///
/// ```
/// use vap_mcp_proxy::tools::video::{video_cost, Usd};
///
/// assert_eq!(video_cost(4, false), Usd(120));
/// assert_eq!(video_cost(8, true).to_string(), "4.80");
/// ```
pub fn video_cost(duration: u8, generate_audio: bool) -> Usd {
    let table = if generate_audio {
        &COSTS_WITH_AUDIO
    } else {
        &COSTS_NO_AUDIO
    };
    table
        .iter()
        .find(|(d, _)| *d == duration)
        .map(|(_, cost)| *cost)
        .unwrap_or(FALLBACK_COST)
}

/// Coerce a raw `duration` argument into the allowed set.
///
/// Integral numbers (including `6.0`) in {4, 6, 8} are kept; anything else,
/// strings included, becomes 8.
pub fn coerce_duration(raw: Option<&Value>) -> u8 {
    let as_integer = raw.and_then(|value| match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    });

    match as_integer {
        Some(d) if ALLOWED_DURATIONS.iter().any(|&allowed| i64::from(allowed) == d) => d as u8,
        _ => DEFAULT_DURATION,
    }
}

/// Coerce a raw `aspect_ratio` argument into the allowed set.
pub fn coerce_aspect_ratio(raw: Option<&Value>) -> &'static str {
    coerce_choice(raw, &ALLOWED_ASPECT_RATIOS, DEFAULT_ASPECT_RATIO)
}

/// Coerce a raw `resolution` argument into the allowed set.
pub fn coerce_resolution(raw: Option<&Value>) -> &'static str {
    coerce_choice(raw, &ALLOWED_RESOLUTIONS, DEFAULT_RESOLUTION)
}

fn coerce_choice(raw: Option<&Value>, allowed: &[&'static str], default: &'static str) -> &'static str {
    raw.and_then(Value::as_str)
        .and_then(|given| allowed.iter().copied().find(|choice| *choice == given))
        .unwrap_or(default)
}

/// Interpret `generate_audio`; absent means `true`.
///
/// Non-boolean values follow JSON truthiness: `null`, `0`, `""`, `[]` and
/// `{}` are false.
pub fn coerce_generate_audio(raw: Option<&Value>) -> bool {
    match raw {
        None => true,
        Some(Value::Bool(b)) => *b,
        Some(Value::Null) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Validated parameter set for a video task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoParams {
    /// Text prompt; never empty
    pub prompt: String,
    /// Duration in seconds; one of [`ALLOWED_DURATIONS`]
    pub duration: u8,
    /// One of [`ALLOWED_ASPECT_RATIOS`]
    pub aspect_ratio: &'static str,
    /// Whether the model also generates audio
    pub generate_audio: bool,
    /// `generate_audio` as the caller sent it; `true` when absent
    pub generate_audio_raw: Value,
    /// One of [`ALLOWED_RESOLUTIONS`]
    pub resolution: &'static str,
    /// Things to avoid; omitted from the task when empty
    pub negative_prompt: Option<String>,
}

impl VideoParams {
    /// Validate and coerce raw tool arguments.
    ///
    /// # Returns
    ///
    /// `None` if `prompt` is missing, not a string, or empty. Every other
    /// field is coerced silently.
    pub fn from_arguments(arguments: &Value) -> Option<Self> {
        let prompt = arguments
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())?
            .to_string();

        let negative_prompt = arguments
            .get("negative_prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Some(Self {
            prompt,
            duration: coerce_duration(arguments.get("duration")),
            aspect_ratio: coerce_aspect_ratio(arguments.get("aspect_ratio")),
            generate_audio: coerce_generate_audio(arguments.get("generate_audio")),
            generate_audio_raw: arguments
                .get("generate_audio")
                .cloned()
                .unwrap_or(Value::Bool(true)),
            resolution: coerce_resolution(arguments.get("resolution")),
            negative_prompt,
        })
    }

    /// Body for `POST /v3/tasks`.
    ///
    /// `generate_audio` is forwarded as received. `duration` is always the
    /// coerced integer, so `6.0` goes out as `6`.
    pub fn to_task_request(&self) -> Value {
        let mut params = Map::new();
        params.insert("prompt".into(), json!(self.prompt));
        params.insert("duration".into(), json!(self.duration));
        params.insert("aspect_ratio".into(), json!(self.aspect_ratio));
        params.insert("generate_audio".into(), self.generate_audio_raw.clone());
        params.insert("resolution".into(), json!(self.resolution));
        if let Some(negative) = &self.negative_prompt {
            params.insert("negative_prompt".into(), json!(negative));
        }

        json!({
            "type": "video",
            "params": Value::Object(params),
        })
    }

    /// Locally computed price for these parameters.
    pub fn local_cost(&self) -> Usd {
        video_cost(self.duration, self.generate_audio)
    }
}

/// Handle `generate_video`.
///
/// A missing prompt returns an error result without contacting the remote.
/// A remote failure, or a reply carrying an `error` key, returns an error
/// result repeating the remote message.
pub async fn generate_video(remote: &dyn RemoteApi, arguments: &Value) -> CallToolResult {
    let Some(params) = VideoParams::from_arguments(arguments) else {
        return CallToolResult::error("Error: prompt is required");
    };

    tracing::info!(
        "Creating Veo 3.1 video task: duration={}s, audio={}",
        params.duration,
        params.generate_audio
    );

    let response = match remote
        .post_v3(TASKS_ENDPOINT, Some(params.to_task_request()))
        .await
    {
        Ok(response) => response,
        Err(e) => return CallToolResult::error(format!("Error: {}", e)),
    };

    if let Some(error) = response.get("error") {
        return CallToolResult::error(format!("Error: {}", display_value(error)));
    }

    let task_id = response
        .get("task_id")
        .map(display_value)
        .unwrap_or_else(|| "unknown".to_string());
    let estimated_cost = response
        .get("estimated_cost")
        .map(display_value)
        .unwrap_or_else(|| params.local_cost().to_string());

    CallToolResult::text(format!(
        "Video generation task created (Veo 3.1)!\n\n\
         Task ID: {}\n\
         Duration: {} seconds\n\
         Aspect Ratio: {}\n\
         Resolution: {}\n\
         Audio: {}\n\
         Estimated Cost: ${}\n\n\
         Use get_task with this task_id to check status and get the video URL when complete.",
        task_id,
        params.duration,
        params.aspect_ratio,
        params.resolution,
        if params.generate_audio { "Yes" } else { "No" },
        estimated_cost,
    ))
}

/// Handle `estimate_video_cost`.
///
/// The price is computed from the coerced duration and audio flag, but the
/// returned text always quotes the fixed figure in
/// [`VIDEO_COST_ESTIMATE_TEXT`].
pub fn estimate_video_cost(arguments: &Value) -> CallToolResult {
    let duration = coerce_duration(arguments.get("duration"));
    let generate_audio = coerce_generate_audio(arguments.get("generate_audio"));
    let cost = video_cost(duration, generate_audio);

    tracing::debug!(
        "Video cost lookup: duration={}s, audio={}, table price=${}",
        duration,
        generate_audio,
        cost
    );

    CallToolResult::text(VIDEO_COST_ESTIMATE_TEXT)
}
