//! In-process fake remote for unit tests
//!
//! [`FakeRemote`] records every call it receives and answers from a queue
//! of scripted replies. When the queue is empty it answers with an empty
//! JSON object.
//!
//! ```text
//! handler -> FakeRemote::post_v3("/v3/tasks", payload)
//!              |-- recorded in calls()
//!              `-- pops next scripted reply
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::remote::{RemoteApi, RemoteError, RemoteResult};

/// Which remote call shape was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// POST to the tool-protocol base
    PostMcp,
    /// POST to the task base
    PostV3,
    /// GET from the task base
    GetV3,
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Call shape
    pub kind: CallKind,
    /// Endpoint path as passed by the caller
    pub endpoint: String,
    /// Payload, if any
    pub payload: Option<Value>,
}

/// Scripted remote used by unit tests.
#[derive(Debug, Default)]
pub struct FakeRemote {
    replies: Mutex<VecDeque<RemoteResult>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeRemote {
    /// Create a fake with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fake that answers the first call with `reply`.
    pub fn replying(reply: Value) -> Self {
        let fake = Self::new();
        fake.push_ok(reply);
        fake
    }

    /// Create a fake that fails the first call with `message`.
    pub fn failing(message: &str) -> Self {
        let fake = Self::new();
        fake.push_err(message);
        fake
    }

    /// Queue a successful reply.
    pub fn push_ok(&self, reply: Value) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failed reply.
    pub fn push_err(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(RemoteError::new(message)));
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: CallKind, endpoint: &str, payload: Option<Value>) -> RemoteResult {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            endpoint: endpoint.to_string(),
            payload,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({})))
    }
}

#[async_trait::async_trait]
impl RemoteApi for FakeRemote {
    async fn post_mcp(&self, endpoint: &str, payload: Option<Value>) -> RemoteResult {
        self.record(CallKind::PostMcp, endpoint, payload)
    }

    async fn post_v3(&self, endpoint: &str, payload: Option<Value>) -> RemoteResult {
        self.record(CallKind::PostV3, endpoint, payload)
    }

    async fn get_v3(&self, endpoint: &str) -> RemoteResult {
        self.record(CallKind::GetV3, endpoint, None)
    }
}
