//! Collector status and generic action responses.

use serde::{Deserialize, Serialize};

/// Outcome flag carried by every mutating admin endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Body returned by toggle, delete, create and interval updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        self.status == Some(ResponseStatus::Success)
    }
}

/// Snapshot of the collector returned by `GET /admin/collector/status`.
///
/// Timestamps are the backend's `%Y-%m-%d %H:%M:%S` strings; an empty string
/// means the collector has not run yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectorStatus {
    pub is_running: bool,
    #[serde(default = "default_request_interval")]
    pub request_interval: u32,
    #[serde(default)]
    pub current_task_id: Option<i64>,
    #[serde(default)]
    pub last_request_time: String,
    #[serde(default)]
    pub next_request_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn default_request_interval() -> u32 {
    60
}

impl CollectorStatus {
    /// Parse `last_request_time`, if set.
    pub fn last_request_at(&self) -> Option<chrono::NaiveDateTime> {
        parse_backend_time(&self.last_request_time)
    }

    /// Parse `next_request_time`, if set.
    pub fn next_request_at(&self) -> Option<chrono::NaiveDateTime> {
        parse_backend_time(&self.next_request_time)
    }
}

fn parse_backend_time(s: &str) -> Option<chrono::NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}
