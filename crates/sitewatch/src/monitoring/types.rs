use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known reachability of a monitored URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    #[default]
    Unknown,
}

impl std::fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "up"),
            MonitorStatus::Down => write!(f, "down"),
            MonitorStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// True only when the target answered with HTTP 200
    pub reachable: bool,

    /// HTTP status code, if a response arrived
    pub http_status: Option<u16>,

    /// Human readable failure cause
    pub error_detail: Option<String>,

    /// Time spent on the request in milliseconds
    pub latency_ms: u64,
}

impl ProbeResult {
    /// Classify a response by its status code
    pub fn from_status(status_code: u16, latency_ms: u64) -> Self {
        if status_code == 200 {
            Self { reachable: true, http_status: Some(status_code), error_detail: None, latency_ms }
        } else {
            Self {
                reachable: false,
                http_status: Some(status_code),
                error_detail: Some(format!("Code: {status_code}")),
                latency_ms,
            }
        }
    }

    /// A request that never produced a response
    pub fn failure(error: impl Into<String>, latency_ms: u64) -> Self {
        Self { reachable: false, http_status: None, error_detail: Some(error.into()), latency_ms }
    }

    pub fn status(&self) -> MonitorStatus {
        if self.reachable { MonitorStatus::Up } else { MonitorStatus::Down }
    }
}

/// Point-in-time copy of a monitor, as reported by `/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub url: String,

    /// Check interval in milliseconds
    pub interval: u64,

    pub status: MonitorStatus,

    pub last_check: Option<DateTime<Utc>>,

    pub message: Option<String>,

    pub http_status: Option<u16>,

    pub latency_ms: Option<u64>,

    /// Number of completed checks
    pub checks: u64,

    pub created_at: DateTime<Utc>,
}
