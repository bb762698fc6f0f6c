use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{MonitorSnapshot, MonitorStatus, ProbeResult};

/// One watched URL and its last known state.
///
/// The configuration (`url`, `interval`) never changes after creation. The
/// check state sits behind a per-monitor lock so that the scheduler task of one
/// monitor never contends with another's, and readers always see a complete
/// update.
#[derive(Debug)]
pub struct Monitor {
    id: Uuid,
    url: String,
    interval: Duration,
    created_at: DateTime<Utc>,
    state: Mutex<CheckState>,
}

#[derive(Debug, Default)]
struct CheckState {
    status: MonitorStatus,
    last_checked_at: Option<DateTime<Utc>>,
    message: Option<String>,
    http_status: Option<u16>,
    latency_ms: Option<u64>,
    checks: u64,
}

impl Monitor {
    pub fn new(url: impl Into<String>, interval: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            interval,
            created_at: Utc::now(),
            state: Mutex::new(CheckState::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn status(&self) -> MonitorStatus {
        self.lock().status
    }

    /// Record a completed probe, returning the status it replaced
    pub fn apply(&self, result: &ProbeResult, checked_at: DateTime<Utc>) -> MonitorStatus {
        let mut state = self.lock();
        let previous = state.status;

        state.status = result.status();
        state.message = result.error_detail.clone();
        state.http_status = result.http_status;
        state.latency_ms = Some(result.latency_ms);
        state.last_checked_at = Some(checked_at);
        state.checks += 1;

        previous
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.lock();
        MonitorSnapshot {
            url: self.url.clone(),
            interval: self.interval.as_millis() as u64,
            status: state.status,
            last_check: state.last_checked_at,
            message: state.message.clone(),
            http_status: state.http_status,
            latency_ms: state.latency_ms,
            checks: state.checks,
            created_at: self.created_at,
        }
    }

    // Every write is a plain field assignment, so a poisoned lock still holds
    // a consistent record.
    fn lock(&self) -> MutexGuard<'_, CheckState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
