use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::info;

use super::monitor::Monitor;
use super::prober::HttpProber;
use super::scheduler::Scheduler;
use super::types::MonitorSnapshot;
use super::validation::{validate_interval, validate_target};
use crate::config;
use crate::error::{AddError, RemoveError};

/// The authoritative set of live monitors, in insertion order.
///
/// Adding and removing take the registry's write lock, snapshots take the read
/// lock. Check results never touch this lock: the scheduler writes straight into
/// the monitor it was started with.
pub struct Registry {
    monitors: RwLock<Vec<Arc<Monitor>>>,
    scheduler: Scheduler,
}

impl Registry {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { monitors: RwLock::new(Vec::new()), scheduler }
    }

    /// Registry probing over HTTP with the configured timeout and concurrency cap.
    ///
    /// Check tasks are bound to the calling runtime, so call this from the
    /// runtime that outlives request handling.
    pub fn from_config(config: &config::Monitoring) -> anyhow::Result<Self> {
        let prober = Arc::new(HttpProber::new(&config.user_agent)?);
        let scheduler = Scheduler::with_runtime(
            Handle::try_current()?,
            prober,
            Duration::from_millis(config.probe_timeout_ms),
        )
        .with_concurrency_limit(config.max_concurrent_probes);

        Ok(Self::new(scheduler))
    }

    /// Register a URL and start checking it.
    ///
    /// Surrounding whitespace is stripped from `url`; the stripped form is the
    /// monitor's key.
    pub fn add(&self, url: &str, interval_secs: u64) -> Result<MonitorSnapshot, AddError> {
        let url = url.trim();
        validate_target(url)?;
        validate_interval(interval_secs)?;

        let mut monitors = self.write();
        if monitors.iter().any(|m| m.url() == url) {
            return Err(AddError::DuplicateUrl(url.to_string()));
        }

        let monitor = Arc::new(Monitor::new(url, Duration::from_secs(interval_secs)));
        let snapshot = monitor.snapshot();
        monitors.push(monitor.clone());
        self.scheduler.start(monitor);

        info!(%url, interval_secs, total = monitors.len(), "monitor added");
        Ok(snapshot)
    }

    /// Stop checking a URL and forget it
    pub fn remove(&self, url: &str) -> Result<(), RemoveError> {
        let url = url.trim();
        let mut monitors = self.write();

        let Some(index) = monitors.iter().position(|m| m.url() == url) else {
            return Err(RemoveError::NotFound(url.to_string()));
        };

        self.scheduler.stop(&monitors[index]);
        monitors.remove(index);

        info!(%url, total = monitors.len(), "monitor removed");
        Ok(())
    }

    /// Copies of every monitor, in the order they were added
    pub fn snapshot(&self) -> Vec<MonitorSnapshot> {
        self.read().iter().map(|m| m.snapshot()).collect()
    }

    pub fn get(&self, url: &str) -> Option<MonitorSnapshot> {
        let url = url.trim();
        self.read().iter().find(|m| m.url() == url).map(|m| m.snapshot())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Drop every monitor and wait for their tasks to finish
    pub async fn shutdown(&self) {
        let removed = std::mem::take(&mut *self.write()).len();
        self.scheduler.shutdown().await;
        info!(removed, "registry shut down");
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<Monitor>>> {
        self.monitors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<Monitor>>> {
        self.monitors.write().unwrap_or_else(PoisonError::into_inner)
    }
}
