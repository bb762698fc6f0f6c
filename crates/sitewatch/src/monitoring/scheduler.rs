use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::monitor::Monitor;
use super::prober::Prober;
use super::types::MonitorStatus;

/// Running check task of one monitor.
struct MonitorSlot {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

/// Monitoring scheduler - owns one recurring check task per monitor.
///
/// Slots are keyed by the monitor's id, never its URL, so a task left over from
/// a deleted monitor cannot reach a re-added one. Tasks run on the runtime the
/// scheduler was built on, not on whichever runtime calls [`Scheduler::start`].
pub struct Scheduler {
    runtime: Handle,
    prober: Arc<dyn Prober>,
    probe_timeout: Duration,
    limiter: Option<Arc<Semaphore>>,
    slots: Mutex<HashMap<Uuid, MonitorSlot>>,
}

impl Scheduler {
    /// Build a scheduler whose tasks run on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime; use [`Scheduler::with_runtime`]
    /// to pass one explicitly.
    pub fn new(prober: Arc<dyn Prober>, probe_timeout: Duration) -> Self {
        Self::with_runtime(Handle::current(), prober, probe_timeout)
    }

    pub fn with_runtime(runtime: Handle, prober: Arc<dyn Prober>, probe_timeout: Duration) -> Self {
        Self { runtime, prober, probe_timeout, limiter: None, slots: Mutex::new(HashMap::new()) }
    }

    /// Bound the number of probes in flight across all monitors. Zero means unbounded.
    pub fn with_concurrency_limit(mut self, max_concurrent_probes: usize) -> Self {
        self.limiter = (max_concurrent_probes > 0)
            .then(|| Arc::new(Semaphore::new(max_concurrent_probes)));
        self
    }

    /// Check the monitor right away, then once every interval until stopped.
    pub fn start(&self, monitor: Arc<Monitor>) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let id = monitor.id();
        let url = monitor.url().to_string();
        let interval_secs = monitor.interval().as_secs();

        let handle = self.runtime.spawn(run_check_loop(
            monitor,
            self.prober.clone(),
            self.probe_timeout,
            self.limiter.clone(),
            shutdown_rx,
        ));

        if let Some(old) = self.slots().insert(id, MonitorSlot { handle, shutdown_tx }) {
            let _ = old.shutdown_tx.send(true);
        }

        info!(monitor_id = %id, %url, interval_secs, "monitor scheduled");
    }

    /// Cancel the monitor's future checks.
    ///
    /// A probe already in flight is left to finish, but its result is dropped.
    /// Returns false if the monitor had no running task.
    pub fn stop(&self, monitor: &Monitor) -> bool {
        match self.slots().remove(&monitor.id()) {
            Some(slot) => {
                let _ = slot.shutdown_tx.send(true);
                info!(monitor_id = %monitor.id(), url = %monitor.url(), "monitor unscheduled");
                true
            }
            None => false,
        }
    }

    /// Number of monitors whose check task is still running
    pub fn active(&self) -> usize {
        self.slots().values().filter(|slot| !slot.handle.is_finished()).count()
    }

    /// Stop every task and wait for in-flight probes to wind down
    pub async fn shutdown(&self) {
        let drained: Vec<(Uuid, MonitorSlot)> = self.slots().drain().collect();

        for (_, slot) in &drained {
            let _ = slot.shutdown_tx.send(true);
        }

        for (id, slot) in drained {
            if let Err(e) = slot.handle.await {
                warn!(monitor_id = %id, error = %e, "check task ended abnormally");
            }
        }

        info!("all monitors stopped");
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<Uuid, MonitorSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The check loop of a single monitor.
///
/// Ticks that fall behind a slow probe are delayed rather than bursted, so at
/// most one probe per monitor is ever in flight.
async fn run_check_loop(
    monitor: Arc<Monitor>,
    prober: Arc<dyn Prober>,
    probe_timeout: Duration,
    limiter: Option<Arc<Semaphore>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut timer = interval(monitor.interval());
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = timer.tick() => {}
        }

        let _permit = match &limiter {
            Some(limiter) => tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                permit = limiter.clone().acquire_owned() => permit.ok(),
            },
            None => None,
        };

        if *shutdown.borrow() {
            break;
        }

        let result = prober.probe(monitor.url(), probe_timeout).await;

        if *shutdown.borrow() {
            debug!(monitor_id = %monitor.id(), "monitor stopped during probe, result dropped");
            break;
        }

        let previous = monitor.apply(&result, Utc::now());
        let current = result.status();

        debug!(
            monitor_id = %monitor.id(),
            url = %monitor.url(),
            status = %current,
            latency_ms = result.latency_ms,
            "check completed"
        );

        match (previous, current) {
            (MonitorStatus::Up | MonitorStatus::Unknown, MonitorStatus::Down) => warn!(
                url = %monitor.url(),
                error = result.error_detail.as_deref().unwrap_or_default(),
                "monitor is down"
            ),
            (MonitorStatus::Down, MonitorStatus::Up) => {
                info!(url = %monitor.url(), "monitor recovered")
            }
            _ => {}
        }
    }
}
