//! Shared helpers for the monitoring integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sitewatch::{ProbeResult, Prober, Registry, Scheduler};

/// Prober that never touches the network and records how it was called
pub struct MockProber {
    result: ProbeResult,
    delay: Duration,
    slow_urls: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: Mutex<HashMap<String, usize>>,
    max_in_flight_per_url: AtomicUsize,
    global_in_flight: AtomicUsize,
    max_global_in_flight: AtomicUsize,
}

impl MockProber {
    pub fn new(result: ProbeResult) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            slow_urls: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            max_in_flight_per_url: AtomicUsize::new(0),
            global_in_flight: AtomicUsize::new(0),
            max_global_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn up() -> Self {
        Self::new(ProbeResult::from_status(200, 5))
    }

    /// Every probe takes `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Probes of `url` take `delay` instead of the default
    pub fn with_slow_url(mut self, url: &str, delay: Duration) -> Self {
        self.slow_urls.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight_per_url(&self) -> usize {
        self.max_in_flight_per_url.load(Ordering::SeqCst)
    }

    pub fn max_global_in_flight(&self) -> usize {
        self.max_global_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Prober for MockProber {
    async fn probe(&self, url: &str, _timeout: Duration) -> ProbeResult {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        {
            let mut in_flight = self.in_flight.lock().unwrap();
            let count = in_flight.entry(url.to_string()).or_default();
            *count += 1;
            self.max_in_flight_per_url.fetch_max(*count, Ordering::SeqCst);
        }
        let global = self.global_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_global_in_flight.fetch_max(global, Ordering::SeqCst);

        let delay = self.slow_urls.get(url).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.global_in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(count) = self.in_flight.lock().unwrap().get_mut(url) {
            *count -= 1;
        }

        self.result.clone()
    }
}

pub fn registry_with(prober: Arc<MockProber>) -> Registry {
    Registry::new(Scheduler::new(prober, Duration::from_secs(5)))
}
