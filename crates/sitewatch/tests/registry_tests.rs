//! Registry lifecycle tests

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sitewatch::monitoring::validation::MAX_INTERVAL_SECS;
use sitewatch::{AddError, MonitorStatus, ProbeResult, RemoveError};

use common::{MockProber, registry_with};

#[tokio::test(start_paused = true)]
async fn test_add_then_status_shows_unknown_then_terminal() {
    let prober = Arc::new(MockProber::up().with_delay(Duration::from_secs(1)));
    let registry = registry_with(prober.clone());

    let added = registry.add("https://example.com", 60).unwrap();
    assert_eq!(added.status, MonitorStatus::Unknown);

    let before = registry.snapshot();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].url, "https://example.com");
    assert_eq!(before[0].status, MonitorStatus::Unknown);
    assert_eq!(before[0].interval, 60_000);

    tokio::time::sleep(Duration::from_secs(2)).await;

    let after = registry.snapshot();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].status, MonitorStatus::Up);
    assert!(after[0].last_check.is_some());
    assert_eq!(after[0].message, None);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_url_is_rejected() {
    let registry = registry_with(Arc::new(MockProber::up()));

    registry.add("https://example.com", 30).unwrap();
    let second = registry.add("https://example.com", 60);

    assert_eq!(second, Err(AddError::DuplicateUrl("https://example.com".to_string())));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.scheduler().active(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_detection_ignores_surrounding_whitespace() {
    let registry = registry_with(Arc::new(MockProber::up()));

    registry.add("https://example.com", 30).unwrap();

    assert!(matches!(registry.add("  https://example.com ", 30), Err(AddError::DuplicateUrl(_))));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_input_leaves_registry_unchanged() {
    let prober = Arc::new(MockProber::up());
    let registry = registry_with(prober.clone());

    assert!(matches!(registry.add("https://example.com", 5), Err(AddError::InvalidInput(_))));
    assert!(matches!(registry.add("not a url", 60), Err(AddError::InvalidInput(_))));
    assert!(matches!(registry.add("", 60), Err(AddError::InvalidInput(_))));
    assert!(matches!(registry.add("ftp://example.com", 60), Err(AddError::InvalidInput(_))));

    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(registry.is_empty());
    assert_eq!(registry.scheduler().active(), 0);
    assert_eq!(prober.total_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_long_intervals_are_accepted() {
    let registry = registry_with(Arc::new(MockProber::up()));

    registry.add("https://daily.example", 86_401).unwrap();
    registry.add("https://yearly.example", MAX_INTERVAL_SECS).unwrap();

    assert!(matches!(
        registry.add("https://too-long.example", MAX_INTERVAL_SECS + 1),
        Err(AddError::InvalidInput(_))
    ));
    assert_eq!(registry.len(), 2);

    let yearly = registry.get("https://yearly.example").unwrap();
    assert_eq!(yearly.interval, MAX_INTERVAL_SECS * 1000);
}

#[tokio::test(start_paused = true)]
async fn test_delete_stops_probing() {
    let prober = Arc::new(MockProber::up());
    let registry = registry_with(prober.clone());

    registry.add("https://example.com", 10).unwrap();
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(prober.calls("https://example.com"), 3);

    registry.remove("https://example.com").unwrap();
    assert!(registry.snapshot().is_empty());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(prober.calls("https://example.com"), 3);
    assert_eq!(registry.scheduler().active(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_delete_of_unknown_url_reports_not_found() {
    let registry = registry_with(Arc::new(MockProber::up()));
    registry.add("https://example.com", 10).unwrap();

    assert_eq!(
        registry.remove("https://example.org"),
        Err(RemoveError::NotFound("https://example.org".to_string()))
    );
    assert_eq!(registry.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_readded_url_is_not_touched_by_old_task() {
    let prober = Arc::new(MockProber::new(ProbeResult::from_status(503, 5)).with_delay(Duration::from_secs(3)));
    let registry = registry_with(prober.clone());

    registry.add("https://example.com", 10).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    // the first entity's probe is still in flight
    registry.remove("https://example.com").unwrap();
    registry.add("https://example.com", 10).unwrap();

    // old probe lands at t=3s, the new entity's own probe at t=4s
    tokio::time::sleep(Duration::from_millis(2500)).await;
    let snapshot = registry.get("https://example.com").unwrap();
    assert_eq!(snapshot.status, MonitorStatus::Unknown);
    assert_eq!(snapshot.checks, 0);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let snapshot = registry.get("https://example.com").unwrap();
    assert_eq!(snapshot.status, MonitorStatus::Down);
    assert_eq!(snapshot.checks, 1);
    assert_eq!(snapshot.message.as_deref(), Some("Code: 503"));
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_keeps_insertion_order() {
    let registry = registry_with(Arc::new(MockProber::up()));
    let urls = ["https://c.example", "https://a.example", "https://b.example"];

    for url in urls {
        registry.add(url, 10).unwrap();
    }
    registry.remove("https://a.example").unwrap();
    registry.add("https://a.example", 10).unwrap();

    let order: Vec<String> = registry.snapshot().into_iter().map(|m| m.url).collect();
    assert_eq!(order, ["https://c.example", "https://b.example", "https://a.example"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_all_visible() {
    const N: usize = 64;
    let registry = Arc::new(registry_with(Arc::new(MockProber::up())));

    let tasks: Vec<_> = (0..N)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.add(&format!("https://site{i}.example"), 60) })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), N);

    let unique: HashSet<&str> = snapshot.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(unique.len(), N);
    for monitor in &snapshot {
        assert_eq!(monitor.interval, 60_000);
        match monitor.status {
            MonitorStatus::Unknown => assert!(monitor.last_check.is_none()),
            MonitorStatus::Up => assert!(monitor.last_check.is_some()),
            MonitorStatus::Down => panic!("mock prober never reports down"),
        }
    }

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_everything() {
    let prober = Arc::new(MockProber::up());
    let registry = registry_with(prober.clone());

    registry.add("https://a.example", 10).unwrap();
    registry.add("https://b.example", 10).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    registry.shutdown().await;
    let calls = prober.total_calls();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(registry.is_empty());
    assert_eq!(registry.scheduler().active(), 0);
    assert_eq!(prober.total_calls(), calls);
}
