use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use feed_core::{PageData, QueryKey};
use feed_engine::{EngineEvent, EngineHandle, FailureKind, FetchError, ItemsApi};

/// Answers after a per-term delay and records every key it was asked for.
#[derive(Default)]
struct ScriptedApi {
    requested: Mutex<Vec<QueryKey>>,
}

#[async_trait::async_trait]
impl ItemsApi for ScriptedApi {
    async fn fetch_page(&self, key: &QueryKey) -> Result<PageData, FetchError> {
        self.requested.lock().unwrap().push(key.clone());
        match key.term() {
            Some("slow") => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(PageData {
                    page: key.page(),
                    page_size: key.page_size(),
                    total: 1,
                    items: Vec::new(),
                })
            }
            Some("broken") => Err(FetchError {
                kind: FailureKind::HttpStatus(500),
                message: "500 Internal Server Error".to_string(),
            }),
            _ => Ok(PageData {
                page: key.page(),
                page_size: key.page_size(),
                total: 2,
                items: Vec::new(),
            }),
        }
    }

    async fn health(&self) -> Result<(), FetchError> {
        Ok(())
    }
}

fn collect_events(engine: &EngineHandle, wait: Duration) -> Vec<EngineEvent> {
    let deadline = Instant::now() + wait;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => events.push(event),
            None => thread::sleep(Duration::from_millis(10)),
        }
    }
    events
}

#[test]
fn newer_fetch_supersedes_in_flight_request() {
    let api = Arc::new(ScriptedApi::default());
    let engine = EngineHandle::with_api(api.clone(), Duration::from_millis(50)).unwrap();

    engine.fetch(1, QueryKey::build(1, 20, "slow"));
    engine.fetch(2, QueryKey::build(1, 20, "fast"));

    let epochs: Vec<u64> = collect_events(&engine, Duration::from_millis(600))
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::PageFetched { epoch, .. } => Some(epoch),
            _ => None,
        })
        .collect();
    assert_eq!(epochs, vec![2]);
}

#[test]
fn failures_are_reported_with_their_epoch() {
    let api = Arc::new(ScriptedApi::default());
    let engine = EngineHandle::with_api(api, Duration::from_millis(50)).unwrap();

    engine.fetch(7, QueryKey::build(1, 20, "broken"));

    let events = collect_events(&engine, Duration::from_millis(300));
    match events.as_slice() {
        [EngineEvent::PageFetched { epoch: 7, result: Err(err) }] => {
            assert_eq!(err.to_string(), "API error: 500");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn debounce_reports_only_latest_generation() {
    let api = Arc::new(ScriptedApi::default());
    let engine = EngineHandle::with_api(api.clone(), Duration::from_millis(80)).unwrap();

    engine.debounce(1, "abc");
    thread::sleep(Duration::from_millis(20));
    engine.debounce(2, "abcd");

    let events = collect_events(&engine, Duration::from_millis(400));
    assert_eq!(
        events,
        vec![EngineEvent::SearchSettled {
            generation: 2,
            text: "abcd".to_string(),
        }]
    );
    assert!(api.requested.lock().unwrap().is_empty());
}

#[test]
fn cancelled_debounce_never_settles() {
    let api = Arc::new(ScriptedApi::default());
    let engine = EngineHandle::with_api(api, Duration::from_millis(50)).unwrap();

    engine.debounce(1, "gone");
    engine.cancel_debounce();

    assert!(collect_events(&engine, Duration::from_millis(250)).is_empty());
}

#[test]
fn shutdown_is_idempotent() {
    let api = Arc::new(ScriptedApi::default());
    let mut engine = EngineHandle::with_api(api, Duration::from_millis(50)).unwrap();

    engine.debounce(1, "late");
    engine.shutdown();
    engine.shutdown();
    thread::sleep(Duration::from_millis(100));
    assert!(engine.try_recv().is_none());
}
