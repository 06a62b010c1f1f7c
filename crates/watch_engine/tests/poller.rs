use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use chrono::DateTime;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use watch_core::{Notification, Record, RunState, TrackedTarget};
use watch_engine::{
    FailureKind, FetchError, NotificationSink, NotifyError, Poller, RecordFetcher,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

const PLACE: u64 = 6_712;
const OWL: TrackedTarget = TrackedTarget {
    taxon_id: 19_350,
    place_id: PLACE,
};
const FOX: TrackedTarget = TrackedTarget {
    taxon_id: 42_069,
    place_id: PLACE,
};

fn record(uuid: &str, id: u64) -> Record {
    Record {
        uuid: uuid.to_string(),
        id,
        subject_name: "Red Fox".to_string(),
        created_at: DateTime::parse_from_rfc3339("2024-02-11T09:45:00Z").unwrap(),
        observed_on: "2024-02-11".to_string(),
        location: "North Meadow".to_string(),
        obscured: false,
        quality_grade: "research".to_string(),
    }
}

type Batch = Result<Vec<Record>, FetchError>;

/// Hands out scripted batches per taxon, one per call. Runs out to empty.
#[derive(Default)]
struct ScriptedFetcher {
    batches: Mutex<HashMap<u64, VecDeque<Batch>>>,
    calls: Mutex<Vec<u64>>,
    stop_after: Option<(usize, CancellationToken)>,
}

impl ScriptedFetcher {
    fn script(self, target: TrackedTarget, batches: Vec<Batch>) -> Self {
        self.batches
            .lock()
            .unwrap()
            .insert(target.taxon_id, batches.into());
        self
    }

    fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecordFetcher for ScriptedFetcher {
    async fn fetch(&self, target: TrackedTarget) -> Result<Vec<Record>, FetchError> {
        let call_count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(target.taxon_id);
            calls.len()
        };
        if let Some((limit, token)) = &self.stop_after {
            if call_count >= *limit {
                token.cancel();
            }
        }
        self.batches
            .lock()
            .unwrap()
            .get_mut(&target.taxon_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Default, Clone)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<u64>>>,
    failing: HashSet<u64>,
}

impl RecordingSink {
    fn failing(ids: &[u64]) -> Self {
        Self {
            sent: Arc::default(),
            failing: ids.iter().copied().collect(),
        }
    }

    fn take(&self) -> Vec<u64> {
        self.sent.lock().unwrap().drain(..).collect()
    }
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.observation_id);
        if self.failing.contains(&notification.observation_id) {
            return Err(NotifyError::new(FailureKind::HttpStatus(500), "upstream down"));
        }
        Ok(())
    }
}

fn network_error() -> FetchError {
    FetchError::new(FailureKind::Network, "connection refused")
}

fn sorted_seen(state: &RunState) -> Vec<String> {
    let mut ids: Vec<String> = state.seen().iter().map(str::to_string).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn first_cycle_is_silent_then_only_new_records_notify() {
    init_logging();
    let fetcher = ScriptedFetcher::default().script(
        OWL,
        vec![
            Ok(vec![record("A", 1), record("B", 2), record("C", 3)]),
            Ok(vec![record("D", 4), record("A", 1), record("B", 2)]),
        ],
    );
    let sink = RecordingSink::default();
    let poller = Poller::new(fetcher, sink.clone(), Duration::from_millis(1));
    let state = RunState::new(vec![OWL]);

    let state = poller.run_cycle(state).await;
    assert!(sink.take().is_empty());
    assert_eq!(sorted_seen(&state), vec!["A", "B", "C"]);

    let state = poller.run_cycle(state).await;
    assert_eq!(sink.take(), vec![4]);
    assert_eq!(sorted_seen(&state), vec!["A", "B", "D"]);
}

#[tokio::test]
async fn fetch_failure_does_not_block_later_targets() {
    init_logging();
    let fetcher = ScriptedFetcher::default()
        .script(OWL, vec![Ok(vec![record("A", 1)]), Err(network_error())])
        .script(FOX, vec![Ok(vec![record("F", 6)]), Ok(vec![record("G", 7), record("F", 6)])]);
    let sink = RecordingSink::default();
    let poller = Poller::new(fetcher, sink.clone(), Duration::from_millis(1));

    let state = poller.run_cycle(RunState::new(vec![OWL, FOX])).await;
    let state = poller.run_cycle(state).await;

    assert_eq!(sink.take(), vec![7]);
    assert_eq!(sorted_seen(&state), vec!["F", "G"]);
    assert_eq!(state.view().stats.targets_failed, 1);
}

#[tokio::test]
async fn failed_notification_is_not_retried() {
    init_logging();
    let fetcher = ScriptedFetcher::default().script(
        OWL,
        vec![
            Ok(Vec::new()),
            Ok(vec![record("N", 10), record("M", 11)]),
            Ok(vec![record("N", 10), record("M", 11)]),
        ],
    );
    let sink = RecordingSink::failing(&[10]);
    let poller = Poller::new(fetcher, sink.clone(), Duration::from_millis(1));

    let state = poller.run_cycle(RunState::new(vec![OWL])).await;
    let state = poller.run_cycle(state).await;
    assert_eq!(sink.take(), vec![10, 11]);
    assert!(state.seen().is_seen("N"));

    let _state = poller.run_cycle(state).await;
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn run_stops_between_cycles_when_cancelled() {
    init_logging();
    let token = CancellationToken::new();
    let fetcher = ScriptedFetcher {
        stop_after: Some((3, token.clone())),
        ..ScriptedFetcher::default()
    }
    .script(
        OWL,
        vec![
            Ok(vec![record("A", 1)]),
            Ok(vec![record("B", 2), record("A", 1)]),
            Ok(vec![record("C", 3), record("B", 2)]),
        ],
    );
    let sink = RecordingSink::default();
    let poller = Poller::new(fetcher, sink.clone(), Duration::from_millis(5));

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        poller.run(RunState::new(vec![OWL]), &token),
    )
    .await
    .expect("loop stops after cancellation");

    assert_eq!(state.view().cycles_completed, 3);
    assert_eq!(sink.take(), vec![2, 3]);
    assert_eq!(sorted_seen(&state), vec!["B", "C"]);
}

#[tokio::test]
async fn targets_are_fetched_in_configured_order() {
    init_logging();
    let fetcher = ScriptedFetcher::default();
    let poller = Poller::new(fetcher, RecordingSink::default(), Duration::from_millis(1));

    let state = poller.run_cycle(RunState::new(vec![FOX, OWL])).await;
    let _state = poller.run_cycle(state).await;

    assert_eq!(
        poller.fetcher().calls(),
        vec![FOX.taxon_id, OWL.taxon_id, FOX.taxon_id, OWL.taxon_id]
    );
}
