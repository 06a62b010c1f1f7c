use std::time::Duration;

use tokio_util::sync::CancellationToken;
use watch_core::{update, Effect, Msg, RunState, TrackedTarget};
use watch_logging::{watch_debug, watch_error, watch_info, watch_warn};

use crate::{NotificationSink, RecordFetcher};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Drives [`RunState`] through poll cycles.
///
/// Everything runs sequentially: targets in configured order, records in
/// fetch order, one notification at a time.
pub struct Poller<F, S> {
    fetcher: F,
    sink: S,
    interval: Duration,
}

impl<F: RecordFetcher, S: NotificationSink> Poller<F, S> {
    pub fn new(fetcher: F, sink: S, interval: Duration) -> Self {
        Self {
            fetcher,
            sink,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs cycles until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between cycles; a running cycle completes.
    pub async fn run(&self, mut state: RunState, shutdown: &CancellationToken) -> RunState {
        loop {
            state = self.run_cycle(state).await;
            tokio::select! {
                _ = shutdown.cancelled() => {
                    watch_info!("Shutdown requested, stopping poll loop");
                    return state;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Runs one full cycle and returns the state with the new snapshot installed.
    pub async fn run_cycle(&self, state: RunState) -> RunState {
        let (mut state, fetches) = update(state, Msg::CycleStarted);
        let view = state.view();
        watch_info!(
            "Starting poll cycle {} ({} targets, {} ids in snapshot{})",
            view.cycles_completed + 1,
            view.target_count,
            view.seen_count,
            if view.first_run { ", first run" } else { "" }
        );

        for effect in fetches {
            let Effect::Fetch(target) = effect else {
                unreachable!("CycleStarted only emits fetches");
            };
            let msg = self.fetch_target(target).await;
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                self.execute(effect).await;
            }
        }

        let (state, effects) = update(state, Msg::CycleFinished);
        let view = state.view();
        watch_info!(
            "Finished poll cycle {}: fetched={} empty={} failed={} records={} notified={} suppressed={} snapshot={}",
            view.cycles_completed,
            view.stats.targets_fetched,
            view.stats.targets_empty,
            view.stats.targets_failed,
            view.stats.records,
            view.stats.notifications,
            view.stats.suppressed,
            view.seen_count
        );
        for effect in effects {
            self.execute(effect).await;
        }
        state
    }

    async fn fetch_target(&self, target: TrackedTarget) -> Msg {
        watch_info!("Getting observations for taxon ID '{}'", target.taxon_id);
        match self.fetcher.fetch(target).await {
            Ok(records) => {
                match records.first() {
                    Some(first) => watch_info!(
                        "Taxon ID '{}' is the '{}' ({} records)",
                        target.taxon_id,
                        first.subject_name,
                        records.len()
                    ),
                    None => watch_info!("No results found for Taxon ID '{}'", target.taxon_id),
                }
                Msg::RecordsFetched { records }
            }
            Err(err) => {
                watch_error!(
                    "Fetching observations for taxon ID '{}' failed: {}",
                    target.taxon_id,
                    err
                );
                Msg::FetchFailed
            }
        }
    }

    async fn execute(&self, effect: Effect) {
        match effect {
            Effect::Notify(notification) => {
                watch_info!(
                    "Sending notification for observation ID '{}'",
                    notification.observation_id
                );
                if let Err(err) = self.sink.send(&notification).await {
                    // Not retried; the record is already part of the new snapshot.
                    watch_warn!(
                        "Notification for observation ID '{}' failed: {}",
                        notification.observation_id,
                        err
                    );
                }
            }
            Effect::ScheduleNextCycle => {
                watch_debug!("Next poll cycle in {:?}", self.interval);
            }
            Effect::Fetch(_) => unreachable!("fetches are only issued by CycleStarted"),
        }
    }
}
