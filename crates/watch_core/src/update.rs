use crate::{Effect, Msg, Notification, RunState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that arrive outside a running cycle (records before
/// `CycleStarted`, a second `CycleStarted`, a stray `CycleFinished`) are
/// ignored and produce no effects.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match msg {
        Msg::CycleStarted => {
            if state.begin_cycle() {
                state.targets().iter().copied().map(Effect::Fetch).collect()
            } else {
                Vec::new()
            }
        }
        Msg::RecordsFetched { records } => {
            let first_run = state.is_first_run();
            match state.in_cycle() {
                Some((seen, builder, stats)) => {
                    if records.is_empty() {
                        stats.targets_empty += 1;
                        Vec::new()
                    } else {
                        stats.targets_fetched += 1;
                        stats.records += records.len();
                        let mut effects = Vec::new();
                        for record in records {
                            if !seen.is_seen(&record.uuid) {
                                if first_run {
                                    stats.suppressed += 1;
                                } else {
                                    stats.notifications += 1;
                                    effects.push(Effect::Notify(Notification::for_record(&record)));
                                }
                            }
                            // Added whether new, already seen, or suppressed.
                            builder.insert(record.uuid);
                        }
                        effects
                    }
                }
                None => Vec::new(),
            }
        }
        Msg::FetchFailed => {
            if let Some(stats) = state.stats_mut() {
                stats.targets_failed += 1;
            }
            Vec::new()
        }
        Msg::CycleFinished => {
            if state.complete_cycle() {
                vec![Effect::ScheduleNextCycle]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}
