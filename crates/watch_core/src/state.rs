use crate::view_model::RunViewModel;
use crate::{SeenSet, SnapshotBuilder, TrackedTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPhase {
    /// No cycle has started yet.
    #[default]
    Starting,
    CycleRunning,
    /// Between cycles, waiting for the poll interval to elapse.
    Waiting,
}

/// Per-cycle counters, reset when a cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleStats {
    pub targets_fetched: usize,
    pub targets_empty: usize,
    pub targets_failed: usize,
    pub records: usize,
    pub notifications: usize,
    pub suppressed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    targets: Vec<TrackedTarget>,
    seen: SeenSet,
    pending: Option<SnapshotBuilder>,
    first_run: bool,
    phase: LoopPhase,
    cycles_completed: u64,
    stats: CycleStats,
}

impl RunState {
    pub fn new(targets: Vec<TrackedTarget>) -> Self {
        Self {
            targets,
            seen: SeenSet::new(),
            pending: None,
            first_run: true,
            phase: LoopPhase::Starting,
            cycles_completed: 0,
            stats: CycleStats::default(),
        }
    }

    pub fn targets(&self) -> &[TrackedTarget] {
        &self.targets
    }

    /// The live snapshot: ids from the previous completed cycle.
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn view(&self) -> RunViewModel {
        RunViewModel {
            phase: self.phase,
            first_run: self.first_run,
            target_count: self.targets.len(),
            seen_count: self.seen.len(),
            cycles_completed: self.cycles_completed,
            stats: self.stats,
        }
    }

    pub(crate) fn begin_cycle(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(SnapshotBuilder::new());
        self.phase = LoopPhase::CycleRunning;
        self.stats = CycleStats::default();
        true
    }

    /// Split borrow of the live snapshot, the cycle's builder and counters.
    pub(crate) fn in_cycle(
        &mut self,
    ) -> Option<(&SeenSet, &mut SnapshotBuilder, &mut CycleStats)> {
        let builder = self.pending.as_mut()?;
        Some((&self.seen, builder, &mut self.stats))
    }

    pub(crate) fn stats_mut(&mut self) -> Option<&mut CycleStats> {
        if self.pending.is_some() {
            Some(&mut self.stats)
        } else {
            None
        }
    }

    /// Installs the cycle's builder as the live snapshot and clears first-run.
    pub(crate) fn complete_cycle(&mut self) -> bool {
        let Some(builder) = self.pending.take() else {
            return false;
        };
        self.seen = builder.finish();
        self.first_run = false;
        self.cycles_completed += 1;
        self.phase = LoopPhase::Waiting;
        true
    }
}
