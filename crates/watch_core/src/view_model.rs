use crate::{CycleStats, LoopPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunViewModel {
    pub phase: LoopPhase,
    pub first_run: bool,
    pub target_count: usize,
    /// Size of the live snapshot.
    pub seen_count: usize,
    pub cycles_completed: u64,
    /// Counters of the current cycle, or of the last one while waiting.
    pub stats: CycleStats,
}
