use crate::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A new poll cycle begins.
    CycleStarted,
    /// Records returned for a target, newest first. May be empty.
    RecordsFetched { records: Vec<Record> },
    /// The fetch for a target failed; it contributes nothing this cycle.
    FetchFailed,
    /// Every target of the cycle has been processed.
    CycleFinished,
}
