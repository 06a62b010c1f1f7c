use crate::{Notification, TrackedTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Query the remote source for one target. Emitted in configured order.
    Fetch(TrackedTarget),
    /// Deliver one alert for a record that was not in the previous snapshot.
    Notify(Notification),
    /// The snapshot has been swapped; wait for the poll interval.
    ScheduleNextCycle,
}
