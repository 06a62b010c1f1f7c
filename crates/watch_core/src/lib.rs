//! Taxon watch core: pure poll-cycle state machine and dedup snapshot.
mod effect;
mod msg;
mod notification;
mod record;
mod seen;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use notification::{observation_url, Notification};
pub use record::{Record, TrackedTarget};
pub use seen::{SeenSet, SnapshotBuilder};
pub use state::{CycleStats, LoopPhase, RunState};
pub use update::update;
pub use view_model::RunViewModel;
