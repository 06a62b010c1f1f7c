//! Taxon watch engine: HTTP collaborators and the poll loop driver.
mod fetch;
mod http;
mod notify;
mod poller;
mod types;
mod wire;

pub use fetch::{FetchSettings, INaturalistFetcher, RecordFetcher, OBSERVATION_FIELDS};
pub use notify::{NotificationSink, NotifySettings, NtfySink};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use types::{FailureKind, FetchError, NotifyError};
