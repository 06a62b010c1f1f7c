use crate::Record;

const OBSERVATION_URL_BASE: &str = "https://www.inaturalist.org/observations";

/// Canonical web page for an observation.
pub fn observation_url(observation_id: u64) -> String {
    format!("{OBSERVATION_URL_BASE}/{observation_id}")
}

/// One outbound alert, ready for a notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub observation_id: u64,
}

impl Notification {
    pub fn for_record(record: &Record) -> Self {
        let title = format!("{} Observation", record.subject_name);
        let body = format!(
            "Observed On: {}\nCreated At: {}\nLocation: {}\nObscured: {}\nQuality: {}",
            record.observed_on,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.location,
            record.obscured_label(),
            record.quality_grade,
        );
        Self {
            title,
            body,
            observation_id: record.id,
        }
    }

    pub fn url(&self) -> String {
        observation_url(self.observation_id)
    }
}
