//! JSON shapes of the observations endpoint.
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use watch_core::Record;

#[derive(Debug, Deserialize)]
pub(crate) struct ObservationPage {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    pub results: Vec<WireObservation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireObservation {
    pub uuid: String,
    pub id: u64,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub observed_on: Option<String>,
    #[serde(default)]
    pub place_guess: Option<String>,
    #[serde(default)]
    pub obscured: Option<bool>,
    #[serde(default)]
    pub quality_grade: Option<String>,
    #[serde(default)]
    pub taxon: Option<WireTaxon>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTaxon {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub preferred_common_name: Option<String>,
}

impl WireObservation {
    /// Converts to a core record; `taxon_id` names the subject when the
    /// response carries no common name.
    pub(crate) fn into_record(self, taxon_id: u64) -> Record {
        let subject_name = match self.taxon {
            Some(WireTaxon {
                preferred_common_name: Some(name),
                ..
            }) if !name.is_empty() => name,
            Some(WireTaxon { id: Some(id), .. }) => format!("Taxon {id}"),
            _ => format!("Taxon {taxon_id}"),
        };
        Record {
            uuid: self.uuid,
            id: self.id,
            subject_name,
            created_at: self.created_at,
            observed_on: self.observed_on.unwrap_or_default(),
            location: self.place_guess.unwrap_or_default(),
            obscured: self.obscured.unwrap_or(false),
            quality_grade: self.quality_grade.unwrap_or_default(),
        }
    }
}
