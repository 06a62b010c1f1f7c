use chrono::{DateTime, FixedOffset};

/// One (taxon, place) query scope polled every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedTarget {
    pub taxon_id: u64,
    pub place_id: u64,
}

impl TrackedTarget {
    pub fn new(taxon_id: u64, place_id: u64) -> Self {
        Self { taxon_id, place_id }
    }

    /// Builds one target per taxon, all sharing the same place.
    pub fn for_place(place_id: u64, taxon_ids: &[u64]) -> Vec<Self> {
        taxon_ids
            .iter()
            .map(|&taxon_id| Self::new(taxon_id, place_id))
            .collect()
    }
}

/// A single observation as returned by the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Opaque unique identifier; the dedup key.
    pub uuid: String,
    /// Numeric observation id, used for deep links.
    pub id: u64,
    pub subject_name: String,
    pub created_at: DateTime<FixedOffset>,
    pub observed_on: String,
    pub location: String,
    pub obscured: bool,
    pub quality_grade: String,
}

impl Record {
    pub fn obscured_label(&self) -> &'static str {
        if self.obscured {
            "yes"
        } else {
            "no"
        }
    }
}
