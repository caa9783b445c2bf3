//! Trait and types for the record-keeping service that supplies weighing data.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::records::{DateRange, RawMilkRecord};

/// Identity and lactation context for one animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalProfile {
    pub ear_tag_no: String,
    #[serde(default)]
    pub lactation_number: u32,
    #[serde(default)]
    pub name: Option<String>,
}

impl AnimalProfile {
    /// Profile used when the source knows nothing beyond the ear tag.
    pub fn unknown(ear_tag_no: &str) -> Self {
        Self {
            ear_tag_no: ear_tag_no.to_string(),
            lactation_number: 0,
            name: None,
        }
    }
}

/// Abstraction over a provider of milk-weighing records (REST API, CSV export).
///
/// Results are treated as already authorized and complete; implementations do
/// not retry.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Records for one ear tag, optionally limited to a date range.
    async fn fetch_records(&self, animal_id: &str, range: Option<DateRange>) -> Result<Vec<RawMilkRecord>>;

    async fn fetch_animal_profile(&self, animal_id: &str) -> Result<AnimalProfile>;

    /// Ear tags of every animal the source knows about.
    async fn list_animals(&self) -> Result<Vec<String>>;
}
