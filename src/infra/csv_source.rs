use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::parser::parse_calendar_date;
use crate::records::{DateRange, RawMilkRecord};
use crate::services::record_source::{AnimalProfile, RecordSource};

/// [`RecordSource`] over a CSV export of milk records.
///
/// The export must carry the `RawMilkRecord` headers
/// (`earTagNo,date,shift,quantity,fat,protein,lactose,scc,note`). Profiles are
/// optional and come from a JSON object keyed by ear tag.
pub struct CsvRecordSource {
    path: PathBuf,
    profiles: HashMap<String, AnimalProfile>,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            profiles: HashMap::new(),
        }
    }

    /// Loads animal profiles from a JSON file at `path`.
    pub fn with_profiles(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profiles from {}", path.display()))?;
        self.profiles = serde_json::from_str(&content)
            .with_context(|| format!("invalid profiles file {}", path.display()))?;
        Ok(self)
    }

    fn load_rows(&self) -> Result<Vec<RawMilkRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        read_records(file).with_context(|| format!("failed to read {}", self.path.display()))
    }
}

/// Reads raw records from CSV with headers.
pub fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<RawMilkRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: RawMilkRecord = result?;
        rows.push(record);
    }

    Ok(rows)
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    async fn fetch_records(&self, animal_id: &str, range: Option<DateRange>) -> Result<Vec<RawMilkRecord>> {
        let rows: Vec<_> = self
            .load_rows()?
            .into_iter()
            .filter(|r| r.ear_tag_no == animal_id)
            // Rows with unreadable dates stay in so the normalizer can account for them.
            .filter(|r| match (range, parse_calendar_date(&r.date)) {
                (Some(range), Some(date)) => range.contains(date),
                _ => true,
            })
            .collect();
        debug!(animal_id, count = rows.len(), path = %self.path.display(), "CSV records loaded");
        Ok(rows)
    }

    async fn fetch_animal_profile(&self, animal_id: &str) -> Result<AnimalProfile> {
        Ok(self
            .profiles
            .get(animal_id)
            .cloned()
            .unwrap_or_else(|| AnimalProfile::unknown(animal_id)))
    }

    async fn list_animals(&self) -> Result<Vec<String>> {
        let tags: BTreeSet<String> = self
            .load_rows()?
            .into_iter()
            .map(|r| r.ear_tag_no)
            .filter(|tag| !tag.is_empty())
            .collect();
        Ok(tags.into_iter().collect())
    }
}
