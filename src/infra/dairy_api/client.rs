use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::fetch::{HttpClient, fetch_json};
use crate::parser::records_from_value;
use crate::records::{DateRange, RawMilkRecord};
use crate::services::record_source::{AnimalProfile, RecordSource};

/// [`RecordSource`] backed by the dairy record-keeping REST API.
pub struct DairyApiClient<C> {
    base_url: Url,
    client: C,
}

impl<C: HttpClient> DairyApiClient<C> {
    pub fn new(base_url: &str, client: C) -> Result<Self> {
        // A trailing slash keeps `join` from dropping the last path segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).with_context(|| format!("invalid API base URL '{base_url}'"))?;
        Ok(Self { base_url, client })
    }

    pub(crate) fn records_url(&self, animal_id: &str, range: Option<&DateRange>) -> Result<Url> {
        let mut url = self.base_url.join("milk-records")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("earTagNo", animal_id);
            if let Some(range) = range {
                if let Some(start) = range.start {
                    query.append_pair("startDate", &start.format("%Y-%m-%d").to_string());
                }
                if let Some(end) = range.end {
                    query.append_pair("endDate", &end.format("%Y-%m-%d").to_string());
                }
            }
        }
        Ok(url)
    }

    pub(crate) fn animal_url(&self, animal_id: &str) -> Result<Url> {
        let mut url = self.base_url.join("animals")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot carry a path"))?
            .push(animal_id);
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> RecordSource for DairyApiClient<C> {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_records(&self, animal_id: &str, range: Option<DateRange>) -> Result<Vec<RawMilkRecord>> {
        let url = self.records_url(animal_id, range.as_ref())?;
        let json = fetch_json(&self.client, url).await?;
        let records = records_from_value(json)?;
        debug!(count = records.len(), "Milk records fetched");
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_animal_profile(&self, animal_id: &str) -> Result<AnimalProfile> {
        let url = self.animal_url(animal_id)?;
        let json = fetch_json(&self.client, url).await?;
        profile_from_value(json).with_context(|| format!("invalid profile for animal '{animal_id}'"))
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_animals(&self) -> Result<Vec<String>> {
        let url = self.base_url.join("animals")?;
        let json = fetch_json(&self.client, url).await?;
        Ok(ear_tags_from_value(&json))
    }
}

fn unwrap_data(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

pub(crate) fn profile_from_value(value: serde_json::Value) -> Result<AnimalProfile> {
    Ok(serde_json::from_value(unwrap_data(value))?)
}

/// Pulls `earTagNo` out of each listed animal, skipping entries without one.
pub(crate) fn ear_tags_from_value(value: &serde_json::Value) -> Vec<String> {
    let list = match value {
        serde_json::Value::Object(map) => map.get("data").unwrap_or(value),
        _ => value,
    };
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["earTagNo"].as_str())
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
