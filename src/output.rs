//! Output formatting and persistence for analysis results.
//!
//! Supports pretty-printing, JSON files, and CSV append of daily summaries.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::DailyProductionSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Flat CSV shape of a [`DailyProductionSummary`].
#[derive(Debug, Serialize)]
struct DailyRow<'a> {
    ear_tag_no: &'a str,
    date: NaiveDate,
    morning: f64,
    evening: f64,
    total: f64,
    fat: Option<f64>,
    protein: Option<f64>,
    lactose: Option<f64>,
    scc: Option<f64>,
    note: Option<&'a str>,
}

impl<'a> From<&'a DailyProductionSummary> for DailyRow<'a> {
    fn from(day: &'a DailyProductionSummary) -> Self {
        let quality = day.quality();
        DailyRow {
            ear_tag_no: day.ear_tag_no(),
            date: day.date(),
            morning: day.morning(),
            evening: day.evening(),
            total: day.total(),
            fat: quality.fat,
            protein: quality.protein,
            lactose: quality.lactose,
            scc: quality.somatic_cell_count,
            note: day.note(),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON, creating parent directories.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {path}"))?;
    info!(path, "JSON written");
    Ok(())
}

/// Appends daily summaries as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_daily_rows(path: &str, days: &[DailyProductionSummary]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = days.len(), "Appending daily CSV rows");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {path}"))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for day in days {
        writer.serialize(DailyRow::from(day))?;
    }
    writer.flush()?;

    Ok(())
}
