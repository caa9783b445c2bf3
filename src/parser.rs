//! Record normalization: turns wire-shaped weighing records into typed ones.
//!
//! Malformed values never fail the pass. Quantities fall back to zero, bad
//! quality readings become absent, and records without a usable date or
//! shift are dropped.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::records::{MilkWeighingRecord, QualitySample, RawMilkRecord, RawValue, Shift};

/// Decodes a JSON payload of raw records.
///
/// Accepts a bare array or an object carrying the array under `data`.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or hold neither shape.
pub fn parse_records_json(bytes: &[u8]) -> Result<Vec<RawMilkRecord>> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).context("milk record payload is not valid JSON")?;
    records_from_value(value)
}

pub(crate) fn records_from_value(value: serde_json::Value) -> Result<Vec<RawMilkRecord>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => anyhow::bail!("milk record payload has no `data` array"),
        },
        other => anyhow::bail!("unexpected milk record payload: {other}"),
    };

    // Each element decodes on its own so one bad record cannot sink the batch.
    let received = items.len();
    let records: Vec<RawMilkRecord> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Dropping undecodable milk record");
                None
            }
        })
        .collect();
    if records.len() != received {
        debug!(received, kept = records.len(), "Dropped undecodable milk records");
    }
    Ok(records)
}

/// Normalizes every record, dropping the ones that cannot be placed on a
/// calendar day and shift.
pub fn normalize_records(raw: &[RawMilkRecord]) -> Vec<MilkWeighingRecord> {
    let normalized: Vec<_> = raw.iter().filter_map(normalize_record).collect();
    if normalized.len() != raw.len() {
        debug!(
            received = raw.len(),
            kept = normalized.len(),
            "Dropped malformed milk records"
        );
    }
    normalized
}

/// Normalizes a single record. Returns `None` for a bad shift or date.
pub fn normalize_record(raw: &RawMilkRecord) -> Option<MilkWeighingRecord> {
    let Some(shift) = Shift::parse(&raw.shift) else {
        debug!(ear_tag = %raw.ear_tag_no, shift = %raw.shift, "Dropping record with unknown shift");
        return None;
    };
    let Some(date) = parse_calendar_date(&raw.date) else {
        debug!(ear_tag = %raw.ear_tag_no, date = %raw.date, "Dropping record with unparsable date");
        return None;
    };

    Some(MilkWeighingRecord {
        ear_tag_no: raw.ear_tag_no.clone(),
        date,
        shift,
        quantity: coerce_quantity(raw.quantity.as_ref()),
        quality: QualitySample {
            fat: coerce_quality(raw.fat.as_ref()),
            protein: coerce_quality(raw.protein.as_ref()),
            lactose: coerce_quality(raw.lactose.as_ref()),
            somatic_cell_count: coerce_quality(raw.scc.as_ref()),
        },
        note: raw
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    })
}

/// Coerces a quantity to a finite, non-negative number of liters. Anything
/// unreadable counts as zero.
pub fn coerce_quantity(value: Option<&RawValue>) -> f64 {
    value
        .and_then(RawValue::as_f64)
        .filter(|q| *q >= 0.0)
        .unwrap_or(0.0)
}

fn coerce_quality(value: Option<&RawValue>) -> Option<f64> {
    value.and_then(RawValue::as_f64).filter(|v| *v >= 0.0)
}

/// Reads the `YYYY-MM-DD` date portion of an ISO date or timestamp.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10)?;
    match s.as_bytes().get(10) {
        None | Some(b'T') | Some(b't') | Some(b' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
