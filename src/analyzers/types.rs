//! Data types produced by the analytics pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::records::{QualitySample, RawMilkRecord, Shift};

/// One calendar day of milk for one animal.
///
/// Shift quantities only change through [`DailyProductionSummary::add`], so
/// `total == morning + evening` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProductionSummary {
    ear_tag_no: String,
    date: NaiveDate,
    morning: f64,
    evening: f64,
    total: f64,
    quality: QualitySample,
    note: Option<String>,
}

impl DailyProductionSummary {
    pub fn new(ear_tag_no: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            ear_tag_no: ear_tag_no.into(),
            date,
            morning: 0.0,
            evening: 0.0,
            total: 0.0,
            quality: QualitySample::default(),
            note: None,
        }
    }

    /// Adds a shift quantity; repeated shifts accumulate.
    pub fn add(&mut self, shift: Shift, quantity: f64) {
        match shift {
            Shift::Morning => self.morning += quantity,
            Shift::Evening => self.evening += quantity,
        }
        self.total = self.morning + self.evening;
    }

    pub fn record_quality(&mut self, sample: &QualitySample) {
        self.quality.merge_present(sample);
    }

    pub fn record_note(&mut self, note: Option<&str>) {
        if let Some(note) = note {
            self.note = Some(note.to_string());
        }
    }

    pub fn ear_tag_no(&self) -> &str {
        &self.ear_tag_no
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn morning(&self) -> f64 {
        self.morning
    }

    pub fn evening(&self) -> f64 {
        self.evening
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn quality(&self) -> &QualitySample {
        &self.quality
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Expected and observed yield for one day of lactation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LactationCurvePoint {
    pub day: u32,
    pub expected: f64,
    /// `None` when nothing was recorded for the day, which is not the same as
    /// a recorded zero.
    pub actual: Option<f64>,
}

/// Characteristics of the modelled lactation itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedLactation {
    pub peak_day: f64,
    pub peak_yield: f64,
    pub total_yield: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStatistics {
    pub current_lactation_total: f64,
    pub average_daily_yield: f64,
    pub peak_yield: f64,
    /// Day index of the earliest maximum.
    pub peak_day: u32,
    pub last_recorded_yield: f64,
    pub days_in_milk: u32,
    /// Percent, one decimal.
    pub persistency: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParameterStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityStatistics {
    pub fat: ParameterStats,
    pub protein: ParameterStats,
    pub lactose: ParameterStats,
    pub somatic_cell_count: ParameterStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub morning: f64,
    pub evening: f64,
    pub total: f64,
    pub moving_average: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    /// Percent change of the latest window average over the one before it.
    pub trend: f64,
}

/// Payload handed to the document-export collaborators. Field names are the
/// wire contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub milk_records: Vec<RawMilkRecord>,
    pub total_production: f64,
    pub average_daily: f64,
    pub active_cattle_count: usize,
    pub efficiency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    pub peak_production: f64,
    pub production_trend: f64,
}

/// Summary entry for one animal in the herd index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HerdIndexEntry {
    pub ear_tag_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lactation_number: u32,
    pub total_production: f64,
    pub average_daily: f64,
    pub peak_yield: f64,
    pub persistency: f64,
    pub days_in_milk: u32,
    pub production_trend: f64,
}

/// Herd-wide listing produced by a herd analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HerdIndex {
    pub generated_at: DateTime<Utc>,
    pub animals: Vec<HerdIndexEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_total_in_sync() {
        let mut day = DailyProductionSummary::new("TAG-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        day.add(Shift::Morning, 10.0);
        day.add(Shift::Evening, 8.0);
        day.add(Shift::Morning, 1.5);

        assert_eq!(day.morning(), 11.5);
        assert_eq!(day.evening(), 8.0);
        assert_eq!(day.total(), day.morning() + day.evening());
    }

    #[test]
    fn test_report_omits_missing_period() {
        let json = serde_json::to_value(ReportPayload::default()).unwrap();
        let obj = json.as_object().unwrap();

        assert!(obj.contains_key("milkRecords"));
        assert!(obj.contains_key("activeCattleCount"));
        assert!(obj.contains_key("productionTrend"));
        assert!(!obj.contains_key("periodStart"));
        assert!(!obj.contains_key("periodEnd"));
    }

    #[test]
    fn test_curve_point_serializes_absent_actual_as_null() {
        let point = LactationCurvePoint { day: 3, expected: 21.0, actual: None };
        let json = serde_json::to_value(point).unwrap();
        assert!(json["actual"].is_null());
    }
}
