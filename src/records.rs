//! Milk-weighing records, both as received from the record-keeping API and
//! after normalization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the two daily milking sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
}

impl Shift {
    /// Accepts exactly `morning` or `evening`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(Shift::Morning),
            "evening" => Some(Shift::Evening),
            _ => None,
        }
    }
}

/// A loosely typed scalar. Upstream sends numbers either as JSON numbers or
/// as strings, and CSV exports carry whatever was typed into the form.
/// Anything else (booleans, objects, arrays) lands in `Other` and reads as
/// unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Finite numeric value, if one can be read.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Other(_) => None,
        };
        v.filter(|v| v.is_finite())
    }
}

/// A weighing record in its wire shape. Nothing is validated yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMilkRecord {
    #[serde(default)]
    pub ear_tag_no: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub quantity: Option<RawValue>,
    #[serde(default)]
    pub fat: Option<RawValue>,
    #[serde(default)]
    pub protein: Option<RawValue>,
    #[serde(default)]
    pub lactose: Option<RawValue>,
    #[serde(default, alias = "somaticCellCount")]
    pub scc: Option<RawValue>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Optional milk-quality measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySample {
    pub fat: Option<f64>,
    pub protein: Option<f64>,
    pub lactose: Option<f64>,
    pub somatic_cell_count: Option<f64>,
}

/// The quality parameters tracked per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityParameter {
    Fat,
    Protein,
    Lactose,
    SomaticCellCount,
}

impl QualityParameter {
    pub const ALL: [QualityParameter; 4] = [
        QualityParameter::Fat,
        QualityParameter::Protein,
        QualityParameter::Lactose,
        QualityParameter::SomaticCellCount,
    ];
}

impl QualitySample {
    pub fn get(&self, param: QualityParameter) -> Option<f64> {
        match param {
            QualityParameter::Fat => self.fat,
            QualityParameter::Protein => self.protein,
            QualityParameter::Lactose => self.lactose,
            QualityParameter::SomaticCellCount => self.somatic_cell_count,
        }
    }

    pub fn set(&mut self, param: QualityParameter, value: Option<f64>) {
        let slot = match param {
            QualityParameter::Fat => &mut self.fat,
            QualityParameter::Protein => &mut self.protein,
            QualityParameter::Lactose => &mut self.lactose,
            QualityParameter::SomaticCellCount => &mut self.somatic_cell_count,
        };
        *slot = value;
    }

    /// Overwrites each parameter that `other` reports, leaving the rest.
    pub fn merge_present(&mut self, other: &QualitySample) {
        for param in QualityParameter::ALL {
            if let Some(v) = other.get(param) {
                self.set(param, Some(v));
            }
        }
    }
}

/// A validated, typed weighing observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkWeighingRecord {
    pub ear_tag_no: String,
    pub date: NaiveDate,
    pub shift: Shift,
    /// Liters, always finite and non-negative.
    pub quantity: f64,
    pub quality: QualitySample,
    pub note: Option<String>,
}

/// Inclusive calendar filter. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_parse_is_exact() {
        assert_eq!(Shift::parse("morning"), Some(Shift::Morning));
        assert_eq!(Shift::parse("evening"), Some(Shift::Evening));
        assert_eq!(Shift::parse("Morning"), None);
        assert_eq!(Shift::parse(" evening"), None);
        assert_eq!(Shift::parse("noon"), None);
    }

    #[test]
    fn test_raw_value_reads_numbers_and_text() {
        assert_eq!(RawValue::Number(4.5).as_f64(), Some(4.5));
        assert_eq!(RawValue::Text(" 12.25 ".into()).as_f64(), Some(12.25));
        assert_eq!(RawValue::Text("abc".into()).as_f64(), None);
        assert_eq!(RawValue::Text("NaN".into()).as_f64(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).as_f64(), None);
        assert_eq!(RawValue::Other(serde_json::Value::Bool(true)).as_f64(), None);
    }

    #[test]
    fn test_raw_value_keeps_unexpected_json_types() {
        let rec: RawMilkRecord =
            serde_json::from_str(r#"{"shift": "evening", "quantity": true, "fat": {"value": 4}}"#).unwrap();

        assert_eq!(rec.quantity, Some(RawValue::Other(serde_json::Value::Bool(true))));
        assert!(matches!(rec.fat, Some(RawValue::Other(_))));
    }

    #[test]
    fn test_raw_record_accepts_mixed_json_types() {
        let json = r#"{
            "earTagNo": "TAG-1",
            "date": "2024-01-01T06:30:00Z",
            "shift": "morning",
            "quantity": "10.5",
            "fat": 3.9,
            "somaticCellCount": 120000
        }"#;
        let rec: RawMilkRecord = serde_json::from_str(json).unwrap();

        assert_eq!(rec.ear_tag_no, "TAG-1");
        assert_eq!(rec.quantity, Some(RawValue::Text("10.5".into())));
        assert_eq!(rec.fat.as_ref().and_then(RawValue::as_f64), Some(3.9));
        assert_eq!(rec.scc.as_ref().and_then(RawValue::as_f64), Some(120000.0));
        assert!(rec.protein.is_none());
        assert!(rec.note.is_none());
    }

    #[test]
    fn test_merge_present_keeps_missing_parameters() {
        let mut day = QualitySample {
            fat: Some(3.5),
            protein: Some(3.1),
            ..Default::default()
        };
        day.merge_present(&QualitySample {
            fat: Some(4.0),
            lactose: Some(4.8),
            ..Default::default()
        });

        assert_eq!(day.fat, Some(4.0));
        assert_eq!(day.protein, Some(3.1));
        assert_eq!(day.lactose, Some(4.8));
        assert_eq!(day.somatic_cell_count, None);
    }

    #[test]
    fn test_date_range_contains_is_inclusive() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let range = DateRange::new(Some(d("2024-01-01")), Some(d("2024-01-31")));

        assert!(range.contains(d("2024-01-01")));
        assert!(range.contains(d("2024-01-31")));
        assert!(!range.contains(d("2024-02-01")));
        assert!(DateRange::default().contains(d("1999-12-31")));
        assert!(DateRange::default().is_unbounded());
    }
}
