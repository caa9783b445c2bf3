//! Daily/shift aggregation of normalized weighing records.

use std::collections::HashMap;

use crate::analyzers::types::DailyProductionSummary;
use crate::records::MilkWeighingRecord;

/// Groups records by calendar day, keyed by ISO date (`YYYY-MM-DD`).
///
/// Quantities for the same shift on the same day are summed. For quality
/// readings and the note, the last value seen in input order wins, each
/// parameter on its own.
pub fn aggregate_daily(records: &[MilkWeighingRecord]) -> HashMap<String, DailyProductionSummary> {
    let mut days: HashMap<String, DailyProductionSummary> = HashMap::new();

    for record in records {
        let day = days
            .entry(record.date.format("%Y-%m-%d").to_string())
            .or_insert_with(|| DailyProductionSummary::new(record.ear_tag_no.clone(), record.date));

        day.add(record.shift, record.quantity);
        day.record_quality(&record.quality);
        day.record_note(record.note.as_deref());
    }

    days
}

/// Flattens the daily map into ascending date order.
pub fn sorted_summaries(days: HashMap<String, DailyProductionSummary>) -> Vec<DailyProductionSummary> {
    let mut summaries: Vec<_> = days.into_values().collect();
    summaries.sort_by_key(DailyProductionSummary::date);
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{QualitySample, Shift};
    use chrono::NaiveDate;

    fn record(date: &str, shift: Shift, quantity: f64) -> MilkWeighingRecord {
        MilkWeighingRecord {
            ear_tag_no: "TAG-1".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            shift,
            quantity,
            quality: QualitySample::default(),
            note: None,
        }
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_splits_shifts() {
        let records = vec![
            record("2024-01-01", Shift::Morning, 10.0),
            record("2024-01-01", Shift::Evening, 8.0),
            record("2024-01-02", Shift::Evening, 7.0),
        ];

        let days = aggregate_daily(&records);

        assert_eq!(days.len(), 2);
        let first = &days["2024-01-01"];
        assert_eq!(first.morning(), 10.0);
        assert_eq!(first.evening(), 8.0);
        assert_eq!(first.total(), 18.0);
        let second = &days["2024-01-02"];
        assert_eq!(second.morning(), 0.0);
        assert_eq!(second.total(), 7.0);
    }

    #[test]
    fn test_aggregate_sums_repeated_shift() {
        let records = vec![
            record("2024-01-01", Shift::Morning, 6.0),
            record("2024-01-01", Shift::Morning, 4.5),
        ];

        let days = aggregate_daily(&records);

        assert_eq!(days["2024-01-01"].morning(), 10.5);
        assert_eq!(days["2024-01-01"].total(), 10.5);
    }

    #[test]
    fn test_aggregate_quality_last_write_per_parameter() {
        let mut morning = record("2024-01-01", Shift::Morning, 6.0);
        morning.quality = QualitySample {
            fat: Some(3.8),
            protein: Some(3.2),
            ..Default::default()
        };
        morning.note = Some("calm".into());
        let mut evening = record("2024-01-01", Shift::Evening, 5.0);
        evening.quality = QualitySample {
            fat: Some(4.2),
            ..Default::default()
        };

        let days = aggregate_daily(&[morning, evening]);
        let day = &days["2024-01-01"];

        assert_eq!(day.quality().fat, Some(4.2));
        assert_eq!(day.quality().protein, Some(3.2));
        assert_eq!(day.quality().lactose, None);
        assert_eq!(day.note(), Some("calm"));
    }

    #[test]
    fn test_sorted_summaries_ascending() {
        let records = vec![
            record("2024-01-03", Shift::Morning, 1.0),
            record("2023-12-31", Shift::Morning, 2.0),
            record("2024-01-01", Shift::Morning, 3.0),
        ];

        let sorted = sorted_summaries(aggregate_daily(&records));
        let dates: Vec<_> = sorted.iter().map(|d| d.date().to_string()).collect();

        assert_eq!(dates, vec!["2023-12-31", "2024-01-01", "2024-01-03"]);
    }
}
