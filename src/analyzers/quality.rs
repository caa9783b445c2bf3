//! Min/avg/max over the optional milk-quality readings.

use crate::analyzers::types::{ParameterStats, QualityStatistics};
use crate::analyzers::utility::mean;
use crate::records::{MilkWeighingRecord, QualityParameter};

/// Summarizes each quality parameter over the records that report it.
pub fn calculate_quality_statistics(records: &[MilkWeighingRecord]) -> QualityStatistics {
    let stats_for = |param: QualityParameter| {
        let values: Vec<f64> = records.iter().filter_map(|r| r.quality.get(param)).collect();
        parameter_stats(&values)
    };

    QualityStatistics {
        fat: stats_for(QualityParameter::Fat),
        protein: stats_for(QualityParameter::Protein),
        lactose: stats_for(QualityParameter::Lactose),
        somatic_cell_count: stats_for(QualityParameter::SomaticCellCount),
    }
}

/// `{0, 0, 0}` when there are no observations.
pub fn parameter_stats(values: &[f64]) -> ParameterStats {
    if values.is_empty() {
        return ParameterStats::default();
    }
    ParameterStats {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg: mean(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{QualitySample, Shift};
    use chrono::NaiveDate;

    fn record(fat: Option<f64>, scc: Option<f64>) -> MilkWeighingRecord {
        MilkWeighingRecord {
            ear_tag_no: "TAG-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            shift: Shift::Morning,
            quantity: 10.0,
            quality: QualitySample {
                fat,
                somatic_cell_count: scc,
                ..Default::default()
            },
            note: None,
        }
    }

    #[test]
    fn test_no_records_is_all_zero() {
        assert_eq!(calculate_quality_statistics(&[]), QualityStatistics::default());
    }

    #[test]
    fn test_missing_parameter_is_zero() {
        let stats = calculate_quality_statistics(&[record(Some(3.5), None), record(Some(4.5), None)]);

        assert_eq!(stats.fat, ParameterStats { min: 3.5, max: 4.5, avg: 4.0 });
        assert_eq!(stats.somatic_cell_count, ParameterStats::default());
        assert_eq!(stats.protein, ParameterStats::default());
    }

    #[test]
    fn test_only_reporting_records_count() {
        let stats = calculate_quality_statistics(&[
            record(None, Some(100_000.0)),
            record(Some(3.0), None),
            record(None, Some(300_000.0)),
        ]);

        assert_eq!(stats.fat, ParameterStats { min: 3.0, max: 3.0, avg: 3.0 });
        assert_eq!(stats.somatic_cell_count.avg, 200_000.0);
        assert_eq!(stats.somatic_cell_count.min, 100_000.0);
    }
}
