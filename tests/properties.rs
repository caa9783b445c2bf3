use chrono::{Days, NaiveDate};
use lactation_analytics::analyzers::aggregate::aggregate_daily;
use lactation_analytics::analyzers::analyzer::analyze_records;
use lactation_analytics::analyzers::trend::moving_averages;
use lactation_analytics::config::AnalyticsConfig;
use lactation_analytics::parser::normalize_records;
use lactation_analytics::records::{RawMilkRecord, RawValue};
use proptest::prelude::*;

fn raw_record() -> impl Strategy<Value = RawMilkRecord> {
    (
        0u64..120,
        prop_oneof![Just("morning"), Just("evening"), Just("night")],
        prop_oneof![
            (0.0f64..40.0).prop_map(RawValue::Number),
            (-5.0f64..0.0).prop_map(RawValue::Number),
            Just(RawValue::Text("n/a".to_string())),
        ],
        proptest::option::of(2.5f64..6.0),
    )
        .prop_map(|(offset, shift, quantity, fat)| RawMilkRecord {
            ear_tag_no: "P-1".to_string(),
            date: (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset)).to_string(),
            shift: shift.to_string(),
            quantity: Some(quantity),
            fat: fat.map(RawValue::Number),
            ..Default::default()
        })
}

fn now() -> chrono::DateTime<chrono::Utc> {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

proptest! {
    #[test]
    fn daily_total_is_sum_of_shifts(records in prop::collection::vec(raw_record(), 0..60)) {
        let days = aggregate_daily(&normalize_records(&records));
        for day in days.values() {
            prop_assert_eq!(day.total(), day.morning() + day.evening());
            prop_assert!(day.morning() >= 0.0 && day.evening() >= 0.0);
        }
    }

    #[test]
    fn persistency_is_bounded(records in prop::collection::vec(raw_record(), 0..60)) {
        let stats = analyze_records(&records, None, now(), &AnalyticsConfig::default()).statistics;
        if stats.peak_yield > 0.0 {
            prop_assert!((0.0..=100.0).contains(&stats.persistency));
        } else {
            prop_assert_eq!(stats.persistency, 0.0);
        }
        prop_assert!(stats.average_daily_yield.is_finite());
    }

    #[test]
    fn pipeline_is_idempotent(records in prop::collection::vec(raw_record(), 0..40)) {
        let config = AnalyticsConfig::default();
        prop_assert_eq!(
            analyze_records(&records, None, now(), &config),
            analyze_records(&records, None, now(), &config)
        );
    }

    #[test]
    fn single_point_moving_average_is_identity(value in 0.0f64..1000.0, window in 1usize..30) {
        prop_assert_eq!(moving_averages(&[value], window), vec![value]);
    }
}
