//! Lactation-level production statistics.

use chrono::{DateTime, NaiveDate, Utc};

use crate::analyzers::types::{DailyProductionSummary, ProductionStatistics};
use crate::analyzers::utility::{day_index, pct, round1};

const SECONDS_PER_DAY: i64 = 86_400;

/// Where and how wide to look for the persistency sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistencyWindow {
    /// Days after lactation start.
    pub offset_days: i64,
    pub tolerance_days: i64,
}

impl Default for PersistencyWindow {
    fn default() -> Self {
        Self {
            offset_days: 60,
            tolerance_days: 1,
        }
    }
}

/// Earliest day with a record; recomputed on every pass.
pub fn lactation_start(summaries: &[DailyProductionSummary]) -> Option<NaiveDate> {
    summaries.iter().map(DailyProductionSummary::date).min()
}

/// Whole days in milk at `now`, rounded up. Lactation start counts from UTC
/// midnight. A `now` before the start gives 0.
pub fn days_in_milk(lactation_start: NaiveDate, now: DateTime<Utc>) -> u32 {
    let start = lactation_start.and_time(chrono::NaiveTime::MIN).and_utc();
    let seconds = (now - start).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    let days = seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) > 0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Derives lactation statistics from daily summaries in any order.
///
/// Empty input yields [`ProductionStatistics::default`].
pub fn calculate_production_statistics(
    summaries: &[DailyProductionSummary],
    now: DateTime<Utc>,
    window: PersistencyWindow,
) -> ProductionStatistics {
    let Some(start) = lactation_start(summaries) else {
        return ProductionStatistics::default();
    };

    let mut ordered: Vec<&DailyProductionSummary> = summaries.iter().collect();
    ordered.sort_by_key(|s| s.date());

    let current_lactation_total: f64 = ordered.iter().map(|s| s.total()).sum();
    let distinct_days = ordered.len().max(1);
    let average_daily_yield = current_lactation_total / distinct_days as f64;

    // Ascending scan with a strict comparison keeps the earliest maximum.
    let mut peak: Option<&DailyProductionSummary> = None;
    for &s in &ordered {
        if peak.is_none_or(|p| s.total() > p.total()) {
            peak = Some(s);
        }
    }
    let (peak_yield, peak_day) = peak
        .map(|p| (p.total(), to_day(day_index(start, p.date()))))
        .unwrap_or_default();

    let last_recorded_yield = ordered.last().map(|s| s.total()).unwrap_or(0.0);

    let sample = persistency_sample(&ordered, start, window);
    let persistency = round1(pct(sample, peak_yield));

    ProductionStatistics {
        current_lactation_total,
        average_daily_yield,
        peak_yield,
        peak_day,
        last_recorded_yield,
        days_in_milk: days_in_milk(start, now),
        persistency,
    }
}

/// Total of the summary nearest `start + offset` within the tolerance, the
/// earlier one on equal distance. Zero when the window is empty.
fn persistency_sample(
    ordered: &[&DailyProductionSummary],
    start: NaiveDate,
    window: PersistencyWindow,
) -> f64 {
    let Some(target) = chrono::TimeDelta::try_days(window.offset_days)
        .and_then(|offset| start.checked_add_signed(offset))
    else {
        return 0.0;
    };

    let mut best: Option<(i64, f64)> = None;
    for s in ordered {
        let distance = (s.date() - target).num_days().abs();
        if distance > window.tolerance_days {
            continue;
        }
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, s.total()));
        }
    }
    best.map(|(_, total)| total).unwrap_or(0.0)
}

fn to_day(index: i64) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
