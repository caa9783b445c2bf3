//! Moving averages and period-over-period production trend.

use crate::analyzers::types::{DailyProductionSummary, TrendPoint, TrendSeries};
use crate::analyzers::utility::{mean, pct};

/// Builds the ascending daily series with a trailing moving average and the
/// overall trend scalar.
///
/// Windows count data points, not calendar days: a gap in the records does
/// not shrink the window.
pub fn build_trend_series(
    summaries: &[DailyProductionSummary],
    moving_average_window: usize,
    trend_window: usize,
) -> TrendSeries {
    let mut ordered: Vec<&DailyProductionSummary> = summaries.iter().collect();
    ordered.sort_by_key(|s| s.date());

    let totals: Vec<f64> = ordered.iter().map(|s| s.total()).collect();
    let averages = moving_averages(&totals, moving_average_window);

    let points = ordered
        .iter()
        .zip(averages)
        .map(|(s, moving_average)| TrendPoint {
            date: s.date(),
            morning: s.morning(),
            evening: s.evening(),
            total: s.total(),
            moving_average,
        })
        .collect();

    TrendSeries {
        points,
        trend: period_trend(&totals, trend_window),
    }
}

/// Trailing mean over at most `window` points ending at each index. The window
/// shrinks at the start of the series.
pub fn moving_averages(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| mean(&values[(i + 1).saturating_sub(window)..=i]))
        .collect()
}

/// Percent change between the mean of the last `window` values and the mean of
/// the `window` values before them.
///
/// Returns 0.0 with fewer than two values, no preceding window, or a zero
/// preceding mean.
pub fn period_trend(values: &[f64], window: usize) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let window = window.max(1);

    let split = values.len().saturating_sub(window);
    let (earlier, latest) = values.split_at(split);
    let previous = &earlier[earlier.len().saturating_sub(window)..];
    if previous.is_empty() {
        return 0.0;
    }

    let previous_avg = mean(previous);
    let latest_avg = mean(latest);
    if previous_avg == 0.0 {
        return 0.0;
    }
    pct(latest_avg - previous_avg, previous_avg)
}
