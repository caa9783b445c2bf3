//! Woods lactation curve: `a · d^b · e^(−c·d)`.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::analyzers::types::{DailyProductionSummary, ExpectedLactation, LactationCurvePoint};
use crate::analyzers::utility::{day_index, pct, round1};
use crate::config::WoodsParameters;

/// Expected daily yield on lactation day `day` (1-based). Day 0 yields 0.
pub fn expected_yield(params: &WoodsParameters, day: u32) -> f64 {
    if day == 0 {
        return 0.0;
    }
    let d = f64::from(day);
    let y = params.a * d.powf(params.b) * (-params.c * d).exp();
    if y.is_finite() { y } else { 0.0 }
}

/// Builds the expected-vs-actual series for days `1..=length`.
///
/// `actual` is filled only for days that have a summary.
pub fn build_lactation_curve(
    summaries: &[DailyProductionSummary],
    lactation_start: Option<NaiveDate>,
    params: &WoodsParameters,
    length: u32,
) -> Vec<LactationCurvePoint> {
    let actual_by_day: HashMap<i64, f64> = match lactation_start {
        Some(start) => summaries
            .iter()
            .map(|s| (day_index(start, s.date()), s.total()))
            .collect(),
        None => HashMap::new(),
    };

    (1..=length)
        .map(|day| LactationCurvePoint {
            day,
            expected: expected_yield(params, day),
            actual: actual_by_day.get(&i64::from(day)).copied(),
        })
        .collect()
}

/// Peak timing, peak height and horizon total of the modelled curve.
///
/// Peak fields stay zero when the curve has no interior maximum (`b` or `c`
/// not positive).
pub fn expected_lactation(params: &WoodsParameters, length: u32) -> ExpectedLactation {
    let total_yield: f64 = (1..=length).map(|d| expected_yield(params, d)).sum();

    if params.b <= 0.0 || params.c <= 0.0 {
        return ExpectedLactation {
            total_yield,
            ..Default::default()
        };
    }

    let peak_day = params.b / params.c;
    let peak_yield = params.a * peak_day.powf(params.b) * (-params.b).exp();

    ExpectedLactation {
        peak_day,
        peak_yield,
        total_yield,
    }
}

/// Observed production as a percentage of expected production, over the
/// days that have an observation.
pub fn curve_efficiency(curve: &[LactationCurvePoint]) -> f64 {
    let (actual, expected) = curve
        .iter()
        .filter_map(|p| p.actual.map(|a| (a, p.expected)))
        .fold((0.0, 0.0), |(sa, se), (a, e)| (sa + a, se + e));

    round1(pct(actual, expected))
}
