//! Packages analysis results into the payload read by the document exporter.

use std::collections::HashSet;

use crate::analyzers::types::{DailyProductionSummary, ProductionStatistics, ReportPayload, TrendSeries};
use crate::analyzers::utility::round1;
use crate::records::{DateRange, RawMilkRecord};

/// Inputs to [`assemble_report`], all computed upstream.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub records: &'a [RawMilkRecord],
    /// Ascending by date.
    pub summaries: &'a [DailyProductionSummary],
    pub statistics: &'a ProductionStatistics,
    pub trend: &'a TrendSeries,
    pub efficiency: f64,
    pub period: Option<&'a DateRange>,
}

/// Builds the report payload. Numbers are rounded to one decimal for display.
///
/// The period comes from the requested range when there is one, otherwise
/// from the first and last summarized days.
pub fn assemble_report(inputs: ReportInputs<'_>) -> ReportPayload {
    let active_cattle_count = inputs
        .records
        .iter()
        .map(|r| r.ear_tag_no.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<HashSet<_>>()
        .len();

    let (period_start, period_end) = match inputs.period.filter(|p| !p.is_unbounded()) {
        Some(range) => (range.start, range.end),
        None => (
            inputs.summaries.first().map(DailyProductionSummary::date),
            inputs.summaries.last().map(DailyProductionSummary::date),
        ),
    };

    ReportPayload {
        milk_records: inputs.records.to_vec(),
        total_production: round1(inputs.statistics.current_lactation_total),
        average_daily: round1(inputs.statistics.average_daily_yield),
        active_cattle_count,
        efficiency: round1(inputs.efficiency),
        period_start,
        period_end,
        peak_production: round1(inputs.statistics.peak_yield),
        production_trend: round1(inputs.trend.trend),
    }
}
