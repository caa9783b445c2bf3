use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{Instrument, debug, error, info, warn};

use crate::analyzers::aggregate::{aggregate_daily, sorted_summaries};
use crate::analyzers::curve::{build_lactation_curve, curve_efficiency, expected_lactation};
use crate::analyzers::production::{PersistencyWindow, calculate_production_statistics, lactation_start};
use crate::analyzers::quality::calculate_quality_statistics;
use crate::analyzers::report::{ReportInputs, assemble_report};
use crate::analyzers::trend::build_trend_series;
use crate::analyzers::types::{
    DailyProductionSummary, ExpectedLactation, HerdIndex, HerdIndexEntry, LactationCurvePoint,
    ProductionStatistics, QualityStatistics, ReportPayload, TrendSeries,
};
use crate::config::AnalyticsConfig;
use crate::parser::normalize_records;
use crate::records::{DateRange, RawMilkRecord};
use crate::services::record_source::{AnimalProfile, RecordSource};

/// Everything derived from one animal's records in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LactationAnalysis {
    pub lactation_start: Option<NaiveDate>,
    pub daily: Vec<DailyProductionSummary>,
    pub curve: Vec<LactationCurvePoint>,
    pub expected: ExpectedLactation,
    pub statistics: ProductionStatistics,
    pub trend: TrendSeries,
    pub quality: QualityStatistics,
    pub report: ReportPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalAnalysis {
    pub profile: AnimalProfile,
    pub analysis: LactationAnalysis,
}

/// Runs the whole pipeline over already-fetched records for one animal.
///
/// Pure: `now` stands in for the clock, and the same input always produces
/// the same output.
pub fn analyze_records(
    records: &[RawMilkRecord],
    range: Option<&DateRange>,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> LactationAnalysis {
    let normalized = normalize_records(records);
    let daily = sorted_summaries(aggregate_daily(&normalized));
    let start = lactation_start(&daily);

    let curve = build_lactation_curve(&daily, start, &config.curve, config.lactation_length);
    let statistics = calculate_production_statistics(
        &daily,
        now,
        PersistencyWindow {
            offset_days: config.persistency_day,
            tolerance_days: config.persistency_tolerance_days,
        },
    );
    let trend = build_trend_series(&daily, config.moving_average_window, config.trend_window);
    let quality = calculate_quality_statistics(&normalized);

    let report = assemble_report(ReportInputs {
        records,
        summaries: &daily,
        statistics: &statistics,
        trend: &trend,
        efficiency: curve_efficiency(&curve),
        period: range,
    });

    debug!(
        records = records.len(),
        valid = normalized.len(),
        days = daily.len(),
        "Lactation analysis computed"
    );

    LactationAnalysis {
        lactation_start: start,
        daily,
        curve,
        expected: expected_lactation(&config.curve, config.lactation_length),
        statistics,
        trend,
        quality,
        report,
    }
}

/// Fetches one animal's records and profile, then analyzes them.
#[tracing::instrument(skip(source, config))]
pub async fn analyze_animal<S: RecordSource + ?Sized>(
    source: &S,
    animal_id: &str,
    range: Option<DateRange>,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Result<AnimalAnalysis> {
    let records = source
        .fetch_records(animal_id, range)
        .await
        .with_context(|| format!("failed to fetch records for animal '{animal_id}'"))?;
    let profile = source
        .fetch_animal_profile(animal_id)
        .await
        .with_context(|| format!("failed to fetch profile for animal '{animal_id}'"))?;

    if records.is_empty() {
        warn!("No milk records for animal");
    }

    let analysis = analyze_records(&records, range.as_ref(), now, config);
    info!(
        total = analysis.statistics.current_lactation_total,
        days_in_milk = analysis.statistics.days_in_milk,
        "Animal analyzed"
    );

    Ok(AnimalAnalysis { profile, analysis })
}

/// Analyzes every animal the source lists, `concurrency` at a time.
///
/// A failure for one animal is logged and leaves it out of the index.
#[tracing::instrument(skip(source, config))]
pub async fn analyze_herd<S: RecordSource + ?Sized + 'static>(
    source: Arc<S>,
    range: Option<DateRange>,
    now: DateTime<Utc>,
    config: Arc<AnalyticsConfig>,
    concurrency: usize,
) -> Result<HerdIndex> {
    let animal_ids = source.list_animals().await.context("failed to list animals")?;
    info!(animals = animal_ids.len(), "Starting herd analysis");

    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(animal_ids.len());

    for animal_id in animal_ids {
        let sem = semaphore.clone();
        let source = source.clone();
        let config = config.clone();
        let span = tracing::info_span!("herd_animal", animal_id = %animal_id);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire_owned().await.ok()?;
                match analyze_animal(source.as_ref(), &animal_id, range, now, &config).await {
                    Ok(result) => Some(index_entry(&result)),
                    Err(e) => {
                        error!(error = %e, "Animal analysis failed");
                        None
                    }
                }
            }
            .instrument(span),
        );
        tasks.push(task);
    }

    let mut animals = Vec::new();
    for task in tasks {
        match task.await {
            Ok(Some(entry)) => animals.push(entry),
            Ok(None) => {}
            Err(e) => error!(error = %e, "Herd analysis task panicked"),
        }
    }
    animals.sort_by(|a, b| a.ear_tag_no.cmp(&b.ear_tag_no));

    info!(analyzed = animals.len(), "Herd analysis complete");
    Ok(HerdIndex {
        generated_at: now,
        animals,
    })
}

fn index_entry(result: &AnimalAnalysis) -> HerdIndexEntry {
    let AnimalAnalysis { profile, analysis } = result;
    HerdIndexEntry {
        ear_tag_no: profile.ear_tag_no.clone(),
        name: profile.name.clone(),
        lactation_number: profile.lactation_number,
        total_production: analysis.report.total_production,
        average_daily: analysis.report.average_daily,
        peak_yield: analysis.report.peak_production,
        persistency: analysis.statistics.persistency,
        days_in_milk: analysis.statistics.days_in_milk,
        production_trend: analysis.report.production_trend,
    }
}
