//! One analysis run: correlate, derive, aggregate.
//!
//! [`AnalysisSession`] holds the two raw inputs and only runs once both are
//! present. Every stage is a synchronous in-memory transformation executed
//! top to bottom; nothing persists between runs except the export cache.

use chrono::{DateTime, Utc};
use sa_common::{CorrelatedInstance, FulfillmentEvent, InterruptionEvent, SCHEMA_VERSION};
use sa_config::ReportSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregate::{
    interruption_frequency, most_available_per_zone, overview, top_by_total_uptime,
    uptime_histogram, uptime_ranking, uptime_summary, zone_type_availability,
    InterruptionFrequency, Overview, TypeRanking, TypeSummary, UptimeHistogram, ZoneTypeCount,
};
use crate::correlate::correlate;
use crate::export::{ExportCache, ExportError};
use crate::filter::Filter;
use crate::log_event;
use crate::logging::{event_names, generate_run_id, get_host_id, LogContext, Stage};
use crate::uptime::with_uptime;

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportOptions {
    pub top_n: usize,
    pub histogram_bins: usize,
    pub preview_rows: usize,
    #[serde(default)]
    pub filter: Filter,
}

impl ReportOptions {
    pub fn from_settings(settings: &ReportSettings) -> Self {
        ReportOptions {
            top_n: settings.top_n,
            histogram_bins: settings.histogram_bins,
            preview_rows: settings.preview_rows,
            filter: Filter::all(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from_settings(&ReportSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMetadata {
    pub run_id: String,
    pub host_id: String,
    pub generated_at: DateTime<Utc>,
    pub schema_version: String,
    pub fulfillment_rows: usize,
    pub interruption_rows: usize,
    pub correlated_rows: usize,
    /// Interruptions that matched no correlated instance.
    pub dropped_interruptions: usize,
    /// Correlated rows whose stop precedes their start.
    pub negative_uptime_rows: usize,
}

/// The filter-dependent part of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilteredView {
    pub overview: Overview,
    /// Leading filtered rows, for display.
    pub preview: Vec<CorrelatedInstance>,
    pub uptime_histogram: UptimeHistogram,
}

/// Every output table of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub metadata: RunMetadata,
    pub options: ReportOptions,
    pub correlated: Vec<CorrelatedInstance>,
    pub uptime_summary: Vec<TypeSummary>,
    pub top_types_by_total_uptime: Vec<TypeSummary>,
    pub zone_type_availability: Vec<ZoneTypeCount>,
    pub most_available_per_zone: Vec<ZoneTypeCount>,
    pub uptime_ranking: Vec<TypeRanking>,
    pub interruption_frequency: Vec<InterruptionFrequency>,
    pub filtered: FilteredView,
}

impl AnalysisReport {
    /// Re-derive the filtered view for another predicate pair. The
    /// correlated rows are reused as is.
    pub fn filter(&self, filter: &Filter) -> FilteredView {
        filtered_view(&self.correlated, filter, &self.options)
    }

    /// Whether no instance id appeared in both inputs.
    pub fn is_empty_join(&self) -> bool {
        self.correlated.is_empty()
    }
}

fn filtered_view(rows: &[CorrelatedInstance], filter: &Filter, options: &ReportOptions) -> FilteredView {
    let overview = overview(rows, filter);
    let preview = overview.rows.iter().take(options.preview_rows).cloned().collect();
    let uptime_histogram = uptime_histogram(&overview.rows, options.histogram_bins);
    FilteredView {
        overview,
        preview,
        uptime_histogram,
    }
}

/// Run the full pipeline over loaded inputs.
pub fn analyze(
    fulfillments: &[FulfillmentEvent],
    interruptions: &[InterruptionEvent],
    options: &ReportOptions,
    ctx: &LogContext,
) -> AnalysisReport {
    let span = tracing::info_span!("analysis_run", run_id = %ctx.run_id, host_id = %ctx.host_id);
    let _enter = span.enter();

    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "Starting analysis run",
        fulfillment_rows = fulfillments.len(),
        interruption_rows = interruptions.len()
    );

    let pairs = correlate(fulfillments, interruptions);
    log_event!(
        ctx,
        DEBUG,
        event_names::CORRELATE_FINISHED,
        Stage::Correlate,
        "Joined event streams on instance id",
        pairs = pairs.len()
    );
    if pairs.is_empty() {
        log_event!(
            ctx,
            INFO,
            event_names::CORRELATE_EMPTY,
            Stage::Correlate,
            "No instance id appears in both inputs"
        );
    }

    let correlated = with_uptime(&pairs);
    let negative_uptime_rows = correlated.iter().filter(|r| r.uptime_hours < 0.0).count();
    log_event!(
        ctx,
        DEBUG,
        event_names::DERIVE_FINISHED,
        Stage::Derive,
        "Derived uptime",
        rows = correlated.len()
    );
    if negative_uptime_rows > 0 {
        log_event!(
            ctx,
            DEBUG,
            event_names::DERIVE_NEGATIVE_UPTIME,
            Stage::Derive,
            "Interruption precedes fulfillment",
            rows = negative_uptime_rows
        );
    }

    let summary = uptime_summary(&correlated);
    let top = top_by_total_uptime(&summary, options.top_n);
    let availability = zone_type_availability(&correlated);
    let per_zone = most_available_per_zone(&availability);
    let ranking = uptime_ranking(&correlated);
    let attribution = interruption_frequency(interruptions, &correlated);
    if attribution.dropped > 0 {
        log_event!(
            ctx,
            DEBUG,
            event_names::AGGREGATE_DROPPED_INTERRUPTIONS,
            Stage::Aggregate,
            "Interruptions without a correlated instance",
            dropped = attribution.dropped
        );
    }
    log_event!(
        ctx,
        DEBUG,
        event_names::AGGREGATE_FINISHED,
        Stage::Aggregate,
        "Aggregations complete",
        instance_types = summary.len(),
        zones = per_zone.len()
    );

    let filtered = filtered_view(&correlated, &options.filter, options);
    if !options.filter.is_unrestricted() {
        log_event!(
            ctx,
            DEBUG,
            event_names::FILTER_APPLIED,
            Stage::Filter,
            "Filter applied",
            total_instances = filtered.overview.total_instances,
            filtered_instances = filtered.overview.filtered_instances
        );
    }

    let metadata = RunMetadata {
        run_id: ctx.run_id.clone(),
        host_id: ctx.host_id.clone(),
        generated_at: Utc::now(),
        schema_version: SCHEMA_VERSION.to_string(),
        fulfillment_rows: fulfillments.len(),
        interruption_rows: interruptions.len(),
        correlated_rows: correlated.len(),
        dropped_interruptions: attribution.dropped,
        negative_uptime_rows,
    };

    log_event!(
        ctx,
        INFO,
        event_names::RUN_FINISHED,
        Stage::Aggregate,
        "Analysis run finished",
        correlated_rows = correlated.len()
    );

    AnalysisReport {
        metadata,
        options: options.clone(),
        correlated,
        uptime_summary: summary,
        top_types_by_total_uptime: top,
        zone_type_availability: availability,
        most_available_per_zone: per_zone,
        uptime_ranking: ranking,
        interruption_frequency: attribution.frequencies,
        filtered,
    }
}

/// Holds the raw inputs of an analysis and the export cache.
#[derive(Debug)]
pub struct AnalysisSession {
    ctx: LogContext,
    fulfillments: Option<Vec<FulfillmentEvent>>,
    interruptions: Option<Vec<InterruptionEvent>>,
    export_cache: ExportCache,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::with_context(LogContext::new(generate_run_id(), get_host_id()))
    }

    pub fn with_context(ctx: LogContext) -> Self {
        AnalysisSession {
            ctx,
            fulfillments: None,
            interruptions: None,
            export_cache: ExportCache::new(),
        }
    }

    pub fn context(&self) -> &LogContext {
        &self.ctx
    }

    pub fn set_fulfillments(&mut self, events: Vec<FulfillmentEvent>) {
        self.fulfillments = Some(events);
    }

    pub fn set_interruptions(&mut self, events: Vec<InterruptionEvent>) {
        self.interruptions = Some(events);
    }

    /// Both inputs are present.
    pub fn is_ready(&self) -> bool {
        self.fulfillments.is_some() && self.interruptions.is_some()
    }

    /// Run the pipeline, or `None` while an input is still missing.
    pub fn run(&self, options: &ReportOptions) -> Option<AnalysisReport> {
        match (&self.fulfillments, &self.interruptions) {
            (Some(fulfillments), Some(interruptions)) => {
                Some(analyze(fulfillments, interruptions, options, &self.ctx))
            }
            _ => {
                log_event!(
                    self.ctx,
                    DEBUG,
                    event_names::RUN_SKIPPED,
                    Stage::Init,
                    "Waiting for both inputs",
                    has_fulfillments = self.fulfillments.is_some(),
                    has_interruptions = self.interruptions.is_some()
                );
                None
            }
        }
    }

    /// CSV bytes of the report's by-type summary, memoized by content.
    pub fn export_summary(&mut self, report: &AnalysisReport) -> Result<Arc<Vec<u8>>, ExportError> {
        self.export_cache.summary_csv(&report.uptime_summary)
    }

    pub fn export_cache(&self) -> &ExportCache {
        &self.export_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn ctx() -> LogContext {
        LogContext::new("run-test", "host-test")
    }

    fn fulfillment(id: &str, instance_type: &str, zone: &str, hour: u32) -> FulfillmentEvent {
        FulfillmentEvent {
            instance_id: id.into(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            instance_type: Some(instance_type.into()),
            availability_zone: Some(zone.into()),
            extra: BTreeMap::new(),
        }
    }

    fn interruption(id: &str, hour: u32, minute: u32) -> InterruptionEvent {
        InterruptionEvent {
            instance_id: id.into(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn session_waits_for_both_inputs() {
        let mut session = AnalysisSession::with_context(ctx());
        assert!(session.run(&ReportOptions::default()).is_none());
        session.set_fulfillments(vec![fulfillment("A", "m5.large", "us-east-1a", 0)]);
        assert!(!session.is_ready());
        assert!(session.run(&ReportOptions::default()).is_none());
        session.set_interruptions(vec![]);
        assert!(session.is_ready());
        let report = session.run(&ReportOptions::default()).unwrap();
        assert!(report.is_empty_join());
    }

    #[test]
    fn metadata_counts_inputs_and_drops() {
        let fs = vec![fulfillment("A", "m5.large", "us-east-1a", 0)];
        let is = vec![interruption("A", 1, 0), interruption("Q", 1, 0)];
        let report = analyze(&fs, &is, &ReportOptions::default(), &ctx());
        assert_eq!(report.metadata.fulfillment_rows, 1);
        assert_eq!(report.metadata.interruption_rows, 2);
        assert_eq!(report.metadata.correlated_rows, 1);
        assert_eq!(report.metadata.dropped_interruptions, 1);
        assert_eq!(report.metadata.run_id, "run-test");
        assert_eq!(report.metadata.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn refilter_reuses_correlated_rows() {
        let fs = vec![
            fulfillment("A", "m5.large", "us-east-1a", 0),
            fulfillment("B", "c5.large", "us-east-1b", 0),
        ];
        let is = vec![interruption("A", 1, 0), interruption("B", 2, 0)];
        let report = analyze(&fs, &is, &ReportOptions::default(), &ctx());
        assert_eq!(report.filtered.overview.filtered_instances, 2);

        let view = report.filter(&Filter::all().with_zones([Some("us-east-1b".to_string())]));
        assert_eq!(view.overview.total_instances, 2);
        assert_eq!(view.overview.filtered_instances, 1);
        assert_eq!(view.uptime_histogram.total(), 1);
        assert_eq!(report.correlated.len(), 2);
    }

    #[test]
    fn preview_and_top_n_respect_options() {
        let fs: Vec<_> = (0..8)
            .map(|i| fulfillment(&format!("i-{i}"), &format!("t{i}"), "us-east-1a", 0))
            .collect();
        let is: Vec<_> = (0..8)
            .map(|i| interruption(&format!("i-{i}"), 1 + i as u32, 0))
            .collect();
        let options = ReportOptions {
            top_n: 3,
            histogram_bins: 4,
            preview_rows: 2,
            filter: Filter::all(),
        };
        let report = analyze(&fs, &is, &options, &ctx());
        assert_eq!(report.top_types_by_total_uptime.len(), 3);
        assert_eq!(report.top_types_by_total_uptime[0].instance_type.as_deref(), Some("t7"));
        assert_eq!(report.filtered.preview.len(), 2);
        assert_eq!(report.filtered.uptime_histogram.bins, 4);
    }

    #[test]
    fn export_is_memoized_across_identical_reports() {
        let mut session = AnalysisSession::with_context(ctx());
        session.set_fulfillments(vec![fulfillment("A", "m5.large", "us-east-1a", 0)]);
        session.set_interruptions(vec![interruption("A", 2, 30)]);
        let first = session.run(&ReportOptions::default()).unwrap();
        let second = session.run(&ReportOptions::default()).unwrap();

        let a = session.export_summary(&first).unwrap();
        let b = session.export_summary(&second).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(session.export_cache().hits(), 1);
        let text = String::from_utf8(a.to_vec()).unwrap();
        assert!(text.contains("m5.large,2.5,2.5,2.5,2.5,,1"));
    }
}
