//! Rendering of analysis reports for stdout.
//!
//! JSON is the full report. Markdown prints the tables a dashboard would
//! show. Summary is one status line.

use sa_common::{Category, OutputFormat};
use std::fmt::Write;

use crate::pipeline::AnalysisReport;

const MISSING_VALUE: &str = "n/a";
const MISSING_CATEGORY: &str = "(missing)";

/// Render `report` in the requested format.
pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

fn category(value: &Category) -> &str {
    value.as_deref().unwrap_or(MISSING_CATEGORY)
}

fn hours(value: f64) -> String {
    format!("{:.2}", value)
}

fn optional_hours(value: Option<f64>) -> String {
    value.map(hours).unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// One-line status, e.g. `run-… 3 correlated (2 instances), 2 types, 1 dropped interruptions`.
pub fn render_summary(report: &AnalysisReport) -> String {
    let meta = &report.metadata;
    let leader = report
        .uptime_summary
        .first()
        .map(|s| format!(", top type {} ({} h)", category(&s.instance_type), hours(s.total_uptime_hours)))
        .unwrap_or_default();
    format!(
        "{}: {} correlated rows ({} instances), {} instance types, {} dropped interruptions{}\n",
        meta.run_id,
        meta.correlated_rows,
        report.filtered.overview.total_instances,
        report.uptime_summary.len(),
        meta.dropped_interruptions,
        leader
    )
}

/// Markdown tables for every report section.
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;
    let overview = &report.filtered.overview;

    let _ = writeln!(out, "# Spot Instance Analysis\n");
    let _ = writeln!(
        out,
        "Run `{}` at {} (schema {})\n",
        meta.run_id,
        meta.generated_at.to_rfc3339(),
        meta.schema_version
    );
    let _ = writeln!(
        out,
        "- Fulfillment rows: {}\n- Interruption rows: {}\n- Correlated rows: {}\n- Dropped interruptions: {}\n- Instances: {} total, {} after filter\n",
        meta.fulfillment_rows,
        meta.interruption_rows,
        meta.correlated_rows,
        meta.dropped_interruptions,
        overview.total_instances,
        overview.filtered_instances
    );

    if report.is_empty_join() {
        let _ = writeln!(out, "No instance appears in both inputs; every table is empty.");
        return out;
    }

    let _ = writeln!(out, "## Uptime by Instance Type\n");
    let _ = writeln!(out, "| Instance Type | Total (h) | Mean (h) | Median (h) | Mode (h) | Std Dev (h) | Instances |");
    let _ = writeln!(out, "|---------------|-----------|----------|------------|----------|-------------|-----------|");
    for s in &report.uptime_summary {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            category(&s.instance_type),
            hours(s.total_uptime_hours),
            optional_hours(s.mean_uptime_hours),
            optional_hours(s.median_uptime_hours),
            optional_hours(s.mode_uptime_hours),
            optional_hours(s.std_dev_uptime_hours),
            s.instance_count
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Most Available Instance Type per Zone\n");
    let _ = writeln!(out, "| Availability Zone | Instance Type | Count |");
    let _ = writeln!(out, "|-------------------|---------------|-------|");
    for z in &report.most_available_per_zone {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            category(&z.availability_zone),
            category(&z.instance_type),
            z.count
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Ranking by Mean Uptime\n");
    let _ = writeln!(out, "| Instance Type | Mean (h) | Std Dev (h) | Instances |");
    let _ = writeln!(out, "|---------------|----------|-------------|-----------|");
    for r in &report.uptime_ranking {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            category(&r.instance_type),
            optional_hours(r.mean_uptime_hours),
            optional_hours(r.std_dev_uptime_hours),
            r.instance_count
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Interruption Frequency\n");
    let _ = writeln!(out, "| Instance Type | Interruptions |");
    let _ = writeln!(out, "|---------------|---------------|");
    for f in &report.interruption_frequency {
        let _ = writeln!(out, "| {} | {} |", category(&f.instance_type), f.interruption_count);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Top {} Types by Total Uptime\n", report.options.top_n);
    for (rank, s) in report.top_types_by_total_uptime.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({} h)",
            rank + 1,
            category(&s.instance_type),
            hours(s.total_uptime_hours)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Filtered Preview\n");
    let _ = writeln!(out, "| Instance ID | Instance Type | Availability Zone | Start | Stop | Uptime (h) |");
    let _ = writeln!(out, "|-------------|---------------|-------------------|-------|------|------------|");
    for row in &report.filtered.preview {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            row.instance_id,
            category(&row.instance_type),
            category(&row.availability_zone),
            row.start_time.to_rfc3339(),
            row.stop_time.to_rfc3339(),
            hours(row.uptime_hours)
        );
    }

    out
}
