//! Terminal rendering of analysis reports and dashboard views

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::analysis::{AnalysisReport, DashboardView, Metric, MetricComparison};
use crate::cli::charts::{bar_chart, box_plot, CHART_WIDTH};
use crate::cli::helpers::{
    format_optional, format_p_value, format_percent, format_significance, NOT_AVAILABLE,
};
use crate::entities::Observation;

/// First `rows` observations as a table
pub fn preview_table(table: &[Observation], rows: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "",
        "process_group",
        Metric::ProcessingTime.column(),
        Metric::LaborCost.column(),
    ]);
    for (i, obs) in table.iter().take(rows).enumerate() {
        builder.push_record([
            i.to_string(),
            obs.process_group.to_string(),
            format!("{:.6}", obs.processing_time_min),
            format!("{:.6}", obs.labor_cost),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Per-group counts and means
pub fn summary_table(report: &AnalysisReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Process", "Orders", "Avg Processing Time (min)", "Avg Labor Cost (€)"]);
    for summary in &report.summaries {
        let has_rows = summary.count > 0;
        builder.push_record([
            summary.group.to_string(),
            summary.count.to_string(),
            format_optional(has_rows.then_some(summary.mean_processing_time), 2),
            format_optional(has_rows.then_some(summary.mean_labor_cost), 2),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Welch test results and improvement per metric
pub fn significance_table(report: &AnalysisReport, alpha: f64) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Metric",
        "Mean A",
        "Mean B",
        "t",
        "df",
        "p-value",
        "Improvement (B vs A)",
        "Significant",
    ]);
    for c in &report.comparisons {
        builder.push_record([
            c.metric.label().to_string(),
            format!("{:.2}", c.mean_a),
            format!("{:.2}", c.mean_b),
            format_optional(c.t_statistic(), 3),
            format_optional(c.test.map(|t| t.degrees_of_freedom), 1),
            format_p_value(c.p_value()),
            format_percent(c.percent_improvement),
            format_significance(c.is_significant(alpha)).to_string(),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// One-sentence reading of a comparison
pub fn interpret(comparison: &MetricComparison, alpha: f64) -> String {
    let metric = comparison.metric;
    let direction = if comparison.percent_improvement >= 0.0 {
        format!(
            "Process B is {} {} than Process A",
            format_percent(comparison.percent_improvement),
            metric.improvement_word()
        )
    } else {
        format!(
            "Process B is {} worse than Process A",
            format_percent(-comparison.percent_improvement)
        )
    };

    let verdict = match comparison.is_significant(alpha) {
        Some(true) => format!(
            "statistically significant (p = {} < {})",
            format_p_value(comparison.p_value()),
            alpha
        ),
        Some(false) => format!(
            "not statistically significant (p = {} >= {})",
            format_p_value(comparison.p_value()),
            alpha
        ),
        None => format!("significance {} (a group has too few orders)", NOT_AVAILABLE),
    };

    format!("{}: {}; {}.", metric.label(), direction, verdict)
}

/// Full static analysis output
pub fn analysis_text(
    table: &[Observation],
    report: &AnalysisReport,
    alpha: f64,
    preview_rows: usize,
    charts: bool,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} Data loaded successfully! ({} orders)\n\n",
        style("✓").green(),
        report.row_count
    ));
    if preview_rows > 0 {
        out.push_str(&preview_table(table, preview_rows));
        out.push_str("\n\n");
    }

    out.push_str(&format!("{}\n\n", style("Average Metrics").bold()));
    out.push_str(&summary_table(report));
    out.push_str("\n\n");

    out.push_str(&format!("{}\n\n", style("Welch's t-test (unequal variances)").bold()));
    out.push_str(&significance_table(report, alpha));
    out.push_str("\n\n");

    out.push_str(&format!("{}\n", style("Percentage Improvement").bold()));
    for comparison in &report.comparisons {
        out.push_str(&format!(
            "  {} Improvement: {}\n",
            comparison.metric.label(),
            format_percent(comparison.percent_improvement)
        ));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", style("Interpretation").bold()));
    for comparison in &report.comparisons {
        out.push_str(&format!("  - {}\n", interpret(comparison, alpha)));
    }
    out.push_str(&format!(
        "  p-value < {} means the difference is unlikely to be due to random chance.\n",
        alpha
    ));

    if charts {
        let metrics: Vec<Metric> = report.comparisons.iter().map(|c| c.metric).collect();
        out.push('\n');
        out.push_str(&format!(
            "{}\n\n",
            style("A vs B: Average Processing Time & Labor Cost").bold()
        ));
        out.push_str(&bar_chart(&report.summaries, &metrics, CHART_WIDTH));
        for dist in &report.distributions {
            out.push_str(&box_plot(dist.metric, &dist.groups, CHART_WIDTH));
            out.push('\n');
        }
    }

    out
}

/// One dashboard page for the current selection
pub fn dashboard_text(view: &DashboardView, alpha: f64) -> String {
    let report = &view.report;
    let metric = view.selection.metric;
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n",
        style("Warehouse Process A/B Testing Dashboard").bold().underlined()
    ));
    out.push_str(&format!(
        "Groups: {}   Metric: {}   Orders: {}\n\n",
        view.selection.groups_label(),
        metric.label(),
        report.row_count
    ));

    out.push_str(&format!("{}\n", style("Key Performance Indicators").bold()));
    for summary in &report.summaries {
        out.push_str(&format!(
            "  Avg Processing Time {} (min): {:>8.2}    Avg Labor Cost {} (€): {:>8.2}\n",
            summary.group,
            summary.mean_processing_time,
            summary.group,
            summary.mean_labor_cost
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "{}\n",
        style("Percentage Improvement of Process B vs A").bold()
    ));
    for comparison in &report.comparisons {
        out.push_str(&format!(
            "  {}: Process B is {} {} than Process A\n",
            comparison.metric.label(),
            format_percent(comparison.percent_improvement),
            comparison.metric.improvement_word()
        ));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", style("Statistical Significance (p-values)").bold()));
    for comparison in &report.comparisons {
        out.push_str(&format!(
            "  {} p-value: {}\n",
            comparison.metric.label(),
            format_p_value(comparison.p_value())
        ));
    }
    out.push_str(&format!(
        "  A p-value < {} indicates a statistically significant difference.\n\n",
        alpha
    ));

    out.push_str(&format!("{}\n\n", style("Visual Insights").bold()));
    out.push_str(&bar_chart(&report.summaries, &[metric], CHART_WIDTH));
    if let Some(dist) = report.distribution(metric) {
        out.push_str(&box_plot(metric, &dist.groups, CHART_WIDTH));
    }
    out.push('\n');

    if let Some(focus) = view.focus() {
        out.push_str(&format!("{}\n", style("Insight").bold()));
        out.push_str(&format!("  {}\n", interpret(focus, alpha)));
    }

    out
}
