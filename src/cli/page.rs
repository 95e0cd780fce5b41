//! HTML rendering using embedded Tera templates
//!
//! Charts are drawn as inline SVG so the page has no external assets.

use chrono::Local;
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::analysis::{
    AnalysisReport, DashboardView, GroupDistribution, GroupSummary, Metric, MetricComparison,
};
use crate::cli::helpers::{
    format_optional, format_p_value, format_percent, format_significance, NOT_AVAILABLE,
};
use crate::cli::render::interpret;
use crate::entities::ProcessGroup;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    Render(String),
}

/// One metric's row in the results table
#[derive(Debug, Serialize)]
struct ComparisonRow {
    metric: String,
    unit: String,
    mean_a: String,
    mean_b: String,
    t_statistic: String,
    degrees_of_freedom: String,
    p_value: String,
    improvement: String,
    improvement_word: String,
    significant: String,
    interpretation: String,
}

impl ComparisonRow {
    fn new(c: &MetricComparison, alpha: f64) -> Self {
        Self {
            metric: c.metric.label().to_string(),
            unit: c.metric.unit().to_string(),
            mean_a: format!("{:.2}", c.mean_a),
            mean_b: format!("{:.2}", c.mean_b),
            t_statistic: format_optional(c.t_statistic(), 3),
            degrees_of_freedom: format_optional(c.test.map(|t| t.degrees_of_freedom), 1),
            p_value: format_p_value(c.p_value()),
            improvement: format_percent(c.percent_improvement),
            improvement_word: c.metric.improvement_word().to_string(),
            significant: format_significance(c.is_significant(alpha)).to_string(),
            interpretation: interpret(c, alpha),
        }
    }
}

#[derive(Debug, Serialize)]
struct Kpi {
    label: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct Chart {
    title: String,
    svg: String,
    caption: String,
}

#[derive(Debug, Serialize)]
struct PageContext {
    title: String,
    generated: String,
    row_count: usize,
    alpha: f64,
    groups: String,
    metric: String,
    kpis: Vec<Kpi>,
    comparisons: Vec<ComparisonRow>,
    charts: Vec<Chart>,
}

/// Page renderer backed by the embedded templates
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut sources = Vec::new();
        for file in EmbeddedTemplates::iter() {
            let name = file.to_string();
            if let Some(content) = EmbeddedTemplates::get(&name) {
                let text = String::from_utf8(content.data.into_owned())
                    .map_err(|e| RenderError::Render(e.to_string()))?;
                sources.push((name, text));
            }
        }

        let mut tera = Tera::default();
        // Added together so `extends` can resolve the base template
        tera.add_raw_templates(sources)
            .map_err(|e| RenderError::Render(e.to_string()))?;
        Ok(Self { tera })
    }

    fn render(&self, template: &str, ctx: &PageContext) -> Result<String, RenderError> {
        if !self.tera.get_template_names().any(|n| n == template) {
            return Err(RenderError::NotFound(template.to_string()));
        }
        let context =
            tera::Context::from_serialize(ctx).map_err(|e| RenderError::Render(e.to_string()))?;
        self.tera
            .render(template, &context)
            .map_err(|e| RenderError::Render(e.to_string()))
    }

    /// Static report covering every metric in the report
    pub fn analysis_page(&self, report: &AnalysisReport, alpha: f64) -> Result<String, RenderError> {
        let metrics: Vec<Metric> = report.comparisons.iter().map(|c| c.metric).collect();

        let mut charts = vec![Chart {
            title: "A vs B: Average Processing Time & Labor Cost".to_string(),
            svg: bar_chart_svg(&report.summaries, &metrics),
            caption: "Average of each metric per process.".to_string(),
        }];
        for dist in &report.distributions {
            charts.push(Chart {
                title: format!("{} Distribution: A vs B", dist.metric.label()),
                svg: box_plot_svg(dist.metric, &dist.groups),
                caption: "Spread, variability and outliers per process.".to_string(),
            });
        }

        let ctx = PageContext {
            title: "Warehouse Process A/B Testing Analysis".to_string(),
            generated: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            row_count: report.row_count,
            alpha,
            groups: "A, B".to_string(),
            metric: metrics
                .iter()
                .map(|m| m.label())
                .collect::<Vec<_>>()
                .join(", "),
            kpis: kpis(&report.summaries),
            comparisons: report
                .comparisons
                .iter()
                .map(|c| ComparisonRow::new(c, alpha))
                .collect(),
            charts,
        };
        self.render("report.html.tera", &ctx)
    }

    /// Dashboard page for one selection
    pub fn dashboard_page(&self, view: &DashboardView, alpha: f64) -> Result<String, RenderError> {
        let report = &view.report;
        let metric = view.selection.metric;

        let mut charts = vec![Chart {
            title: format!("Bar Chart: {} Comparison", metric.label()),
            svg: bar_chart_svg(&report.summaries, &[metric]),
            caption: format!(
                "Average {} for Process A vs Process B.",
                metric.label()
            ),
        }];
        if let Some(dist) = report.distribution(metric) {
            charts.push(Chart {
                title: format!("Distribution of {}", metric.label()),
                svg: box_plot_svg(metric, &dist.groups),
                caption: format!(
                    "Spread, variability and outliers in {}.",
                    metric.label()
                ),
            });
        }

        let ctx = PageContext {
            title: "Warehouse Process A/B Testing Dashboard".to_string(),
            generated: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            row_count: report.row_count,
            alpha,
            groups: view.selection.groups_label(),
            metric: metric.label().to_string(),
            kpis: kpis(&report.summaries),
            comparisons: report
                .comparisons
                .iter()
                .map(|c| ComparisonRow::new(c, alpha))
                .collect(),
            charts,
        };
        self.render("dashboard.html.tera", &ctx)
    }
}

fn kpis(summaries: &[GroupSummary]) -> Vec<Kpi> {
    let mut out = Vec::new();
    for summary in summaries {
        for metric in Metric::ALL {
            out.push(Kpi {
                label: format!("Avg {} {} ({})", metric.label(), summary.group, metric.unit()),
                value: format!("{:.2}", summary.mean(metric)),
            });
        }
    }
    out
}

const SVG_WIDTH: f64 = 640.0;
const SVG_HEIGHT: f64 = 320.0;
const MARGIN: f64 = 48.0;

fn group_color(group: ProcessGroup) -> &'static str {
    match group {
        ProcessGroup::A => "#1f77b4",
        ProcessGroup::B => "#ff7f0e",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Grouped bar chart of means: metrics on the x axis, one bar per group
pub fn bar_chart_svg(summaries: &[GroupSummary], metrics: &[Metric]) -> String {
    let plot_w = SVG_WIDTH - 2.0 * MARGIN;
    let plot_h = SVG_HEIGHT - 2.0 * MARGIN;
    let max = summaries
        .iter()
        .flat_map(|s| metrics.iter().map(move |&m| s.mean(m)))
        .fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { plot_h / (max * 1.1) } else { 0.0 };

    let slot = plot_w / metrics.len().max(1) as f64;
    let bar_w = slot / (summaries.len() as f64 + 1.0);

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" class="chart bar-chart">"##,
        w = SVG_WIDTH,
        h = SVG_HEIGHT
    );
    let baseline = SVG_HEIGHT - MARGIN;
    svg.push_str(&format!(
        r##"<line x1="{m}" y1="{b}" x2="{x2}" y2="{b}" stroke="#333"/>"##,
        m = MARGIN,
        b = baseline,
        x2 = SVG_WIDTH - MARGIN
    ));

    for (i, metric) in metrics.iter().enumerate() {
        let slot_x = MARGIN + i as f64 * slot;
        for (j, summary) in summaries.iter().enumerate() {
            let value = summary.mean(*metric);
            let h = value * scale;
            let x = slot_x + bar_w * (j as f64 + 0.5);
            let label = if summary.count == 0 {
                NOT_AVAILABLE.to_string()
            } else {
                format!("{:.2}", value)
            };
            svg.push_str(&format!(
                r##"<rect x="{x:.1}" y="{y:.1}" width="{bw:.1}" height="{h:.1}" fill="{c}"><title>{g}: {l}</title></rect>"##,
                x = x,
                y = baseline - h,
                bw = bar_w * 0.9,
                h = h,
                c = group_color(summary.group),
                g = summary.group,
                l = label
            ));
            svg.push_str(&format!(
                r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="12">{l}</text>"##,
                x = x + bar_w * 0.45,
                y = baseline - h - 4.0,
                l = label
            ));
        }
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="13">{t}</text>"##,
            x = slot_x + slot / 2.0,
            y = baseline + 20.0,
            t = escape(metric.label())
        ));
    }

    for (j, summary) in summaries.iter().enumerate() {
        svg.push_str(&format!(
            r##"<rect x="{x:.1}" y="12" width="12" height="12" fill="{c}"/><text x="{tx:.1}" y="22" font-size="12">Process {g}</text>"##,
            x = SVG_WIDTH - MARGIN - 180.0 + j as f64 * 90.0,
            tx = SVG_WIDTH - MARGIN - 164.0 + j as f64 * 90.0,
            c = group_color(summary.group),
            g = summary.group
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Vertical box plot of one metric, one box per group
pub fn box_plot_svg(metric: Metric, groups: &[GroupDistribution]) -> String {
    let plot_h = SVG_HEIGHT - 2.0 * MARGIN;
    let slot = (SVG_WIDTH - 2.0 * MARGIN) / groups.len().max(1) as f64;

    let present: Vec<_> = groups.iter().filter_map(|g| g.stats.as_ref()).collect();
    let lo = present.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = present.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);
    let span = if present.is_empty() || hi <= lo { 1.0 } else { hi - lo };
    let lo = if present.is_empty() { 0.0 } else { lo };
    let y = |v: f64| SVG_HEIGHT - MARGIN - (v - lo) / span * plot_h;

    let mut svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" class="chart box-plot">"##,
        w = SVG_WIDTH,
        h = SVG_HEIGHT
    );
    svg.push_str(&format!(
        r##"<text x="12" y="{y:.1}" font-size="12" transform="rotate(-90 12 {y:.1})" text-anchor="middle">{t} ({u})</text>"##,
        y = SVG_HEIGHT / 2.0,
        t = escape(metric.label()),
        u = escape(metric.unit())
    ));

    for (i, group) in groups.iter().enumerate() {
        let cx = MARGIN + slot * (i as f64 + 0.5);
        svg.push_str(&format!(
            r##"<text x="{cx:.1}" y="{y:.1}" text-anchor="middle" font-size="13">Process {g}</text>"##,
            cx = cx,
            y = SVG_HEIGHT - MARGIN + 20.0,
            g = group.group
        ));

        let Some(stats) = &group.stats else {
            svg.push_str(&format!(
                r##"<text x="{cx:.1}" y="{y:.1}" text-anchor="middle" font-size="13">{na}</text>"##,
                cx = cx,
                y = SVG_HEIGHT / 2.0,
                na = NOT_AVAILABLE
            ));
            continue;
        };

        let half = slot * 0.2;
        let color = group_color(group.group);
        svg.push_str(&format!(
            r##"<line x1="{cx:.1}" y1="{a:.1}" x2="{cx:.1}" y2="{b:.1}" stroke="#333"/>"##,
            cx = cx,
            a = y(stats.whisker_low),
            b = y(stats.q1)
        ));
        svg.push_str(&format!(
            r##"<line x1="{cx:.1}" y1="{a:.1}" x2="{cx:.1}" y2="{b:.1}" stroke="#333"/>"##,
            cx = cx,
            a = y(stats.q3),
            b = y(stats.whisker_high)
        ));
        for v in [stats.whisker_low, stats.whisker_high] {
            svg.push_str(&format!(
                r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#333"/>"##,
                x1 = cx - half / 2.0,
                x2 = cx + half / 2.0,
                y = y(v)
            ));
        }
        svg.push_str(&format!(
            r##"<rect x="{x:.1}" y="{top:.1}" width="{w:.1}" height="{h:.1}" fill="{c}" fill-opacity="0.6" stroke="#333"><title>Q1 {q1:.2} / median {m:.2} / Q3 {q3:.2}</title></rect>"##,
            x = cx - half,
            top = y(stats.q3),
            w = half * 2.0,
            h = (y(stats.q1) - y(stats.q3)).max(1.0),
            c = color,
            q1 = stats.q1,
            m = stats.median,
            q3 = stats.q3
        ));
        svg.push_str(&format!(
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#000" stroke-width="2"/>"##,
            x1 = cx - half,
            x2 = cx + half,
            y = y(stats.median)
        ));
        for &outlier in &stats.outliers {
            svg.push_str(&format!(
                r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="3" fill="none" stroke="{c}"/>"##,
                cx = cx,
                cy = y(outlier),
                c = color
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}
