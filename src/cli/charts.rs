//! Text charts for terminal output
//!
//! Two chart types: a grouped horizontal bar chart of means and a box plot
//! of the per-order distribution. Both render empty groups as "N/A".

use console::style;

use crate::analysis::{GroupDistribution, GroupSummary, Metric};
use crate::cli::helpers::NOT_AVAILABLE;
use crate::entities::ProcessGroup;

/// Default plot width in characters
pub const CHART_WIDTH: usize = 48;

fn paint(group: ProcessGroup, text: String) -> String {
    match group {
        ProcessGroup::A => style(text).cyan().to_string(),
        ProcessGroup::B => style(text).magenta().to_string(),
    }
}

/// Grouped bar chart: one block per metric, one bar per group
pub fn bar_chart(summaries: &[GroupSummary], metrics: &[Metric], width: usize) -> String {
    let mut out = String::new();

    for &metric in metrics {
        let max = summaries
            .iter()
            .map(|s| s.mean(metric))
            .fold(0.0_f64, f64::max);

        out.push_str(&format!("{} ({})\n", metric.label(), metric.unit()));
        for summary in summaries {
            let value = summary.mean(metric);
            let len = if max > 0.0 {
                ((value / max) * width as f64).round() as usize
            } else {
                0
            };
            let bar = paint(summary.group, "█".repeat(len));
            let label = if summary.count == 0 {
                NOT_AVAILABLE.to_string()
            } else {
                format!("{:.2}", value)
            };
            out.push_str(&format!(
                "  {} │{}{} {}\n",
                summary.group,
                bar,
                " ".repeat(width - len.min(width)),
                label
            ));
        }
        out.push('\n');
    }

    out
}

/// Box plot of one metric, one row per group on a shared axis
pub fn box_plot(metric: Metric, groups: &[GroupDistribution], width: usize) -> String {
    let width = width.max(10);
    let mut out = format!("{} distribution ({})\n", metric.label(), metric.unit());

    let present: Vec<_> = groups.iter().filter_map(|g| g.stats.as_ref()).collect();
    if present.is_empty() {
        for group in groups {
            out.push_str(&format!("  {} {} (no orders)\n", group.group, NOT_AVAILABLE));
        }
        return out;
    }

    let lo = present.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = present.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    let column = |v: f64| -> usize {
        if span <= 0.0 {
            0
        } else {
            (((v - lo) / span) * (width - 1) as f64).round() as usize
        }
    };

    for group in groups {
        let Some(stats) = &group.stats else {
            out.push_str(&format!("  {} {} (no orders)\n", group.group, NOT_AVAILABLE));
            continue;
        };

        let mut cells = vec![' '; width];
        let (wl, q1, med, q3, wh) = (
            column(stats.whisker_low),
            column(stats.q1),
            column(stats.median),
            column(stats.q3),
            column(stats.whisker_high),
        );
        for cell in cells.iter_mut().take(q1).skip(wl) {
            *cell = '─';
        }
        for cell in cells.iter_mut().take(wh + 1).skip(q3) {
            *cell = '─';
        }
        for cell in cells.iter_mut().take(q3 + 1).skip(q1) {
            *cell = '▒';
        }
        cells[wl] = '├';
        cells[wh] = '┤';
        cells[med] = '┃';
        for &outlier in &stats.outliers {
            cells[column(outlier)] = '•';
        }

        let line: String = cells.into_iter().collect();
        out.push_str(&format!(
            "  {} │{}│ median {:.2}, n={}\n",
            group.group,
            paint(group.group, line),
            stats.median,
            stats.count
        ));
    }

    out.push_str(&format!(
        "    {:<w$}{:>8.2}\n",
        format!("{:.2}", lo),
        hi,
        w = width.saturating_sub(6)
    ));
    out
}
