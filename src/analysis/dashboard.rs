//! Dashboard state and the pure computation behind each render
//!
//! A [`Selection`] is the whole interactive state. Every change produces a
//! fresh [`DashboardView`] from the full table via [`compute`]; nothing is
//! carried over between selections.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::analysis::compare::{Metric, MetricComparison};
use crate::analysis::report::AnalysisReport;
use crate::entities::{Observation, ProcessGroup};

/// Filter and metric chosen by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Groups to keep; may be empty
    pub groups: BTreeSet<ProcessGroup>,
    /// Metric shown in the charts
    pub metric: Metric,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            groups: ProcessGroup::ALL.into_iter().collect(),
            metric: Metric::ProcessingTime,
        }
    }
}

impl Selection {
    pub fn new(groups: impl IntoIterator<Item = ProcessGroup>, metric: Metric) -> Self {
        Self {
            groups: groups.into_iter().collect(),
            metric,
        }
    }

    pub fn includes(&self, group: ProcessGroup) -> bool {
        self.groups.contains(&group)
    }

    /// Comma-separated group labels, `none` when empty
    pub fn groups_label(&self) -> String {
        if self.groups.is_empty() {
            "none".to_string()
        } else {
            self.groups
                .iter()
                .map(|g| g.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Everything a dashboard render needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    /// Analysis of the filtered rows, both metrics
    pub report: AnalysisReport,
}

impl DashboardView {
    /// Comparison for the metric currently selected
    pub fn focus(&self) -> Option<&MetricComparison> {
        self.report.comparison(self.selection.metric)
    }
}

/// Filter the table by the selection and analyze what remains
pub fn compute(table: &[Observation], selection: &Selection) -> DashboardView {
    let filtered: Vec<Observation> = table
        .iter()
        .filter(|o| selection.includes(o.process_group))
        .copied()
        .collect();

    DashboardView {
        selection: selection.clone(),
        report: AnalysisReport::build(&filtered, &Metric::ALL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProcessGroup::{A, B};

    fn table() -> Vec<Observation> {
        vec![
            Observation::new(A, 30.0, 20.0),
            Observation::new(A, 34.0, 18.0),
            Observation::new(B, 25.0, 14.0),
            Observation::new(B, 27.0, 16.0),
        ]
    }

    #[test]
    fn test_default_selection_keeps_everything() {
        let view = compute(&table(), &Selection::default());
        assert_eq!(view.report.row_count, 4);

        let focus = view.focus().unwrap();
        assert_eq!(focus.metric, Metric::ProcessingTime);
        assert_eq!(focus.mean_a, 32.0);
        assert_eq!(focus.mean_b, 26.0);
        assert_eq!(focus.percent_improvement, 18.75);
        assert!(focus.test.is_some());
    }

    #[test]
    fn test_metric_selection_changes_focus() {
        let view = compute(&table(), &Selection::new([A, B], Metric::LaborCost));
        let focus = view.focus().unwrap();
        assert_eq!(focus.metric, Metric::LaborCost);
        assert_eq!(focus.mean_a, 19.0);
    }

    #[test]
    fn test_single_group_filter_degrades() {
        let view = compute(&table(), &Selection::new([B], Metric::ProcessingTime));
        assert_eq!(view.report.row_count, 2);

        let focus = view.focus().unwrap();
        assert_eq!(focus.mean_a, 0.0);
        assert_eq!(focus.mean_b, 26.0);
        assert_eq!(focus.test, None);
        assert_eq!(focus.percent_improvement, 0.0);
    }

    #[test]
    fn test_empty_filter_degrades() {
        let selection = Selection {
            groups: BTreeSet::new(),
            metric: Metric::LaborCost,
        };
        assert_eq!(selection.groups_label(), "none");

        let view = compute(&table(), &selection);
        assert_eq!(view.report.row_count, 0);
        for comparison in &view.report.comparisons {
            assert_eq!(comparison.mean_a, 0.0);
            assert_eq!(comparison.mean_b, 0.0);
            assert!(comparison.test.is_none());
        }
    }

    #[test]
    fn test_compute_is_pure() {
        let table = table();
        let selection = Selection::new([A], Metric::ProcessingTime);
        let first = compute(&table, &selection);
        let _other = compute(&table, &Selection::default());
        let again = compute(&table, &selection);
        assert_eq!(first, again);
    }
}
