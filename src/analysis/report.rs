//! Full analysis of an observation table

use serde::Serialize;

use crate::analysis::compare::{
    compare, distribution, summarize, GroupDistribution, GroupSummary, Metric, MetricComparison,
};
use crate::entities::Observation;

/// Distribution of one metric, per group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDistribution {
    pub metric: Metric,
    pub groups: Vec<GroupDistribution>,
}

/// Summaries, tests and distributions for a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub row_count: usize,
    pub summaries: [GroupSummary; 2],
    pub comparisons: Vec<MetricComparison>,
    pub distributions: Vec<MetricDistribution>,
}

impl AnalysisReport {
    pub fn build(table: &[Observation], metrics: &[Metric]) -> Self {
        Self {
            row_count: table.len(),
            summaries: summarize(table),
            comparisons: compare(table, metrics),
            distributions: metrics
                .iter()
                .map(|&metric| MetricDistribution {
                    metric,
                    groups: distribution(table, metric),
                })
                .collect(),
        }
    }

    pub fn comparison(&self, metric: Metric) -> Option<&MetricComparison> {
        self.comparisons.iter().find(|c| c.metric == metric)
    }

    pub fn distribution(&self, metric: Metric) -> Option<&MetricDistribution> {
        self.distributions.iter().find(|d| d.metric == metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProcessGroup::{A, B};

    #[test]
    fn test_build_covers_requested_metrics() {
        let table = vec![
            Observation::new(A, 30.0, 20.0),
            Observation::new(A, 34.0, 18.0),
            Observation::new(B, 25.0, 14.0),
            Observation::new(B, 27.0, 16.0),
        ];

        let report = AnalysisReport::build(&table, &[Metric::LaborCost]);
        assert_eq!(report.row_count, 4);
        assert_eq!(report.comparisons.len(), 1);
        assert!(report.comparison(Metric::LaborCost).is_some());
        assert!(report.comparison(Metric::ProcessingTime).is_none());

        let dist = report.distribution(Metric::LaborCost).unwrap();
        assert_eq!(dist.groups.len(), 2);
        assert_eq!(dist.groups[1].stats.as_ref().unwrap().count, 2);
    }

    #[test]
    fn test_report_serializes_unavailable_test_as_null() {
        let table = vec![Observation::new(B, 25.0, 14.0)];
        let report = AnalysisReport::build(&table, &Metric::ALL);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["comparisons"][0]["metric"], "processing_time");
        assert!(json["comparisons"][0]["test"].is_null());
        assert_eq!(json["summaries"][0]["count"], 0);
        assert!(json["distributions"][0]["groups"][0]["stats"].is_null());
    }
}
