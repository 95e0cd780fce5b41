//! Group comparison engine
//!
//! Splits observations into process A and B, then per metric computes the
//! group means, Welch's t-test and the percent improvement of B over A.
//! Empty groups never fail the caller: their mean is reported as 0 and the
//! test as unavailable.

use serde::Serialize;

use crate::analysis::stats::{self, BoxStats, TTest};
use crate::entities::{Observation, ProcessGroup};

/// A measured quantity that can be compared between groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Processing time in minutes
    #[value(name = "time", alias = "processing-time")]
    ProcessingTime,
    /// Labor cost in currency units
    #[value(name = "cost", alias = "labor-cost")]
    LaborCost,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::ProcessingTime, Metric::LaborCost];

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Metric::ProcessingTime => "Processing Time",
            Metric::LaborCost => "Labor Cost",
        }
    }

    /// Store column the metric is read from
    pub fn column(&self) -> &'static str {
        match self {
            Metric::ProcessingTime => "processing_time_min",
            Metric::LaborCost => "labor_cost",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::ProcessingTime => "min",
            Metric::LaborCost => "€",
        }
    }

    /// Wording used when B improves on A ("faster"/"cheaper")
    pub fn improvement_word(&self) -> &'static str {
        match self {
            Metric::ProcessingTime => "faster",
            Metric::LaborCost => "cheaper",
        }
    }

    pub fn value(&self, observation: &Observation) -> f64 {
        match self {
            Metric::ProcessingTime => observation.processing_time_min,
            Metric::LaborCost => observation.labor_cost,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Collect one metric's values for one group
pub fn metric_values(table: &[Observation], group: ProcessGroup, metric: Metric) -> Vec<f64> {
    table
        .iter()
        .filter(|o| o.process_group == group)
        .map(|o| metric.value(o))
        .collect()
}

/// Per-group summary: sample count and the mean of each metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: ProcessGroup,
    pub count: usize,
    pub mean_processing_time: f64,
    pub mean_labor_cost: f64,
}

impl GroupSummary {
    pub fn of(table: &[Observation], group: ProcessGroup) -> Self {
        let times = metric_values(table, group, Metric::ProcessingTime);
        let costs = metric_values(table, group, Metric::LaborCost);
        Self {
            group,
            count: times.len(),
            mean_processing_time: stats::mean(&times).unwrap_or(0.0),
            mean_labor_cost: stats::mean(&costs).unwrap_or(0.0),
        }
    }

    pub fn mean(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ProcessingTime => self.mean_processing_time,
            Metric::LaborCost => self.mean_labor_cost,
        }
    }
}

/// Summaries for A and B, in that order
pub fn summarize(table: &[Observation]) -> [GroupSummary; 2] {
    ProcessGroup::ALL.map(|group| GroupSummary::of(table, group))
}

/// Relative reduction of B versus A in percent; 0 when `mean_a` is 0
pub fn percent_improvement(mean_a: f64, mean_b: f64) -> f64 {
    if mean_a == 0.0 {
        0.0
    } else {
        (mean_a - mean_b) / mean_a * 100.0
    }
}

/// Comparison of one metric between A and B
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: Metric,
    pub count_a: usize,
    pub count_b: usize,
    pub mean_a: f64,
    pub mean_b: f64,
    /// `None` when the test is unavailable
    pub test: Option<TTest>,
    pub percent_improvement: f64,
}

impl MetricComparison {
    pub fn compute(table: &[Observation], metric: Metric) -> Self {
        let a = metric_values(table, ProcessGroup::A, metric);
        let b = metric_values(table, ProcessGroup::B, metric);

        let mean_a = stats::mean(&a).unwrap_or(0.0);
        let mean_b = stats::mean(&b).unwrap_or(0.0);

        Self {
            metric,
            count_a: a.len(),
            count_b: b.len(),
            mean_a,
            mean_b,
            test: stats::welch_t_test(&a, &b),
            percent_improvement: percent_improvement(mean_a, mean_b),
        }
    }

    pub fn t_statistic(&self) -> Option<f64> {
        self.test.map(|t| t.t_statistic)
    }

    pub fn p_value(&self) -> Option<f64> {
        self.test.map(|t| t.p_value)
    }

    /// Whether the difference is significant at `alpha`; `None` without a test
    pub fn is_significant(&self, alpha: f64) -> Option<bool> {
        self.p_value().map(|p| p < alpha)
    }
}

/// Run the engine for each requested metric
pub fn compare(table: &[Observation], metrics: &[Metric]) -> Vec<MetricComparison> {
    metrics
        .iter()
        .map(|&metric| MetricComparison::compute(table, metric))
        .collect()
}

/// Box-plot statistics of one metric for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub group: ProcessGroup,
    /// `None` for an empty group
    pub stats: Option<BoxStats>,
}

/// Distribution of a metric across both groups
pub fn distribution(table: &[Observation], metric: Metric) -> Vec<GroupDistribution> {
    ProcessGroup::ALL
        .iter()
        .map(|&group| GroupDistribution {
            group,
            stats: BoxStats::from_values(&metric_values(table, group, metric)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProcessGroup::{A, B};

    fn example_table() -> Vec<Observation> {
        vec![
            Observation::new(A, 30.0, 20.0),
            Observation::new(A, 34.0, 18.0),
            Observation::new(B, 25.0, 14.0),
            Observation::new(B, 27.0, 16.0),
        ]
    }

    #[test]
    fn test_reference_example() {
        let results = compare(&example_table(), &Metric::ALL);
        let time = &results[0];
        let cost = &results[1];

        assert_eq!(time.metric, Metric::ProcessingTime);
        assert_eq!(time.mean_a, 32.0);
        assert_eq!(time.mean_b, 26.0);
        assert_eq!(time.percent_improvement, 18.75);
        assert_eq!((time.count_a, time.count_b), (2, 2));

        assert_eq!(cost.mean_a, 19.0);
        assert_eq!(cost.mean_b, 15.0);
        assert_eq!(cost.percent_improvement, (19.0 - 15.0) / 19.0 * 100.0);

        let test = time.test.unwrap();
        assert!((test.t_statistic - 6.0 / 5.0_f64.sqrt()).abs() < 1e-12);
        assert!((test.p_value - 0.157_963_453_949).abs() < 1e-9);
    }

    #[test]
    fn test_two_rows_one_per_group() {
        let table = vec![Observation::new(A, 40.0, 12.0), Observation::new(B, 30.0, 15.0)];
        let results = compare(&table, &Metric::ALL);

        assert_eq!(results[0].percent_improvement, (40.0 - 30.0) / 40.0 * 100.0);
        assert_eq!(results[1].percent_improvement, (12.0 - 15.0) / 12.0 * 100.0);
        // A single value per group has no sample variance
        assert_eq!(results[0].test, None);
    }

    #[test]
    fn test_zero_mean_a_gives_zero_improvement() {
        assert_eq!(percent_improvement(0.0, 26.0), 0.0);
        assert_eq!(percent_improvement(0.0, 0.0), 0.0);
        assert_eq!(percent_improvement(32.0, 26.0), 18.75);
    }

    #[test]
    fn test_empty_group_degrades() {
        let table = vec![Observation::new(B, 25.0, 14.0), Observation::new(B, 27.0, 16.0)];
        let result = MetricComparison::compute(&table, Metric::ProcessingTime);

        assert_eq!(result.mean_a, 0.0);
        assert_eq!(result.count_a, 0);
        assert_eq!(result.mean_b, 26.0);
        assert_eq!(result.test, None);
        assert_eq!(result.t_statistic(), None);
        assert_eq!(result.p_value(), None);
        assert_eq!(result.is_significant(0.05), None);
        assert_eq!(result.percent_improvement, 0.0);
    }

    #[test]
    fn test_empty_table_degrades() {
        let results = compare(&[], &Metric::ALL);
        for result in results {
            assert_eq!(result.mean_a, 0.0);
            assert_eq!(result.mean_b, 0.0);
            assert_eq!(result.test, None);
            assert_eq!(result.percent_improvement, 0.0);
        }
    }

    #[test]
    fn test_significance_flag() {
        let mut table = Vec::new();
        for i in 0..30 {
            let jitter = (i % 5) as f64;
            table.push(Observation::new(A, 32.0 + jitter, 18.0 + jitter / 2.0));
            table.push(Observation::new(B, 27.0 + jitter, 15.0 + jitter / 2.0));
        }
        let result = MetricComparison::compute(&table, Metric::ProcessingTime);
        assert_eq!(result.is_significant(0.05), Some(true));
        assert!(result.t_statistic().unwrap() > 0.0);
    }

    #[test]
    fn test_group_summaries() {
        let [a, b] = summarize(&example_table());
        assert_eq!(a.group, A);
        assert_eq!(a.count, 2);
        assert_eq!(a.mean(Metric::ProcessingTime), 32.0);
        assert_eq!(a.mean(Metric::LaborCost), 19.0);
        assert_eq!(b.count, 2);
        assert_eq!(b.mean_processing_time, 26.0);

        let [empty_a, _] = summarize(&[Observation::new(B, 1.0, 1.0)]);
        assert_eq!(empty_a.count, 0);
        assert_eq!(empty_a.mean_labor_cost, 0.0);
    }

    #[test]
    fn test_distribution_marks_empty_group() {
        let table = vec![Observation::new(A, 30.0, 20.0), Observation::new(A, 34.0, 18.0)];
        let dist = distribution(&table, Metric::ProcessingTime);
        assert_eq!(dist[0].group, A);
        assert_eq!(dist[0].stats.as_ref().unwrap().median, 32.0);
        assert_eq!(dist[1].group, B);
        assert!(dist[1].stats.is_none());
    }

    #[test]
    fn test_metric_metadata() {
        assert_eq!(Metric::ProcessingTime.column(), "processing_time_min");
        assert_eq!(Metric::LaborCost.column(), "labor_cost");
        assert_eq!(Metric::LaborCost.to_string(), "Labor Cost");
        let obs = Observation::new(A, 31.5, 17.25);
        assert_eq!(Metric::ProcessingTime.value(&obs), 31.5);
        assert_eq!(Metric::LaborCost.value(&obs), 17.25);
    }
}
