//! Analysis module - statistics, the group comparison engine and dashboard state

pub mod compare;
pub mod dashboard;
pub mod report;
pub mod stats;

pub use compare::{
    compare, percent_improvement, summarize, GroupDistribution, GroupSummary, Metric,
    MetricComparison,
};
pub use dashboard::{compute, DashboardView, Selection};
pub use report::{AnalysisReport, MetricDistribution};
pub use stats::{welch_t_test, BoxStats, TTest};
