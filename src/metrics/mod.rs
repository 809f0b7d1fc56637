//! @ai:module:intent Result/score types and their aggregation
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkResult, BenchmarkScore, BenchmarkReport, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{pair_results, MetricsAggregator, MetricsAggregatorTrait, ResultPair};
pub use types::{
    AxisAverages, BenchmarkReport, BenchmarkResult, BenchmarkScore, DetailedScore, GroupStats,
    ReportSummary,
};
