//! @ai:module:intent PVS personal-context format and benchmark harness library
//! @ai:module:layer application
//! @ai:module:public_api config, error, evaluator, metrics, profile, report, runner, suite, tokens

pub mod config;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod profile;
pub mod report;
pub mod runner;
pub mod suite;
pub mod tokens;

pub use config::BenchmarkConfig;
pub use error::{Error, Result};
pub use evaluator::{Judge, MockJudge, ResponseEvaluator};
pub use metrics::{BenchmarkReport, BenchmarkResult, BenchmarkScore, DetailedScore, MetricsAggregator};
pub use profile::{build_system_prompt, Profile, ProfileLoader};
pub use report::ReportGenerator;
pub use runner::{create_adapter, Adapter, BenchmarkRunner, MockAdapter, Provider, ProviderAdapter};
pub use suite::{BenchmarkQuestion, QuestionSuite, SuiteLoader};
pub use tokens::{analyze_for_model, estimate, optimize_profile};
