//! @ai:module:intent Question suite definitions and loading
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkQuestion, QuestionCategory, QuestionSuite, SuiteLoader

pub mod loader;
pub mod question;

pub use loader::{SuiteLoader, SuiteLoaderTrait};
pub use question::{BenchmarkQuestion, QuestionCategory, QuestionSuite};
