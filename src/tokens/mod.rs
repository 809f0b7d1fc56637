//! @ai:module:intent Token estimation, model limits and prompt optimization
//! @ai:module:layer domain
//! @ai:module:public_api estimate, estimate_system_prompt, estimate_with_query, analyze_for_model, optimize_profile

pub mod estimator;
pub mod limits;
pub mod optimizer;

pub use estimator::{
    analyze_for_model, estimate, estimate_system_prompt, estimate_with_query, ModelAnalysis,
    PromptStatus, SectionTokens, TokenBreakdown,
};
pub use limits::{known_models, limits_for, ModelLimits};
pub use optimizer::{optimize_profile, OptimizationReport, OptimizationSuggestion};
