//! @ai:module:intent Result, score and report types for PVS benchmark runs
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkResult, DetailedScore, BenchmarkScore, BenchmarkReport, ReportSummary, GroupStats, AxisAverages
//! @ai:module:stateless true

use crate::suite::QuestionCategory;
use crate::tokens::estimate;
use serde::{Deserialize, Serialize};

pub const FALLBACK_AXIS_SCORE: f64 = 2.5;
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// @ai:intent Outcome of one query: a question asked of one model, with or without the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub question_id: String,
    pub provider: String,
    pub model: String,
    /// Whether the profile was injected as system text
    pub with_pvs: bool,
    pub response: String,
    pub response_length: usize,
    pub response_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_input_tokens: Option<u32>,
    pub response_time_ms: u64,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// @ai:intent Record a successful response, deriving length and token metrics
    /// @ai:effects pure
    pub fn success(
        question_id: &str,
        provider: &str,
        model: &str,
        with_pvs: bool,
        response: String,
        response_time_ms: u64,
    ) -> Self {
        Self {
            question_id: question_id.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            with_pvs,
            response_length: response.chars().count(),
            response_tokens: estimate(&response),
            response,
            system_prompt_tokens: None,
            total_input_tokens: None,
            response_time_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
            error: None,
        }
    }

    /// @ai:intent Record a failed query with zeroed response metrics
    /// @ai:effects pure
    pub fn failure(
        question_id: &str,
        provider: &str,
        model: &str,
        with_pvs: bool,
        error: String,
    ) -> Self {
        Self {
            question_id: question_id.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            with_pvs,
            response: String::new(),
            response_length: 0,
            response_tokens: 0,
            system_prompt_tokens: None,
            total_input_tokens: None,
            response_time_ms: 0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Grouping key shared by the baseline and enhanced result of one pair
    pub fn pair_key(&self) -> (&str, &str, &str) {
        (&self.question_id, &self.provider, &self.model)
    }
}

/// @ai:intent Three 0-5 quality axes with confidence and reasoning
/// @ai:invariant axes within [0,5], confidence within [0,1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedScore {
    pub alignment: f64,
    pub consistency: f64,
    pub relevance: f64,
    pub confidence: f64,
    pub reasoning: String,
}

impl DetailedScore {
    /// @ai:intent Neutral score used when evaluation itself fails
    /// @ai:effects pure
    pub fn fallback(error: &str) -> Self {
        Self {
            alignment: FALLBACK_AXIS_SCORE,
            consistency: FALLBACK_AXIS_SCORE,
            relevance: FALLBACK_AXIS_SCORE,
            confidence: FALLBACK_CONFIDENCE,
            reasoning: format!("Fallback neutral score: {}", error),
        }
    }

    /// Mean of the three axes
    pub fn overall(&self) -> f64 {
        (self.alignment + self.consistency + self.relevance) / 3.0
    }
}

/// @ai:intent Evaluated baseline/enhanced pair for one question and model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkScore {
    pub question_id: String,
    pub provider: String,
    pub model: String,
    pub category: QuestionCategory,
    pub scores: DetailedScore,
    /// Cost-efficiency gain over baseline in percent; positive means cheaper or faster
    pub improvement: f64,
}

/// @ai:intent Mean quality axes over a set of scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisAverages {
    pub alignment: f64,
    pub consistency: f64,
    pub relevance: f64,
    pub confidence: f64,
}

/// @ai:intent Statistics for one provider or category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub name: String,
    pub count: usize,
    pub average_improvement: f64,
    pub average_scores: AxisAverages,
}

/// @ai:intent Derived statistics over every score of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub average_improvement: f64,
    pub best_provider: String,
    pub most_improved_category: String,
    pub total_execution_time_ms: u64,
    #[serde(default)]
    pub average_scores: AxisAverages,
    #[serde(default)]
    pub by_provider: Vec<GroupStats>,
    #[serde(default)]
    pub by_category: Vec<GroupStats>,
}

/// @ai:intent Everything a run produced, persisted as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub suite_name: String,
    pub profile_owner: String,
    pub timestamp: String,
    pub total_questions: usize,
    pub total_models: usize,
    pub total_results: usize,
    pub failed_results: usize,
    pub results: Vec<BenchmarkResult>,
    pub scores: Vec<BenchmarkScore>,
    pub summary: ReportSummary,
}
