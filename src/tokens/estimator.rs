//! @ai:module:intent Approximate token accounting for injected prompts
//! @ai:module:layer domain
//! @ai:module:public_api estimate, estimate_system_prompt, estimate_with_query, analyze_for_model, TokenBreakdown, ModelAnalysis, PromptStatus
//! @ai:module:stateless true
//!
//! Counts are a character heuristic, not a tokenizer. They are good enough to
//! compare prompt sizes against model budgets and nothing more.

use crate::profile::{PromptSections, Profile};
use crate::tokens::limits::{limits_for, ModelLimits, DEFAULT_LIMITS_MODEL};
use serde::{Deserialize, Serialize};

pub const CHARS_PER_TOKEN: f64 = 3.5;
pub const DEFAULT_MAX_RESPONSE_TOKENS: u32 = 1500;
const CONTEXT_CRITICAL_RATIO: f64 = 0.9;

/// @ai:intent Approximate the token count of a text
/// @ai:post monotonic non-decreasing in the character length of text
/// @ai:example ("abcdefg") -> 2
/// @ai:effects pure
pub fn estimate(text: &str) -> u32 {
    (text.chars().count() as f64 / CHARS_PER_TOKEN).ceil() as u32
}

/// @ai:intent Token counts of each system prompt section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTokens {
    pub header: u32,
    pub identity: u32,
    pub communication_style: u32,
    pub instructions: u32,
    pub additional: u32,
}

/// @ai:intent Full token estimate for a request carrying the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBreakdown {
    pub sections: SectionTokens,
    pub system_prompt_tokens: u32,
    pub query_tokens: u32,
    pub total_input_tokens: u32,
    pub max_response_tokens: u32,
    pub total_estimate: u32,
}

/// @ai:intent Estimate the injected system prompt alone
/// @ai:effects pure
pub fn estimate_system_prompt(profile: &Profile, addendum: Option<&str>) -> TokenBreakdown {
    let sections = PromptSections::render(profile, addendum);
    let system_prompt_tokens = estimate(&sections.join());

    TokenBreakdown {
        sections: SectionTokens {
            header: estimate(&sections.header),
            identity: estimate(&sections.identity),
            communication_style: estimate(&sections.communication_style),
            instructions: estimate(&sections.instructions),
            additional: sections.additional.as_deref().map(estimate).unwrap_or(0),
        },
        system_prompt_tokens,
        query_tokens: 0,
        total_input_tokens: system_prompt_tokens,
        max_response_tokens: DEFAULT_MAX_RESPONSE_TOKENS,
        total_estimate: system_prompt_tokens + DEFAULT_MAX_RESPONSE_TOKENS,
    }
}

/// @ai:intent Estimate system prompt plus a concrete user query
/// @ai:effects pure
pub fn estimate_with_query(profile: &Profile, query: &str, addendum: Option<&str>) -> TokenBreakdown {
    let mut breakdown = estimate_system_prompt(profile, addendum);
    let query_tokens = estimate(query);

    breakdown.query_tokens = query_tokens;
    breakdown.total_input_tokens = breakdown.system_prompt_tokens + query_tokens;
    breakdown.total_estimate = breakdown.total_input_tokens + breakdown.max_response_tokens;
    breakdown
}

/// @ai:intent How comfortably the injected prompt fits a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    Optimal,
    Warning,
    Critical,
}

impl PromptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStatus::Optimal => "optimal",
            PromptStatus::Warning => "warning",
            PromptStatus::Critical => "critical",
        }
    }
}

impl std::fmt::Display for PromptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Token breakdown judged against a model's limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAnalysis {
    pub model: String,
    pub known_model: bool,
    pub breakdown: TokenBreakdown,
    pub limits: ModelLimits,
    pub status: PromptStatus,
    pub suggestions: Vec<String>,
}

/// @ai:intent Classify the injected prompt against a model's limits
/// @ai:effects pure
pub fn analyze_for_model(
    profile: &Profile,
    model: &str,
    query: Option<&str>,
    addendum: Option<&str>,
) -> ModelAnalysis {
    let breakdown = match query {
        Some(q) => estimate_with_query(profile, q, addendum),
        None => estimate_system_prompt(profile, addendum),
    };
    let (limits, known_model) = limits_for(model);

    let system = breakdown.system_prompt_tokens;
    let context_budget = (limits.context_window as f64 * CONTEXT_CRITICAL_RATIO) as u32;
    let over_recommended = system > limits.recommended_system_prompt;
    let over_warning = system > limits.warning_threshold;
    let over_context = breakdown.total_estimate > context_budget;

    let mut suggestions = Vec::new();

    if !known_model {
        suggestions.push(format!(
            "Unknown model '{}'; using {} limits.",
            model, DEFAULT_LIMITS_MODEL
        ));
    }

    if over_recommended {
        suggestions.push(format!(
            "System prompt uses {} tokens, above the recommended {} for {}. Run `pvs-bench optimize` for trims.",
            system, limits.recommended_system_prompt, model
        ));
    }

    if over_warning {
        suggestions.push(format!(
            "System prompt exceeds the warning threshold of {} tokens; shorten the bio or skill list before benchmarking.",
            limits.warning_threshold
        ));
    }

    if over_context {
        suggestions.push(format!(
            "Estimated total of {} tokens exceeds 90% of the {}-token context window; shorten the query or lower the response budget.",
            breakdown.total_estimate, limits.context_window
        ));
    }

    let status = if over_warning || over_context {
        PromptStatus::Critical
    } else if over_recommended {
        PromptStatus::Warning
    } else {
        PromptStatus::Optimal
    };

    ModelAnalysis {
        model: model.to_string(),
        known_model,
        breakdown,
        limits,
        status,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::build_system_prompt;
    use crate::profile::types::fixtures::sample_profile;

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate(""), 0);
        assert_eq!(estimate("a"), 1);
        assert_eq!(estimate("abcdefg"), 2);
        assert_eq!(estimate("abcdefgh"), 3);
    }

    #[test]
    fn test_estimate_is_monotonic() {
        let mut text = String::new();
        let mut previous = 0;

        for _ in 0..200 {
            text.push('x');
            let current = estimate(&text);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_estimate_counts_characters_not_bytes() {
        assert_eq!(estimate("ééééééé"), estimate("abcdefg"));
    }

    #[test]
    fn test_system_prompt_breakdown() {
        let profile = sample_profile();
        let breakdown = estimate_system_prompt(&profile, None);

        assert_eq!(breakdown.system_prompt_tokens, estimate(&build_system_prompt(&profile, None)));
        assert_eq!(breakdown.query_tokens, 0);
        assert_eq!(breakdown.total_input_tokens, breakdown.system_prompt_tokens);
        assert_eq!(breakdown.total_estimate, breakdown.system_prompt_tokens + 1500);
        assert_eq!(breakdown.sections.additional, 0);
        assert!(breakdown.sections.identity > breakdown.sections.header);
    }

    #[test]
    fn test_breakdown_with_query_and_addendum() {
        let profile = sample_profile();
        let query = "How should I shard a Postgres table with 2B rows?";
        let breakdown = estimate_with_query(&profile, query, Some("Prefer bullet points."));

        assert_eq!(breakdown.query_tokens, estimate(query));
        assert!(breakdown.sections.additional > 0);
        assert_eq!(
            breakdown.total_input_tokens,
            breakdown.system_prompt_tokens + breakdown.query_tokens
        );
        assert_eq!(breakdown.total_estimate, breakdown.total_input_tokens + 1500);
    }

    #[test]
    fn test_small_profile_is_optimal() {
        let analysis = analyze_for_model(&sample_profile(), "gpt-4o", None, None);
        assert_eq!(analysis.status, PromptStatus::Optimal);
        assert!(analysis.suggestions.is_empty());
    }

    #[test]
    fn test_large_bio_triggers_warning() {
        let mut profile = sample_profile();
        profile.identity.bio = "x".repeat(8_000);

        let analysis = analyze_for_model(&profile, "gpt-4o", None, None);
        assert_eq!(analysis.status, PromptStatus::Warning);
        assert_eq!(analysis.suggestions.len(), 1);
    }

    #[test]
    fn test_huge_bio_is_critical() {
        let mut profile = sample_profile();
        profile.identity.bio = "x".repeat(20_000);

        let analysis = analyze_for_model(&profile, "gpt-4o", None, None);
        assert_eq!(analysis.status, PromptStatus::Critical);
        assert_eq!(analysis.suggestions.len(), 2);
    }

    #[test]
    fn test_context_window_pressure_is_critical() {
        let query = "q".repeat(50_000);
        let analysis = analyze_for_model(&sample_profile(), "gpt-3.5-turbo", Some(&query), None);

        assert_eq!(analysis.status, PromptStatus::Critical);
        assert!(analysis.suggestions.iter().any(|s| s.contains("context window")));
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let analysis = analyze_for_model(&sample_profile(), "mystery-model", None, None);
        assert!(!analysis.known_model);
        assert_eq!(analysis.limits, limits_for(DEFAULT_LIMITS_MODEL).0);
        assert_eq!(analysis.status, PromptStatus::Optimal);
    }
}
