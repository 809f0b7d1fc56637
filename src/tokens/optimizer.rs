//! @ai:module:intent Suggest profile trims that shrink the injected prompt
//! @ai:module:layer domain
//! @ai:module:public_api optimize_profile, OptimizationReport, OptimizationSuggestion
//! @ai:module:stateless true

use crate::profile::Profile;
use crate::tokens::estimator::{estimate, estimate_system_prompt};
use serde::{Deserialize, Serialize};

pub const MAX_SKILLS: usize = 10;
pub const MAX_BIO_CHARS: usize = 200;
pub const MAX_ACHIEVEMENTS: usize = 3;

/// @ai:intent One proposed trim and what it would save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub field: String,
    pub description: String,
    pub estimated_savings: u32,
}

/// @ai:intent All proposed trims for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub current_tokens: u32,
    pub suggestions: Vec<OptimizationSuggestion>,
    pub total_savings: u32,
    pub optimized_tokens: u32,
}

/// @ai:intent Inspect a profile for oversized fields and estimate savings
/// @ai:post the profile is not modified
/// @ai:effects pure
pub fn optimize_profile(profile: &Profile) -> OptimizationReport {
    let identity = &profile.identity;
    let mut suggestions = Vec::new();

    if identity.skills.len() > MAX_SKILLS {
        let full = estimate(&identity.skills.join(", "));
        let kept = estimate(&identity.skills[..MAX_SKILLS].join(", "));
        suggestions.push(OptimizationSuggestion {
            field: "identity.skills".to_string(),
            description: format!(
                "Keep the {} most relevant of {} skills",
                MAX_SKILLS,
                identity.skills.len()
            ),
            estimated_savings: full.saturating_sub(kept),
        });
    }

    let bio_chars = identity.bio.chars().count();
    if bio_chars > MAX_BIO_CHARS {
        let truncated: String = identity.bio.chars().take(MAX_BIO_CHARS).collect();
        suggestions.push(OptimizationSuggestion {
            field: "identity.bio".to_string(),
            description: format!(
                "Shorten the bio from {} to at most {} characters",
                bio_chars, MAX_BIO_CHARS
            ),
            estimated_savings: estimate(&identity.bio).saturating_sub(estimate(&truncated)),
        });
    }

    if let Some(achievements) = identity.achievements.as_ref().filter(|a| a.len() > MAX_ACHIEVEMENTS) {
        let full = estimate(&achievements.join("; "));
        let kept = estimate(&achievements[..MAX_ACHIEVEMENTS].join("; "));
        suggestions.push(OptimizationSuggestion {
            field: "identity.achievements".to_string(),
            description: format!(
                "Keep the top {} of {} achievements",
                MAX_ACHIEVEMENTS,
                achievements.len()
            ),
            estimated_savings: full.saturating_sub(kept),
        });
    }

    let current_tokens = estimate_system_prompt(profile, None).system_prompt_tokens;
    let total_savings: u32 = suggestions.iter().map(|s| s.estimated_savings).sum();

    OptimizationReport {
        current_tokens,
        suggestions,
        total_savings,
        optimized_tokens: current_tokens.saturating_sub(total_savings),
    }
}
