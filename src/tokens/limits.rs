//! @ai:module:intent Static per-model token limits
//! @ai:module:layer domain
//! @ai:module:public_api ModelLimits, limits_for, DEFAULT_LIMITS_MODEL
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// Model whose limits apply when a model name is not in the table.
pub const DEFAULT_LIMITS_MODEL: &str = "gpt-4o";

/// @ai:intent Token budget of a model for system-prompt injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLimits {
    pub context_window: u32,
    /// System-prompt size that stays comfortably within the model's attention
    pub recommended_system_prompt: u32,
    /// Above this the injected prompt is considered too large
    pub warning_threshold: u32,
}

const fn limits(context_window: u32, recommended: u32, warning: u32) -> ModelLimits {
    ModelLimits {
        context_window,
        recommended_system_prompt: recommended,
        warning_threshold: warning,
    }
}

static MODEL_LIMITS: &[(&str, ModelLimits)] = &[
    ("gpt-4o", limits(128_000, 2_000, 4_000)),
    ("gpt-4o-mini", limits(128_000, 1_500, 3_000)),
    ("gpt-4-turbo", limits(128_000, 2_000, 4_000)),
    ("gpt-3.5-turbo", limits(16_385, 800, 1_500)),
    ("claude-3-5-sonnet-latest", limits(200_000, 3_000, 6_000)),
    ("claude-3-5-haiku-latest", limits(200_000, 2_000, 4_000)),
    ("claude-3-opus-latest", limits(200_000, 3_000, 6_000)),
    ("gemini-1.5-pro", limits(2_000_000, 4_000, 8_000)),
    ("gemini-1.5-flash", limits(1_000_000, 2_000, 4_000)),
    ("mistral-large-latest", limits(128_000, 2_000, 4_000)),
    ("deepseek-chat", limits(64_000, 1_500, 3_000)),
];

/// @ai:intent Look up limits for a model, falling back to the default model
/// @ai:post second element is false when the fallback was used
/// @ai:effects pure
pub fn limits_for(model: &str) -> (ModelLimits, bool) {
    let lookup = |name: &str| {
        MODEL_LIMITS
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(name))
            .map(|(_, l)| *l)
    };

    match lookup(model) {
        Some(found) => (found, true),
        None => (
            lookup(DEFAULT_LIMITS_MODEL).unwrap_or(limits(128_000, 2_000, 4_000)),
            false,
        ),
    }
}

/// @ai:intent Names of every model with known limits
/// @ai:effects pure
pub fn known_models() -> impl Iterator<Item = &'static str> {
    MODEL_LIMITS.iter().map(|(m, _)| *m)
}
