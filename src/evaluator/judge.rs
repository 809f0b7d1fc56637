//! @ai:module:intent AI-judge capability: prompt construction and verdict parsing
//! @ai:module:layer application
//! @ai:module:public_api Judge, MockJudge, build_judge_prompt, parse_judge_response
//! @ai:module:stateless true

use crate::evaluator::PartialScore;
use crate::metrics::BenchmarkResult;
use crate::profile::Profile;
use crate::runner::{Adapter, ProviderAdapter};
use crate::suite::BenchmarkQuestion;
use serde::Deserialize;

const DEFAULT_JUDGE_CONFIDENCE: f64 = 0.5;

/// @ai:intent Anything able to answer a prompt with text, fallibly
#[allow(async_fn_in_trait)]
pub trait Judge: Send + Sync {
    async fn answer(&self, prompt: &str) -> anyhow::Result<String>;
}

impl Judge for Adapter {
    /// @ai:intent Ask the judge model without any system context
    /// @ai:effects network
    async fn answer(&self, prompt: &str) -> anyhow::Result<String> {
        self.ready().await;
        self.query(prompt, None).await
    }
}

/// @ai:intent Verdict object the judge is asked to return
#[derive(Debug, Deserialize)]
struct JudgeVerdict {
    alignment: f64,
    consistency: f64,
    relevance: f64,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: String,
}

/// @ai:intent Build the judge prompt comparing both responses against the profile's style
/// @ai:effects pure
pub fn build_judge_prompt(
    question: &BenchmarkQuestion,
    baseline: &BenchmarkResult,
    enhanced: &BenchmarkResult,
    profile: &Profile,
) -> String {
    let style = &profile.communication_style;
    let expected = if question.expected_style.is_empty() {
        "none".to_string()
    } else {
        question.expected_style.join(", ")
    };

    format!(
        r#"You are evaluating whether personal context improved an AI assistant's answer.

## Question ({category})
{prompt}

Expected style: {expected}

## User communication style
- Tone: {tone}
- Languages: {languages}
- Answers: {answers}
- Code: {code}
- Explanations: {explanations}

## Baseline response (no personal context; {base_len} chars, {base_ms} ms)
{baseline}

## Enhanced response (with personal context; {enh_len} chars, {enh_ms} ms)
{enhanced}

## Instructions
Score the ENHANCED response relative to the baseline on three axes from 0 to 5,
where 3 means "equal to baseline", higher is better and lower is worse:
1. alignment: how well it fits this user's background and preferences
2. consistency: how well it follows the expected and preferred style
3. relevance: how directly and usefully it answers the question

Respond ONLY with valid JSON in this exact format:
{{"alignment": <0-5>, "consistency": <0-5>, "relevance": <0-5>, "confidence": <0-1>, "reasoning": "<one or two sentences>"}}"#,
        category = question.category,
        prompt = question.user_prompt(),
        expected = expected,
        tone = style.tone,
        languages = style.languages.join(", "),
        answers = style.preference("answers"),
        code = style.preference("code"),
        explanations = style.preference("explanations"),
        base_len = baseline.response_length,
        base_ms = baseline.response_time_ms,
        baseline = baseline.response,
        enh_len = enhanced.response_length,
        enh_ms = enhanced.response_time_ms,
        enhanced = enhanced.response,
    )
}

/// @ai:intent Locate the first balanced top-level JSON object in free text
/// @ai:post braces inside string literals are ignored
/// @ai:effects pure
fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 5.0)
    } else {
        0.0
    }
}

/// @ai:intent Parse the judge's raw answer into a partial score
/// @ai:post None when no parseable verdict exists; otherwise axes in [0,5] and confidence in [0,1]
/// @ai:effects pure
pub fn parse_judge_response(response: &str) -> Option<PartialScore> {
    let json = extract_first_json_object(response)?;

    let verdict: JudgeVerdict = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("Judge verdict did not parse: {}", e);
            return None;
        }
    };

    let confidence = verdict
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_JUDGE_CONFIDENCE)
        .clamp(0.0, 1.0);

    Some(PartialScore {
        alignment: clamp_score(verdict.alignment),
        consistency: clamp_score(verdict.consistency),
        relevance: clamp_score(verdict.relevance),
        confidence,
        reasoning: format!("AI judge: {}", verdict.reasoning.trim()),
    })
}

/// @ai:intent Judge returning a fixed answer or failure, for tests and dry runs
pub struct MockJudge {
    reply: Result<String, String>,
}

impl MockJudge {
    /// @ai:intent Create a judge that always answers with the given text
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            reply: Ok(answer.into()),
        }
    }

    /// @ai:intent Create a judge whose every call fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
        }
    }
}

impl Judge for MockJudge {
    async fn answer(&self, _prompt: &str) -> anyhow::Result<String> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => anyhow::bail!("{}", message),
        }
    }
}
