//! @ai:module:intent Rule-based partial score comparing an enhanced response to its baseline
//! @ai:module:layer domain
//! @ai:module:public_api algorithmic_score, ALGORITHMIC_CONFIDENCE
//! @ai:module:stateless true

use crate::evaluator::PartialScore;
use crate::metrics::BenchmarkResult;
use crate::suite::{BenchmarkQuestion, QuestionCategory};
use regex::Regex;
use std::sync::OnceLock;

pub const ALGORITHMIC_CONFIDENCE: f64 = 0.7;

const MAX_SCORE: f64 = 5.0;
const NEUTRAL_CONSISTENCY: f64 = 3.0;
const BASE_RELEVANCE: f64 = 3.0;
const UNKNOWN_TAG_MATCH: f64 = 0.5;
const SUBSTANTIAL_LENGTH: usize = 100;
/// Enhanced chars-per-token must exceed the baseline's by this factor; smaller gaps are estimator rounding.
const DENSITY_MARGIN: f64 = 1.05;

const TECHNICAL_KEYWORDS: &[&str] = &[
    "implement", "function", "algorithm", "code", "api", "architecture", "database", "performance",
    "config", "library", "framework", "query", "compile", "deploy", "protocol", "system",
];
const PRACTICAL_KEYWORDS: &[&str] = &[
    "example", "step", "try", "start", "tip", "practice", "apply", "checklist", "first", "next",
    "how to", "verify", "test",
];
const CREATIVE_KEYWORDS: &[&str] = &[
    "imagine", "story", "idea", "creative", "design", "inspire", "original", "concept", "invent",
    "style",
];
const ADVICE_KEYWORDS: &[&str] = &[
    "recommend", "suggest", "should", "consider", "advice", "option", "trade-off", "tradeoff",
    "prioriti", "avoid",
];

static TECHNICAL_RE: OnceLock<Regex> = OnceLock::new();
static PRACTICAL_RE: OnceLock<Regex> = OnceLock::new();
static CREATIVE_RE: OnceLock<Regex> = OnceLock::new();
static ADVICE_RE: OnceLock<Regex> = OnceLock::new();
static PERSONAL_RE: OnceLock<Regex> = OnceLock::new();

/// Case-insensitive match of any keyword at the start of a word ("implement" matches "implementation").
fn keyword_regex(cell: &'static OnceLock<Regex>, words: &[&str]) -> &'static Regex {
    cell.get_or_init(|| {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{})", alternation)).expect("Invalid keyword regex")
    })
}

fn mentions_technical(text: &str) -> bool {
    keyword_regex(&TECHNICAL_RE, TECHNICAL_KEYWORDS).is_match(text)
}

fn mentions_practical(text: &str) -> bool {
    keyword_regex(&PRACTICAL_RE, PRACTICAL_KEYWORDS).is_match(text)
}

fn addresses_reader(text: &str) -> bool {
    PERSONAL_RE
        .get_or_init(|| Regex::new(r"(?i)\b(?:you|your|yours|yourself)\b").expect("Invalid regex"))
        .is_match(text)
}

/// Ratio of two quantities, treating two zeros as equal and a zero denominator otherwise as unbounded.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    match (numerator == 0.0, denominator == 0.0) {
        (true, true) => 1.0,
        (false, true) => f64::INFINITY,
        _ => numerator / denominator,
    }
}

fn chars_per_token(result: &BenchmarkResult) -> Option<f64> {
    (result.response_tokens > 0)
        .then(|| result.response_length as f64 / result.response_tokens as f64)
}

/// @ai:intent Score how visibly the profile shaped the enhanced response
/// @ai:post result within [0,5]
/// @ai:effects pure
fn alignment(baseline: &BenchmarkResult, enhanced: &BenchmarkResult, notes: &mut Vec<String>) -> f64 {
    let mut score: f64 = 0.0;

    let length_ratio = if baseline.response_length == 0 {
        1.0
    } else {
        enhanced.response_length as f64 / baseline.response_length as f64
    };

    if length_ratio > 1.2 {
        score += 1.0;
        notes.push(format!("more detailed ({:.2}x length)", length_ratio));
    } else if length_ratio < 0.8 {
        score += 1.0;
        notes.push(format!("more concise ({:.2}x length)", length_ratio));
    }

    if let (Some(base), Some(enh)) = (chars_per_token(baseline), chars_per_token(enhanced)) {
        if enh > base * DENSITY_MARGIN {
            score += 0.5;
            notes.push("denser phrasing".to_string());
        }
    }

    if enhanced.system_prompt_tokens.is_some_and(|t| t > 0) {
        score += 1.5;
        notes.push("personal context applied".to_string());
    }

    let time_ratio = ratio(
        enhanced.response_time_ms as f64,
        baseline.response_time_ms as f64,
    );
    if (0.8..=1.2).contains(&time_ratio) {
        score += 0.5;
        notes.push("similar latency".to_string());
    }

    score.min(MAX_SCORE)
}

/// @ai:intent Fraction of expected style tags the enhanced response satisfies, scaled to 0-5
/// @ai:post neutral 3 when the question has no tags
/// @ai:effects pure
fn consistency(
    question: &BenchmarkQuestion,
    baseline: &BenchmarkResult,
    enhanced: &BenchmarkResult,
) -> f64 {
    if question.expected_style.is_empty() {
        return NEUTRAL_CONSISTENCY;
    }

    let base_len = baseline.response_length as f64;
    let enh_len = enhanced.response_length as f64;
    let hit = |matched: bool| if matched { 1.0 } else { 0.0 };

    let matched: f64 = question
        .expected_style
        .iter()
        .map(|tag| match tag.trim().to_lowercase().as_str() {
            "direct" => hit(enh_len < base_len * 1.2),
            "technical" => hit(mentions_technical(&enhanced.response)),
            "detailed" => hit(enh_len > base_len),
            "practical" => hit(mentions_practical(&enhanced.response)),
            _ => UNKNOWN_TAG_MATCH,
        })
        .sum();

    (matched / question.expected_style.len() as f64 * MAX_SCORE).min(MAX_SCORE)
}

/// @ai:intent Check the enhanced response against category-specific vocabulary
/// @ai:effects pure
fn matches_category(category: QuestionCategory, text: &str) -> bool {
    match category {
        QuestionCategory::Technical => mentions_technical(text),
        QuestionCategory::Personal => addresses_reader(text),
        QuestionCategory::Creative => keyword_regex(&CREATIVE_RE, CREATIVE_KEYWORDS).is_match(text),
        QuestionCategory::Advice => keyword_regex(&ADVICE_RE, ADVICE_KEYWORDS).is_match(text),
        QuestionCategory::Other => true,
    }
}

/// @ai:intent Score how well the enhanced response addresses the question
/// @ai:post result within [3,5]
/// @ai:effects pure
fn relevance(
    question: &BenchmarkQuestion,
    baseline: &BenchmarkResult,
    enhanced: &BenchmarkResult,
    notes: &mut Vec<String>,
) -> f64 {
    let mut score = BASE_RELEVANCE;

    if enhanced.response_length > SUBSTANTIAL_LENGTH {
        score += 0.5;
    }

    if !baseline.is_error() && !enhanced.is_error() {
        score += 1.0;
    }

    if matches_category(question.category, &enhanced.response) {
        score += 1.0;
        notes.push(format!("on-topic for {}", question.category));
    }

    score.min(MAX_SCORE)
}

/// @ai:intent Compute the heuristic partial score for a baseline/enhanced pair
/// @ai:post axes within [0,5], confidence fixed at ALGORITHMIC_CONFIDENCE
/// @ai:effects pure
pub fn algorithmic_score(
    question: &BenchmarkQuestion,
    baseline: &BenchmarkResult,
    enhanced: &BenchmarkResult,
) -> PartialScore {
    let mut notes = Vec::new();

    let alignment = alignment(baseline, enhanced, &mut notes);
    let consistency = consistency(question, baseline, enhanced);
    let relevance = relevance(question, baseline, enhanced, &mut notes);

    let detail = if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join(", "))
    };

    PartialScore {
        alignment,
        consistency,
        relevance,
        confidence: ALGORITHMIC_CONFIDENCE,
        reasoning: format!(
            "Algorithmic: alignment {:.1}, consistency {:.1}, relevance {:.1}{}.",
            alignment, consistency, relevance, detail
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(category: QuestionCategory, tags: &[&str]) -> BenchmarkQuestion {
        BenchmarkQuestion {
            id: "q1".to_string(),
            category,
            prompt: "How do I speed up my build?".to_string(),
            expected_style: tags.iter().map(|t| t.to_string()).collect(),
            context: None,
        }
    }

    fn result(with_pvs: bool, response: &str, length: usize, tokens: u32, ms: u64) -> BenchmarkResult {
        let mut r = BenchmarkResult::success("q1", "openai", "gpt-4o", with_pvs, response.to_string(), ms);
        r.response_length = length;
        r.response_tokens = tokens;
        r
    }

    #[test]
    fn test_reference_pair_scores() {
        let baseline = result(false, "Use caching.", 105, 25, 1500);
        let mut enhanced = result(true, "Use sccache and split crates.", 687, 156, 2300);
        enhanced.system_prompt_tokens = Some(89);

        let score = algorithmic_score(&question(QuestionCategory::Other, &[]), &baseline, &enhanced);

        assert_eq!(score.alignment, 2.5);
        assert_eq!(score.consistency, 3.0);
        assert!(score.relevance >= 4.5);
        assert_eq!(score.confidence, 0.7);
    }

    #[test]
    fn test_only_latency_bonus_without_context() {
        let baseline = result(false, "same", 200, 58, 1000);
        let enhanced = result(true, "same", 210, 60, 1100);

        let score = algorithmic_score(&question(QuestionCategory::Other, &[]), &baseline, &enhanced);

        assert_eq!(score.alignment, 0.5);
    }

    #[test]
    fn test_failed_direct_tag_scores_zero() {
        let baseline = result(false, "short", 100, 29, 1000);
        let enhanced = result(true, "long", 400, 115, 1000);

        let score = algorithmic_score(
            &question(QuestionCategory::Technical, &["direct"]),
            &baseline,
            &enhanced,
        );

        assert_eq!(score.consistency, 0.0);
    }

    #[test]
    fn test_mixed_tags_average() {
        let baseline = result(false, "", 100, 29, 1000);
        let enhanced = result(
            true,
            "Start with this example: implement the function, then verify it.",
            110,
            43,
            1000,
        );

        // technical 1, detailed 1, practical 1, direct 1, unknown 0.5 => 4.5 / 5 * 5
        let score = algorithmic_score(
            &question(
                QuestionCategory::Technical,
                &["technical", "Detailed", "practical", "direct", "witty"],
            ),
            &baseline,
            &enhanced,
        );

        assert_eq!(score.consistency, 4.5);
    }

    #[test]
    fn test_rounding_noise_earns_no_density_bonus() {
        let baseline = BenchmarkResult::success("q1", "openai", "gpt-4o", false, "a".repeat(203), 1000);
        let enhanced = BenchmarkResult::success("q1", "openai", "gpt-4o", true, "b".repeat(204), 1000);
        assert_eq!((baseline.response_tokens, enhanced.response_tokens), (58, 59));

        let score = algorithmic_score(&question(QuestionCategory::Other, &[]), &baseline, &enhanced);
        assert_eq!(score.alignment, 0.5);

        let score = algorithmic_score(&question(QuestionCategory::Other, &[]), &enhanced, &baseline);
        assert_eq!(score.alignment, 0.5);
    }

    #[test]
    fn test_density_bonus() {
        let baseline = result(false, "", 350, 100, 0);
        let enhanced = result(true, "", 350, 80, 0);

        let score = algorithmic_score(&question(QuestionCategory::Other, &[]), &baseline, &enhanced);

        // denser phrasing plus matching (zero) latency
        assert_eq!(score.alignment, 1.0);
    }

    #[test]
    fn test_every_alignment_bonus() {
        let baseline = result(false, "", 100, 40, 1000);
        let mut enhanced = result(true, "", 400, 100, 1000);
        enhanced.system_prompt_tokens = Some(300);

        let score = algorithmic_score(&question(QuestionCategory::Other, &[]), &baseline, &enhanced);

        assert_eq!(score.alignment, 3.5);
    }

    #[test]
    fn test_category_heuristics() {
        assert!(matches_category(QuestionCategory::Personal, "Given your schedule, block mornings."));
        assert!(!matches_category(QuestionCategory::Personal, "Youth sports are fun."));
        assert!(matches_category(QuestionCategory::Technical, "The IMPLEMENTATION uses a B-tree."));
        assert!(matches_category(QuestionCategory::Creative, "Imagine a lighthouse keeper."));
        assert!(matches_category(QuestionCategory::Advice, "I would recommend waiting."));
        assert!(!matches_category(QuestionCategory::Advice, "Blue is a color."));
        assert!(matches_category(QuestionCategory::Other, ""));
    }

    #[test]
    fn test_relevance_without_keyword_match() {
        let baseline = result(false, "", 50, 15, 1000);
        let enhanced = result(true, "Blue is a color.", 16, 5, 1000);

        let score = algorithmic_score(&question(QuestionCategory::Advice, &[]), &baseline, &enhanced);

        assert_eq!(score.relevance, 4.0);
    }
}
