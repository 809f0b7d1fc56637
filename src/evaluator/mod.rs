//! @ai:module:intent Score a profile-enhanced response against its baseline
//! @ai:module:layer application
//! @ai:module:public_api ResponseEvaluator, PartialScore, Judge, MockJudge, algorithmic_score

pub mod algorithmic;
pub mod judge;

pub use algorithmic::{algorithmic_score, ALGORITHMIC_CONFIDENCE};
pub use judge::{build_judge_prompt, parse_judge_response, Judge, MockJudge};

use crate::config::WeightsConfig;
use crate::error::{Error, Result};
use crate::metrics::{BenchmarkResult, DetailedScore};
use crate::profile::Profile;
use crate::suite::BenchmarkQuestion;

/// @ai:intent One scorer's view of a pair, before blending
#[derive(Debug, Clone, PartialEq)]
pub struct PartialScore {
    pub alignment: f64,
    pub consistency: f64,
    pub relevance: f64,
    pub confidence: f64,
    pub reasoning: String,
}

/// @ai:intent Blends the algorithmic score with an optional AI-judge score
pub struct ResponseEvaluator<J: Judge> {
    judge: Option<J>,
    profile: Profile,
    algorithmic_weight: f64,
    ai_weight: f64,
}

impl<J: Judge> ResponseEvaluator<J> {
    /// @ai:intent Create an evaluator consulting the given judge
    /// @ai:effects pure
    pub fn new(judge: J, profile: Profile, weights: &WeightsConfig) -> Self {
        Self {
            judge: Some(judge),
            profile,
            algorithmic_weight: weights.algorithmic,
            ai_weight: weights.ai,
        }
    }

    /// @ai:intent Create an evaluator that only uses heuristics
    /// @ai:effects pure
    pub fn algorithmic_only(profile: Profile) -> Self {
        let weights = WeightsConfig::default();
        Self {
            judge: None,
            profile,
            algorithmic_weight: weights.algorithmic,
            ai_weight: weights.ai,
        }
    }

    pub fn uses_judge(&self) -> bool {
        self.judge.is_some()
    }

    /// @ai:intent Ask the judge for its partial score; None when disabled or unparseable, Err when the call fails
    /// @ai:effects network
    async fn judge_score(
        &self,
        question: &BenchmarkQuestion,
        baseline: &BenchmarkResult,
        enhanced: &BenchmarkResult,
    ) -> std::result::Result<Option<PartialScore>, String> {
        let Some(judge) = &self.judge else {
            return Ok(None);
        };

        let prompt = build_judge_prompt(question, baseline, enhanced, &self.profile);

        match judge.answer(&prompt).await {
            Ok(raw) => {
                tracing::debug!("Judge answer for {}: {}", question.id, raw);
                let parsed = parse_judge_response(&raw);
                if parsed.is_none() {
                    tracing::warn!("Judge answer for {} had no usable JSON verdict", question.id);
                }
                Ok(parsed)
            }
            Err(e) => {
                tracing::warn!("Judge call failed for {}: {:#}", question.id, e);
                Err(format!("{:#}", e))
            }
        }
    }

    /// @ai:intent Blend the partial scores axis by axis
    /// @ai:effects pure
    fn combine(&self, algorithmic: PartialScore, ai: Option<PartialScore>) -> DetailedScore {
        let Some(ai) = ai else {
            return DetailedScore {
                alignment: algorithmic.alignment,
                consistency: algorithmic.consistency,
                relevance: algorithmic.relevance,
                confidence: algorithmic.confidence,
                reasoning: algorithmic.reasoning,
            };
        };

        let blend = |alg: f64, judged: f64| {
            (self.algorithmic_weight * alg + self.ai_weight * judged).clamp(0.0, 5.0)
        };

        DetailedScore {
            alignment: blend(algorithmic.alignment, ai.alignment),
            consistency: blend(algorithmic.consistency, ai.consistency),
            relevance: blend(algorithmic.relevance, ai.relevance),
            confidence: algorithmic.confidence.max(ai.confidence),
            reasoning: format!("{} {}", algorithmic.reasoning, ai.reasoning),
        }
    }

    /// @ai:intent Score a pair, surfacing structural problems as errors
    /// @ai:pre baseline and enhanced belong to the same question, provider and model
    /// @ai:effects network
    pub async fn try_evaluate(
        &self,
        question: &BenchmarkQuestion,
        baseline: &BenchmarkResult,
        enhanced: &BenchmarkResult,
    ) -> Result<DetailedScore> {
        if baseline.pair_key() != enhanced.pair_key() || baseline.question_id != question.id {
            return Err(Error::EvaluationFailed(format!(
                "results {:?} and {:?} do not belong to question {}",
                baseline.pair_key(),
                enhanced.pair_key(),
                question.id
            )));
        }

        if baseline.with_pvs || !enhanced.with_pvs {
            return Err(Error::EvaluationFailed(
                "expected one baseline and one enhanced result".to_string(),
            ));
        }

        let algorithmic = algorithmic_score(question, baseline, enhanced);

        let mut score = match self.judge_score(question, baseline, enhanced).await {
            Ok(ai) => self.combine(algorithmic, ai),
            Err(message) => {
                let mut score = self.combine(algorithmic, None);
                score.reasoning = format!("{} AI judge unavailable: {}", score.reasoning, message);
                score
            }
        };

        let finite = [score.alignment, score.consistency, score.relevance, score.confidence]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::EvaluationFailed(format!(
                "non-finite score for question {}",
                question.id
            )));
        }

        score.confidence = score.confidence.clamp(0.0, 1.0);
        Ok(score)
    }

    /// @ai:intent Score a pair, falling back to a neutral score if evaluation fails
    /// @ai:post axes within [0,5] and confidence within [0,1]
    /// @ai:effects network
    pub async fn evaluate_response(
        &self,
        question: &BenchmarkQuestion,
        baseline: &BenchmarkResult,
        enhanced: &BenchmarkResult,
    ) -> DetailedScore {
        match self.try_evaluate(question, baseline, enhanced).await {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("Evaluation of {} fell back to neutral scores: {}", question.id, e);
                DetailedScore::fallback(&e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::fixtures::sample_profile;
    use crate::suite::QuestionCategory;

    const VERDICT: &str = r#"Here you go: {"alignment": 4, "consistency": 5, "relevance": 3, "confidence": 0.9, "reasoning": "Matches the direct tone."}"#;

    fn question(tags: &[&str]) -> BenchmarkQuestion {
        BenchmarkQuestion {
            id: "q1".to_string(),
            category: QuestionCategory::Technical,
            prompt: "How do I profile a slow query?".to_string(),
            expected_style: tags.iter().map(|t| t.to_string()).collect(),
            context: None,
        }
    }

    fn results() -> (BenchmarkResult, BenchmarkResult) {
        let mut baseline = BenchmarkResult::success("q1", "openai", "gpt-4o", false, "x".repeat(105), 1500);
        baseline.response_tokens = 25;

        let mut enhanced = BenchmarkResult::success(
            "q1",
            "openai",
            "gpt-4o",
            true,
            format!("Run EXPLAIN ANALYZE on the query. {}", "y".repeat(653)),
            2300,
        );
        enhanced.response_length = 687;
        enhanced.response_tokens = 156;
        enhanced.system_prompt_tokens = Some(89);
        (baseline, enhanced)
    }

    fn evaluator<J: Judge>(judge: J) -> ResponseEvaluator<J> {
        ResponseEvaluator::new(judge, sample_profile(), &WeightsConfig::default())
    }

    #[tokio::test]
    async fn test_algorithmic_only() {
        let (baseline, enhanced) = results();
        let evaluator = ResponseEvaluator::<MockJudge>::algorithmic_only(sample_profile());

        let score = evaluator.evaluate_response(&question(&[]), &baseline, &enhanced).await;

        assert!(!evaluator.uses_judge());
        assert_eq!(score.alignment, 2.5);
        assert_eq!(score.consistency, 3.0);
        assert_eq!(score.relevance, 5.0);
        assert_eq!(score.confidence, 0.7);
    }

    #[tokio::test]
    async fn test_blends_judge_verdict() {
        let (baseline, enhanced) = results();

        let score = evaluator(MockJudge::new(VERDICT))
            .evaluate_response(&question(&[]), &baseline, &enhanced)
            .await;

        assert!((score.alignment - (0.4 * 2.5 + 0.6 * 4.0)).abs() < 1e-9);
        assert!((score.consistency - (0.4 * 3.0 + 0.6 * 5.0)).abs() < 1e-9);
        assert!((score.relevance - (0.4 * 5.0 + 0.6 * 3.0)).abs() < 1e-9);
        assert_eq!(score.confidence, 0.9);
        assert!(score.reasoning.starts_with("Algorithmic:"));
        assert!(score.reasoning.ends_with("AI judge: Matches the direct tone."));
    }

    #[tokio::test]
    async fn test_zero_verdict_still_blends() {
        let (baseline, enhanced) = results();
        let q = question(&["direct"]);
        let zero = r#"{"alignment": 0, "consistency": 0, "relevance": 0, "confidence": 0.5, "reasoning": "No better."}"#;

        let score = evaluator(MockJudge::new(zero))
            .evaluate_response(&q, &baseline, &enhanced)
            .await;
        let heuristic = algorithmic_score(&q, &baseline, &enhanced);

        assert!((score.alignment - 0.4 * heuristic.alignment).abs() < 1e-9);
        assert!((score.consistency - 0.4 * heuristic.consistency).abs() < 1e-9);
        assert!((score.relevance - 0.4 * heuristic.relevance).abs() < 1e-9);
        assert!(score.alignment > 0.0);
        assert_eq!(score.confidence, 0.7);
        assert!(score.reasoning.ends_with("AI judge: No better."));
    }

    #[tokio::test]
    async fn test_judge_failure_equals_algorithmic_only() {
        let (baseline, enhanced) = results();
        let q = question(&["direct"]);

        let failed = evaluator(MockJudge::failing("503 from judge"))
            .evaluate_response(&q, &baseline, &enhanced)
            .await;
        let heuristic = algorithmic_score(&q, &baseline, &enhanced);

        assert_eq!(failed.alignment, heuristic.alignment);
        assert_eq!(failed.consistency, heuristic.consistency);
        assert_eq!(failed.relevance, heuristic.relevance);
        assert_eq!(failed.confidence, heuristic.confidence);
        assert_eq!(failed.consistency, 0.0);
        assert!(failed.reasoning.contains("503 from judge"));
    }

    #[tokio::test]
    async fn test_unparseable_verdict_degrades_silently() {
        let (baseline, enhanced) = results();
        let q = question(&[]);

        let score = evaluator(MockJudge::new("Looks better to me."))
            .evaluate_response(&q, &baseline, &enhanced)
            .await;

        assert_eq!(score.reasoning, algorithmic_score(&q, &baseline, &enhanced).reasoning);
    }

    #[tokio::test]
    async fn test_mismatched_pair_falls_back() {
        let (baseline, mut enhanced) = results();
        enhanced.model = "gpt-4o-mini".to_string();

        let score = evaluator(MockJudge::new(VERDICT))
            .evaluate_response(&question(&[]), &baseline, &enhanced)
            .await;

        assert_eq!(score.alignment, 2.5);
        assert_eq!(score.confidence, 0.1);
        assert!(score.reasoning.contains("do not belong"));
    }

    #[tokio::test]
    async fn test_scores_stay_in_range() {
        let (baseline, enhanced) = results();
        let extreme = r#"{"alignment": 99, "consistency": 99, "relevance": 99, "confidence": 99}"#;

        let score = evaluator(MockJudge::new(extreme))
            .evaluate_response(&question(&["technical", "practical"]), &baseline, &enhanced)
            .await;

        for axis in [score.alignment, score.consistency, score.relevance] {
            assert!((0.0..=5.0).contains(&axis));
        }
        assert!((0.0..=1.0).contains(&score.confidence));
    }
}
