//! @ai:module:intent Run every question against every model with and without the profile, then score
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkRunner
//! @ai:module:stateless false

use crate::evaluator::{Judge, ResponseEvaluator};
use crate::metrics::{
    pair_results, BenchmarkReport, BenchmarkResult, BenchmarkScore, MetricsAggregator,
    MetricsAggregatorTrait,
};
use crate::profile::Profile;
use crate::runner::client::ProviderAdapter;
use crate::suite::{BenchmarkQuestion, QuestionSuite};
use crate::tokens::estimate;
use std::time::Instant;

/// @ai:intent Drives baseline and enhanced queries, evaluation and aggregation
/// @ai:invariant queries and judge calls run one at a time, in model then question order
pub struct BenchmarkRunner<A: ProviderAdapter, J: Judge> {
    adapters: Vec<A>,
    evaluator: ResponseEvaluator<J>,
    aggregator: MetricsAggregator,
    profile: Profile,
    addendum: Option<String>,
}

impl<A: ProviderAdapter, J: Judge> BenchmarkRunner<A, J> {
    /// @ai:intent Create a runner over the given adapters
    /// @ai:effects pure
    pub fn new(
        adapters: Vec<A>,
        evaluator: ResponseEvaluator<J>,
        aggregator: MetricsAggregator,
        profile: Profile,
        addendum: Option<String>,
    ) -> Self {
        Self {
            adapters,
            evaluator,
            aggregator,
            profile,
            addendum,
        }
    }

    pub fn adapters(&self) -> &[A] {
        &self.adapters
    }

    /// @ai:intent Ask one question of one model, recording failures instead of propagating them
    /// @ai:post enhanced results carry system-prompt and total-input token estimates
    /// @ai:effects network
    async fn execute_query(
        &self,
        adapter: &A,
        question: &BenchmarkQuestion,
        with_pvs: bool,
    ) -> BenchmarkResult {
        let provider = adapter.provider();
        let user_prompt = question.user_prompt();
        let system = with_pvs.then(|| adapter.inject(&self.profile, self.addendum.as_deref()));

        adapter.ready().await;
        let start = Instant::now();
        let outcome = adapter.query(&user_prompt, system.as_deref()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                let mut result = BenchmarkResult::success(
                    &question.id,
                    provider.as_str(),
                    adapter.model(),
                    with_pvs,
                    response,
                    elapsed_ms,
                );

                let query_tokens = estimate(&user_prompt);
                match system.as_deref().map(estimate) {
                    Some(system_tokens) => {
                        result.system_prompt_tokens = Some(system_tokens);
                        result.total_input_tokens = Some(system_tokens + query_tokens);
                    }
                    None => result.total_input_tokens = Some(query_tokens),
                }

                result
            }
            Err(e) => {
                tracing::warn!(
                    "Query failed for {} ({}/{}, with_pvs={}): {:#}",
                    question.id,
                    provider,
                    adapter.model(),
                    with_pvs,
                    e
                );
                BenchmarkResult::failure(
                    &question.id,
                    provider.as_str(),
                    adapter.model(),
                    with_pvs,
                    format!("{:#}", e),
                )
            }
        }
    }

    /// @ai:intent Run baseline then enhanced queries for every model and question
    /// @ai:effects network
    pub async fn execute_all(&self, suite: &QuestionSuite) -> Vec<BenchmarkResult> {
        let total = self.adapters.len() * suite.questions.len();
        let mut results = Vec::with_capacity(total * 2);
        let mut current = 0;

        for adapter in &self.adapters {
            for question in &suite.questions {
                current += 1;
                tracing::info!(
                    "[{}/{}] Running question {} ({}/{})",
                    current,
                    total,
                    question.id,
                    adapter.provider(),
                    adapter.model()
                );

                results.push(self.execute_query(adapter, question, false).await);
                results.push(self.execute_query(adapter, question, true).await);
            }
        }

        results
    }

    /// @ai:intent Evaluate every eligible pair and attach its improvement metric
    /// @ai:post one score per (question, provider, model) with a clean baseline and enhanced result
    /// @ai:effects network
    pub async fn score_results(
        &self,
        suite: &QuestionSuite,
        results: &[BenchmarkResult],
    ) -> Vec<BenchmarkScore> {
        let pairs = pair_results(results);
        let mut scores = Vec::with_capacity(pairs.len());

        for (index, pair) in pairs.iter().enumerate() {
            let Some(question) = suite.question(&pair.baseline.question_id) else {
                tracing::warn!(
                    "Skipping results for unknown question {}",
                    pair.baseline.question_id
                );
                continue;
            };

            tracing::info!(
                "[{}/{}] Evaluating {} ({}/{})",
                index + 1,
                pairs.len(),
                question.id,
                pair.baseline.provider,
                pair.baseline.model
            );

            let detailed = self
                .evaluator
                .evaluate_response(question, pair.baseline, pair.enhanced)
                .await;

            scores.push(BenchmarkScore {
                question_id: question.id.clone(),
                provider: pair.baseline.provider.clone(),
                model: pair.baseline.model.clone(),
                category: question.category,
                scores: detailed,
                improvement: self.aggregator.improvement(pair.baseline, pair.enhanced),
            });
        }

        scores
    }

    /// @ai:intent Run the whole benchmark and assemble the report
    /// @ai:effects network
    pub async fn run_benchmark(&self, suite: &QuestionSuite) -> BenchmarkReport {
        let start = Instant::now();

        let results = self.execute_all(suite).await;
        let scores = self.score_results(suite, &results).await;

        let total_execution_time_ms = start.elapsed().as_millis() as u64;
        let summary = self.aggregator.summarize(&scores, total_execution_time_ms);
        let failed_results = results.iter().filter(|r| r.is_error()).count();

        tracing::info!(
            "Completed {} queries ({} failed), {} scored pairs in {} ms",
            results.len(),
            failed_results,
            scores.len(),
            total_execution_time_ms
        );

        BenchmarkReport {
            suite_name: suite.name.clone(),
            profile_owner: self.profile.owner_id().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_questions: suite.questions.len(),
            total_models: self.adapters.len(),
            total_results: results.len(),
            failed_results,
            results,
            scores,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeightsConfig;
    use crate::evaluator::MockJudge;
    use crate::profile::build_system_prompt;
    use crate::profile::types::fixtures::sample_profile;
    use crate::runner::client::{MockAdapter, MockReply};
    use crate::suite::QuestionCategory;
    use std::time::Duration;

    const VERDICT: &str = r#"{"alignment": 4, "consistency": 4, "relevance": 4, "confidence": 0.8, "reasoning": "Tailored."}"#;

    fn suite() -> QuestionSuite {
        QuestionSuite {
            name: "core".to_string(),
            description: String::new(),
            questions: vec![
                BenchmarkQuestion {
                    id: "tech-1".to_string(),
                    category: QuestionCategory::Technical,
                    prompt: "How do I shard Postgres?".to_string(),
                    expected_style: vec!["direct".to_string()],
                    context: None,
                },
                BenchmarkQuestion {
                    id: "advice-1".to_string(),
                    category: QuestionCategory::Advice,
                    prompt: "Should I change teams?".to_string(),
                    expected_style: vec![],
                    context: Some("I have been on my team for four years".to_string()),
                },
            ],
            pvs_path: None,
        }
    }

    fn runner<J: Judge>(adapters: Vec<MockAdapter>, judge: J) -> BenchmarkRunner<MockAdapter, J> {
        let profile = sample_profile();
        BenchmarkRunner::new(
            adapters,
            ResponseEvaluator::new(judge, profile.clone(), &WeightsConfig::default()),
            MetricsAggregator::default(),
            profile,
            None,
        )
    }

    #[tokio::test]
    async fn test_runs_baseline_then_enhanced() {
        let runner = runner(vec![MockAdapter::new("m1")], MockJudge::new(VERDICT));
        let report = runner.run_benchmark(&suite()).await;

        assert_eq!(report.suite_name, "core");
        assert_eq!(report.profile_owner, sample_profile().owner_id());
        assert_eq!(report.total_questions, 2);
        assert_eq!(report.total_models, 1);
        assert_eq!(report.total_results, 4);
        assert_eq!(report.failed_results, 0);
        assert_eq!(report.scores.len(), 2);

        let flags: Vec<_> = report.results.iter().map(|r| (r.question_id.as_str(), r.with_pvs)).collect();
        assert_eq!(
            flags,
            vec![("tech-1", false), ("tech-1", true), ("advice-1", false), ("advice-1", true)]
        );

        let systems = runner.adapters()[0].received_systems();
        let expected = build_system_prompt(&sample_profile(), None);
        assert_eq!(systems, vec![None, Some(expected.clone()), None, Some(expected.clone())]);

        let enhanced = &report.results[1];
        assert_eq!(enhanced.system_prompt_tokens, Some(estimate(&expected)));
        assert_eq!(
            enhanced.total_input_tokens,
            Some(estimate(&expected) + estimate("How do I shard Postgres?"))
        );
        assert_eq!(report.results[0].system_prompt_tokens, None);
    }

    #[tokio::test]
    async fn test_failed_enhanced_query_is_kept_but_not_scored() {
        let adapter = MockAdapter::new("m1").with_enhanced(MockReply::Failure("rate limited".to_string()));
        let report = runner(vec![adapter], MockJudge::new(VERDICT))
            .run_benchmark(&suite())
            .await;

        assert_eq!(report.total_results, 4);
        assert_eq!(report.failed_results, 2);
        assert!(report.scores.is_empty());
        assert_eq!(report.results[1].error.as_deref(), Some("rate limited"));
        assert_eq!(report.results[1].response_length, 0);
        assert_eq!(report.summary.best_provider, "none");
        assert_eq!(report.summary.most_improved_category, "technical");
    }

    #[tokio::test]
    async fn test_scores_each_model_separately() {
        let adapters = vec![MockAdapter::new("m1"), MockAdapter::new("m2")];
        let report = runner(adapters, MockJudge::new(VERDICT)).run_benchmark(&suite()).await;

        assert_eq!(report.total_results, 8);
        let keys: Vec<_> = report
            .scores
            .iter()
            .map(|s| (s.question_id.as_str(), s.model.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("tech-1", "m1"), ("advice-1", "m1"), ("tech-1", "m2"), ("advice-1", "m2")]
        );
        assert_eq!(report.summary.by_provider.len(), 1);
        assert_eq!(report.summary.by_provider[0].count, 4);
    }

    #[tokio::test]
    async fn test_judge_failure_still_scores_pairs() {
        let report = runner(vec![MockAdapter::new("m1")], MockJudge::failing("judge offline"))
            .run_benchmark(&suite())
            .await;

        assert_eq!(report.scores.len(), 2);
        for score in &report.scores {
            assert_eq!(score.scores.confidence, 0.7);
            assert!(score.scores.reasoning.contains("judge offline"));
        }
    }

    #[tokio::test]
    async fn test_pacing_wait_is_not_measured_as_latency() {
        let adapter = MockAdapter::new("m1").with_pacing(Duration::from_millis(150));
        let runner = runner(vec![adapter], MockJudge::new(VERDICT));
        let suite = suite();
        let question = &suite.questions[0];

        let start = Instant::now();
        let result = runner.execute_query(&runner.adapters()[0], question, false).await;

        assert!(start.elapsed() >= Duration::from_millis(150));
        assert!(!result.is_error());
        assert!(result.response_time_ms < 100, "measured {}ms", result.response_time_ms);
    }

    #[tokio::test]
    async fn test_addendum_reaches_enhanced_query() {
        let profile = sample_profile();
        let runner = BenchmarkRunner::new(
            vec![MockAdapter::new("m1")],
            ResponseEvaluator::<MockJudge>::algorithmic_only(profile.clone()),
            MetricsAggregator::default(),
            profile,
            Some("Answer in French.".to_string()),
        );

        runner.execute_all(&suite()).await;

        let systems = runner.adapters()[0].received_systems();
        assert!(systems[1]
            .as_deref()
            .is_some_and(|s| s.ends_with("ADDITIONAL INSTRUCTIONS:\nAnswer in French.")));
    }
}
