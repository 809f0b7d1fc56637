//! @ai:module:intent Pair grouping, improvement metric and summary statistics
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait, ResultPair, pair_results
//! @ai:module:stateless true

use crate::config::ImprovementWeights;
use crate::metrics::types::{AxisAverages, BenchmarkResult, BenchmarkScore, GroupStats, ReportSummary};
use std::collections::HashMap;
use std::hash::Hash;

pub const DEFAULT_BEST_PROVIDER: &str = "none";
pub const DEFAULT_MOST_IMPROVED_CATEGORY: &str = "technical";

/// @ai:intent Trait for turning raw results and scores into report figures
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Weighted cost-efficiency gain of the enhanced result over the baseline
    fn improvement(&self, baseline: &BenchmarkResult, enhanced: &BenchmarkResult) -> f64;

    /// @ai:intent Summary statistics over every score of a run
    fn summarize(&self, scores: &[BenchmarkScore], total_execution_time_ms: u64) -> ReportSummary;
}

/// @ai:intent Baseline and enhanced result for the same question, provider and model
#[derive(Debug, Clone, Copy)]
pub struct ResultPair<'a> {
    pub baseline: &'a BenchmarkResult,
    pub enhanced: &'a BenchmarkResult,
}

/// @ai:intent Group results into scorable pairs
/// @ai:post a group yields a pair only with exactly one baseline and one enhanced result, neither errored
/// @ai:post pairs keep the order in which their key first appeared
/// @ai:effects pure
pub fn pair_results(results: &[BenchmarkResult]) -> Vec<ResultPair<'_>> {
    group_ordered(results, BenchmarkResult::pair_key)
        .into_iter()
        .filter_map(|(_, members)| {
            let (enhanced, baseline): (Vec<_>, Vec<_>) =
                members.into_iter().partition(|r| r.with_pvs);

            match (baseline.as_slice(), enhanced.as_slice()) {
                ([baseline], [enhanced]) if !baseline.is_error() && !enhanced.is_error() => {
                    Some(ResultPair {
                        baseline: *baseline,
                        enhanced: *enhanced,
                    })
                }
                _ => None,
            }
        })
        .collect()
}

/// @ai:intent Percentage reduction from baseline to enhanced
/// @ai:post 0 when the baseline value is 0
/// @ai:effects pure
/// @ai:intent Bucket items by key, buckets ordered by the key's first appearance
/// @ai:effects pure
fn group_ordered<'a, T, K, F>(items: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Copy,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                index.insert(k, groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

fn percent_reduction(baseline: f64, enhanced: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        (baseline - enhanced) / baseline * 100.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn axis_averages(scores: &[&BenchmarkScore]) -> AxisAverages {
    AxisAverages {
        alignment: mean(scores.iter().map(|s| s.scores.alignment)),
        consistency: mean(scores.iter().map(|s| s.scores.consistency)),
        relevance: mean(scores.iter().map(|s| s.scores.relevance)),
        confidence: mean(scores.iter().map(|s| s.scores.confidence)),
    }
}

/// @ai:intent Group scores by a key in first-appearance order
/// @ai:effects pure
fn group_stats<'a, F>(scores: &'a [BenchmarkScore], key: F) -> Vec<GroupStats>
where
    F: Fn(&'a BenchmarkScore) -> &'a str,
{
    group_ordered(scores, key)
        .into_iter()
        .map(|(name, members)| GroupStats {
            name: name.to_string(),
            count: members.len(),
            average_improvement: round2(mean(members.iter().map(|s| s.improvement))),
            average_scores: axis_averages(&members),
        })
        .collect()
}

/// @ai:intent Name of the group with the highest mean improvement; earliest wins ties
/// @ai:effects pure
fn best_group(groups: &[GroupStats]) -> Option<&str> {
    let mut best: Option<&GroupStats> = None;

    for group in groups {
        if best.map_or(true, |b| group.average_improvement > b.average_improvement) {
            best = Some(group);
        }
    }

    best.map(|g| g.name.as_str())
}

/// @ai:intent Computes improvement metrics and report summaries
pub struct MetricsAggregator {
    weights: ImprovementWeights,
}

impl MetricsAggregator {
    /// @ai:intent Create an aggregator with the given improvement weights
    /// @ai:effects pure
    pub fn new(weights: ImprovementWeights) -> Self {
        Self { weights }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new(ImprovementWeights::default())
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:post rounded to two decimals; exactly 0 for identical timing, tokens and length
    /// @ai:effects pure
    fn improvement(&self, baseline: &BenchmarkResult, enhanced: &BenchmarkResult) -> f64 {
        let time = percent_reduction(
            baseline.response_time_ms as f64,
            enhanced.response_time_ms as f64,
        );
        let tokens = percent_reduction(
            baseline.response_tokens as f64,
            enhanced.response_tokens as f64,
        );
        let length = percent_reduction(
            baseline.response_length as f64,
            enhanced.response_length as f64,
        );

        round2(self.weights.time * time + self.weights.token * tokens + self.weights.length * length)
    }

    /// @ai:effects pure
    fn summarize(&self, scores: &[BenchmarkScore], total_execution_time_ms: u64) -> ReportSummary {
        let by_provider = group_stats(scores, |s| s.provider.as_str());
        let by_category = group_stats(scores, |s| s.category.as_str());
        let all: Vec<&BenchmarkScore> = scores.iter().collect();

        ReportSummary {
            average_improvement: round2(mean(scores.iter().map(|s| s.improvement))),
            best_provider: best_group(&by_provider)
                .unwrap_or(DEFAULT_BEST_PROVIDER)
                .to_string(),
            most_improved_category: best_group(&by_category)
                .unwrap_or(DEFAULT_MOST_IMPROVED_CATEGORY)
                .to_string(),
            total_execution_time_ms,
            average_scores: axis_averages(&all),
            by_provider,
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::DetailedScore;
    use crate::suite::QuestionCategory;

    fn result(id: &str, provider: &str, with_pvs: bool, length: usize, tokens: u32, ms: u64) -> BenchmarkResult {
        let mut r = BenchmarkResult::success(id, provider, "m", with_pvs, "x".repeat(length), ms);
        r.response_tokens = tokens;
        r
    }

    fn score(provider: &str, category: QuestionCategory, improvement: f64) -> BenchmarkScore {
        BenchmarkScore {
            question_id: "q".to_string(),
            provider: provider.to_string(),
            model: "m".to_string(),
            category,
            scores: DetailedScore {
                alignment: 3.0,
                consistency: 3.0,
                relevance: 4.0,
                confidence: 0.7,
                reasoning: String::new(),
            },
            improvement,
        }
    }

    #[test]
    fn test_identical_results_have_zero_improvement() {
        let baseline = result("q1", "openai", false, 300, 86, 1200);
        let enhanced = result("q1", "openai", true, 300, 86, 1200);

        assert_eq!(MetricsAggregator::default().improvement(&baseline, &enhanced), 0.0);
    }

    #[test]
    fn test_improvement_blends_weighted_ratios() {
        // time 50%, tokens 50%, length 50%
        let baseline = result("q1", "openai", false, 400, 100, 2000);
        let enhanced = result("q1", "openai", true, 200, 50, 1000);
        assert_eq!(MetricsAggregator::default().improvement(&baseline, &enhanced), 50.0);

        // slower, longer answer
        let baseline = result("q1", "openai", false, 105, 25, 1500);
        let enhanced = result("q1", "openai", true, 687, 156, 2300);
        // 0.5*-53.333 + 0.35*-524 + 0.15*-554.2857
        assert_eq!(MetricsAggregator::default().improvement(&baseline, &enhanced), -293.21);
    }

    #[test]
    fn test_zero_baseline_terms_contribute_nothing() {
        let baseline = result("q1", "openai", false, 0, 0, 0);
        let enhanced = result("q1", "openai", true, 500, 140, 900);

        assert_eq!(MetricsAggregator::default().improvement(&baseline, &enhanced), 0.0);
    }

    #[test]
    fn test_custom_weights() {
        let aggregator = MetricsAggregator::new(ImprovementWeights {
            time: 1.0,
            token: 0.0,
            length: 0.0,
        });
        let baseline = result("q1", "openai", false, 10, 10, 1000);
        let enhanced = result("q1", "openai", true, 99, 99, 750);

        assert_eq!(aggregator.improvement(&baseline, &enhanced), 25.0);
    }

    #[test]
    fn test_pairs_require_one_clean_result_per_side() {
        let mut failed = result("q2", "openai", true, 0, 0, 0);
        failed.error = Some("boom".to_string());

        let results = vec![
            result("q1", "openai", false, 10, 3, 10),
            result("q2", "openai", false, 10, 3, 10),
            result("q1", "openai", true, 20, 6, 12),
            failed,
            result("q3", "openai", false, 10, 3, 10),
            result("q1", "anthropic", false, 10, 3, 10),
            result("q1", "anthropic", true, 10, 3, 10),
            result("q4", "openai", false, 10, 3, 10),
            result("q4", "openai", true, 10, 3, 10),
            result("q4", "openai", true, 10, 3, 10),
        ];

        let pairs = pair_results(&results);
        let keys: Vec<_> = pairs.iter().map(|p| p.baseline.pair_key()).collect();

        assert_eq!(keys, vec![("q1", "openai", "m"), ("q1", "anthropic", "m")]);
        assert!(pairs.iter().all(|p| !p.baseline.with_pvs && p.enhanced.with_pvs));
    }

    #[test]
    fn test_pairs_follow_first_appearance_of_interleaved_keys() {
        let results = vec![
            result("q2", "openai", false, 10, 3, 10),
            result("q1", "openai", false, 10, 3, 10),
            result("q2", "anthropic", false, 10, 3, 10),
            result("q1", "openai", true, 10, 3, 10),
            result("q2", "anthropic", true, 10, 3, 10),
            result("q2", "openai", true, 10, 3, 10),
        ];

        let keys: Vec<_> = pair_results(&results)
            .iter()
            .map(|p| p.enhanced.pair_key())
            .collect();

        assert_eq!(
            keys,
            vec![("q2", "openai", "m"), ("q1", "openai", "m"), ("q2", "anthropic", "m")]
        );
    }

    #[test]
    fn test_group_improvement_is_rounded_like_overall() {
        let scores = vec![
            score("openai", QuestionCategory::Technical, 10.0),
            score("openai", QuestionCategory::Technical, 10.01),
            score("openai", QuestionCategory::Technical, 10.01),
        ];

        let summary = MetricsAggregator::default().summarize(&scores, 0);

        assert_eq!(summary.average_improvement, 10.01);
        assert_eq!(summary.by_provider[0].average_improvement, 10.01);
        assert_eq!(summary.by_category[0].average_improvement, 10.01);
    }

    #[test]
    fn test_summary_defaults_when_empty() {
        let summary = MetricsAggregator::default().summarize(&[], 42);

        assert_eq!(summary.average_improvement, 0.0);
        assert_eq!(summary.best_provider, "none");
        assert_eq!(summary.most_improved_category, "technical");
        assert_eq!(summary.total_execution_time_ms, 42);
        assert!(summary.by_provider.is_empty());
    }

    #[test]
    fn test_summary_picks_best_groups() {
        let scores = vec![
            score("openai", QuestionCategory::Technical, 10.0),
            score("anthropic", QuestionCategory::Advice, 30.0),
            score("openai", QuestionCategory::Advice, 20.0),
            score("gemini", QuestionCategory::Creative, -5.0),
        ];

        let summary = MetricsAggregator::default().summarize(&scores, 0);

        assert_eq!(summary.average_improvement, 13.75);
        assert_eq!(summary.best_provider, "anthropic");
        assert_eq!(summary.most_improved_category, "advice");
        assert_eq!(summary.by_provider.len(), 3);
        assert_eq!(summary.by_provider[0].name, "openai");
        assert_eq!(summary.by_provider[0].count, 2);
        assert_eq!(summary.by_provider[0].average_improvement, 15.0);
        assert_eq!(summary.average_scores.relevance, 4.0);
    }

    #[test]
    fn test_ties_keep_first_group() {
        let scores = vec![
            score("openai", QuestionCategory::Personal, 12.0),
            score("anthropic", QuestionCategory::Technical, 12.0),
        ];

        let summary = MetricsAggregator::default().summarize(&scores, 0);

        assert_eq!(summary.best_provider, "openai");
        assert_eq!(summary.most_improved_category, "personal");
    }
}
