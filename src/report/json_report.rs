//! @ai:module:intent Timestamped JSON persistence and reload of benchmark reports
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReporterTrait, report_file_name
//! @ai:module:stateless true

use crate::metrics::BenchmarkReport;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// @ai:intent Trait for JSON report persistence
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write the report to an explicit file path
    fn generate(&self, report: &BenchmarkReport, output_path: &Path) -> Result<()>;

    /// @ai:intent Write the report under a generated name inside a results directory
    fn save(&self, report: &BenchmarkReport, results_dir: &Path) -> Result<PathBuf>;

    /// @ai:intent Read a previously written report
    fn load(&self, path: &Path) -> Result<BenchmarkReport>;
}

/// @ai:intent Lowercase a suite name into a filename-safe slug
/// @ai:effects pure
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "suite".to_string()
    } else {
        slug.to_string()
    }
}

/// @ai:intent Build `pvs-benchmark-<slug>-<YYYY-MM-DD_HH-MM-SS>.json`
/// @ai:effects pure
pub fn report_file_name(suite_name: &str, at: chrono::DateTime<chrono::Local>) -> String {
    format!(
        "pvs-benchmark-{}-{}.json",
        slugify(suite_name),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// @ai:intent Writes and reads benchmark reports as pretty-printed JSON
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Write the report, creating parent directories as needed
    /// @ai:effects fs:write
    fn generate(&self, report: &BenchmarkReport, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
        Ok(())
    }

    /// @ai:effects fs:write
    fn save(&self, report: &BenchmarkReport, results_dir: &Path) -> Result<PathBuf> {
        let path = results_dir.join(report_file_name(&report.suite_name, chrono::Local::now()));
        self.generate(report, &path)?;
        Ok(path)
    }

    /// @ai:effects fs:read
    fn load(&self, path: &Path) -> Result<BenchmarkReport> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        let report = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report {}", path.display()))?;
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::metrics::{
        AxisAverages, BenchmarkReport, BenchmarkResult, BenchmarkScore, DetailedScore, GroupStats,
        ReportSummary,
    };
    use crate::suite::QuestionCategory;

    pub fn sample_report() -> BenchmarkReport {
        let mut baseline = BenchmarkResult::success("tech-1", "openai", "gpt-4o", false, "Use GIN.".to_string(), 900);
        baseline.total_input_tokens = Some(7);
        let mut enhanced = BenchmarkResult::success(
            "tech-1",
            "openai",
            "gpt-4o",
            true,
            "Use a GIN index with jsonb_path_ops.".to_string(),
            850,
        );
        enhanced.system_prompt_tokens = Some(120);
        enhanced.total_input_tokens = Some(127);
        let failed = BenchmarkResult::failure("advice-1", "anthropic", "claude-3-5-haiku-latest", true, "HTTP 529: overloaded".to_string());

        let averages = AxisAverages {
            alignment: 3.7,
            consistency: 4.1,
            relevance: 4.55,
            confidence: 0.85,
        };

        BenchmarkReport {
            suite_name: "Core Questions".to_string(),
            profile_owner: "Ada Lovelace".to_string(),
            timestamp: "2026-10-19T09:30:00+00:00".to_string(),
            total_questions: 2,
            total_models: 2,
            total_results: 3,
            failed_results: 1,
            results: vec![baseline, enhanced, failed],
            scores: vec![BenchmarkScore {
                question_id: "tech-1".to_string(),
                provider: "openai".to_string(),
                model: "gpt-4o".to_string(),
                category: QuestionCategory::Technical,
                scores: DetailedScore {
                    alignment: 3.7,
                    consistency: 4.1,
                    relevance: 4.55,
                    confidence: 0.85,
                    reasoning: "Algorithmic: longer. AI judge: Tailored to Rust.".to_string(),
                },
                improvement: 12.34,
            }],
            summary: ReportSummary {
                average_improvement: 12.34,
                best_provider: "openai".to_string(),
                most_improved_category: "technical".to_string(),
                total_execution_time_ms: 4_200,
                average_scores: averages,
                by_provider: vec![GroupStats {
                    name: "openai".to_string(),
                    count: 1,
                    average_improvement: 12.34,
                    average_scores: averages,
                }],
                by_category: vec![GroupStats {
                    name: "technical".to_string(),
                    count: 1,
                    average_improvement: 12.34,
                    average_scores: averages,
                }],
            },
        }
    }
}
