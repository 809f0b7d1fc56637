//! @ai:module:intent Markdown summary of a benchmark report
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{BenchmarkReport, GroupStats};
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Render the report as Markdown
    fn render(&self, report: &BenchmarkReport) -> String;

    /// @ai:intent Render and write the report to a file
    fn generate(&self, report: &BenchmarkReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown summaries from benchmark reports
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format a percentage with explicit sign
    /// @ai:effects pure
    fn format_delta(value: f64) -> String {
        if value >= 0.0 {
            format!("+{:.2}%", value)
        } else {
            format!("{:.2}%", value)
        }
    }

    /// Keeps table cells on one line
    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    /// @ai:intent Header and headline figures
    /// @ai:effects pure
    fn generate_summary(report: &BenchmarkReport) -> String {
        let mut output = String::new();
        let summary = &report.summary;

        writeln!(output, "# PVS Benchmark Results").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Suite:** {}", report.suite_name).unwrap();
        writeln!(output, "**Profile:** {}", report.profile_owner).unwrap();
        writeln!(output, "**Date:** {}", report.timestamp).unwrap();
        writeln!(
            output,
            "**Queries:** {} questions x {} models, {} results ({} failed)",
            report.total_questions, report.total_models, report.total_results, report.failed_results
        )
        .unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Summary").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(
            output,
            "| Average Improvement | {} |",
            Self::format_delta(summary.average_improvement)
        )
        .unwrap();
        writeln!(output, "| Best Provider | {} |", summary.best_provider).unwrap();
        writeln!(output, "| Most Improved Category | {} |", summary.most_improved_category).unwrap();
        writeln!(output, "| Alignment | {:.2} |", summary.average_scores.alignment).unwrap();
        writeln!(output, "| Consistency | {:.2} |", summary.average_scores.consistency).unwrap();
        writeln!(output, "| Relevance | {:.2} |", summary.average_scores.relevance).unwrap();
        writeln!(output, "| Confidence | {:.2} |", summary.average_scores.confidence).unwrap();
        writeln!(
            output,
            "| Execution Time | {:.1}s |",
            summary.total_execution_time_ms as f64 / 1000.0
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Table of per-group statistics
    /// @ai:effects pure
    fn generate_group_section(title: &str, label: &str, groups: &[GroupStats]) -> String {
        let mut output = String::new();

        writeln!(output, "## {}", title).unwrap();
        writeln!(output).unwrap();

        if groups.is_empty() {
            writeln!(output, "_No scored pairs._").unwrap();
            writeln!(output).unwrap();
            return output;
        }

        writeln!(
            output,
            "| {} | Pairs | Improvement | Alignment | Consistency | Relevance |",
            label
        )
        .unwrap();
        writeln!(output, "|---|-------|-------------|-----------|-------------|-----------|").unwrap();

        for group in groups {
            writeln!(
                output,
                "| {} | {} | {} | {:.2} | {:.2} | {:.2} |",
                group.name,
                group.count,
                Self::format_delta(group.average_improvement),
                group.average_scores.alignment,
                group.average_scores.consistency,
                group.average_scores.relevance
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent One row per scored pair
    /// @ai:effects pure
    fn generate_scores_table(report: &BenchmarkReport) -> String {
        let mut output = String::new();

        writeln!(output, "## Scores").unwrap();
        writeln!(output).unwrap();

        if report.scores.is_empty() {
            writeln!(output, "_No scored pairs._").unwrap();
            writeln!(output).unwrap();
            return output;
        }

        writeln!(
            output,
            "| Question | Provider | Model | Category | Alignment | Consistency | Relevance | Confidence | Overall | Improvement |"
        )
        .unwrap();
        writeln!(
            output,
            "|----------|----------|-------|----------|-----------|-------------|-----------|------------|---------|-------------|"
        )
        .unwrap();

        for score in &report.scores {
            writeln!(
                output,
                "| {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {} |",
                score.question_id,
                score.provider,
                score.model,
                score.category,
                score.scores.alignment,
                score.scores.consistency,
                score.scores.relevance,
                score.scores.confidence,
                score.scores.overall(),
                Self::format_delta(score.improvement)
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "### Reasoning").unwrap();
        writeln!(output).unwrap();
        for score in &report.scores {
            writeln!(
                output,
                "- **{}** ({}/{}): {}",
                score.question_id,
                score.provider,
                score.model,
                Self::cell(&score.scores.reasoning)
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent List queries that errored
    /// @ai:effects pure
    fn generate_failures_section(report: &BenchmarkReport) -> String {
        let mut output = String::new();
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_error()).collect();

        if failures.is_empty() {
            return output;
        }

        writeln!(output, "## Failed Queries").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Question | Provider | Model | Mode | Error |").unwrap();
        writeln!(output, "|----------|----------|-------|------|-------|").unwrap();

        for result in failures {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                result.question_id,
                result.provider,
                result.model,
                if result.with_pvs { "enhanced" } else { "baseline" },
                Self::cell(result.error.as_deref().unwrap_or_default())
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:effects pure
    fn render(&self, report: &BenchmarkReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::generate_summary(report));
        output.push_str(&Self::generate_group_section(
            "Results by Provider",
            "Provider",
            &report.summary.by_provider,
        ));
        output.push_str(&Self::generate_group_section(
            "Results by Category",
            "Category",
            &report.summary.by_category,
        ));
        output.push_str(&Self::generate_scores_table(report));
        output.push_str(&Self::generate_failures_section(report));

        output
    }

    /// @ai:effects fs:write
    fn generate(&self, report: &BenchmarkReport, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.render(report))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::json_report::fixtures::sample_report;
    use tempfile::TempDir;

    #[test]
    fn test_format_delta() {
        assert_eq!(MarkdownReporter::format_delta(12.346), "+12.35%");
        assert_eq!(MarkdownReporter::format_delta(0.0), "+0.00%");
        assert_eq!(MarkdownReporter::format_delta(-3.1), "-3.10%");
    }

    #[test]
    fn test_render_sections() {
        let markdown = MarkdownReporter::new().render(&sample_report());

        assert!(markdown.starts_with("# PVS Benchmark Results"));
        assert!(markdown.contains("**Suite:** Core Questions"));
        assert!(markdown.contains("| Average Improvement | +12.34% |"));
        assert!(markdown.contains("| Best Provider | openai |"));
        assert!(markdown.contains("## Results by Provider"));
        assert!(markdown.contains("| openai | 1 | +12.34% | 3.70 | 4.10 | 4.55 |"));
        assert!(markdown.contains("| tech-1 | openai | gpt-4o | technical | 3.70 | 4.10 | 4.55 | 0.85 | 4.12 |"));
        assert!(markdown.contains("## Failed Queries"));
        assert!(markdown.contains("| advice-1 | anthropic | claude-3-5-haiku-latest | enhanced | HTTP 529: overloaded |"));
    }

    #[test]
    fn test_render_without_scores() {
        let mut report = sample_report();
        report.scores.clear();
        report.summary.by_provider.clear();
        report.results.retain(|r| !r.is_error());

        let markdown = MarkdownReporter::new().render(&report);

        assert!(markdown.contains("_No scored pairs._"));
        assert!(!markdown.contains("## Failed Queries"));
    }

    #[test]
    fn test_generate_writes_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("report.md");

        MarkdownReporter::new().generate(&sample_report(), &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("## Scores"));
    }
}
