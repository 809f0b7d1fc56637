//! @ai:module:intent Report generation for benchmark runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{report_file_name, JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::BenchmarkReport;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    pub fn json(&self) -> &JsonReporter {
        &self.json
    }

    /// @ai:intent Persist the JSON report, to an explicit file or a generated name in the results directory
    /// @ai:effects fs:write
    pub fn save_json(
        &self,
        report: &BenchmarkReport,
        results_dir: &Path,
        output_file: Option<&Path>,
    ) -> Result<PathBuf> {
        match output_file {
            Some(path) => {
                self.json.generate(report, path)?;
                Ok(path.to_path_buf())
            }
            None => self.json.save(report, results_dir),
        }
    }

    /// @ai:intent Write the Markdown summary and charts next to a JSON report
    /// @ai:post chart failures are logged, never returned
    /// @ai:effects fs:write
    pub fn generate_companions(&self, report: &BenchmarkReport, json_path: &Path) -> Result<PathBuf> {
        let dir = json_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stem = json_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "report".to_string());

        let markdown_path = dir.join(format!("{}.md", stem));
        self.markdown.generate(report, &markdown_path)?;

        match self.charts.generate_all(report, dir, &stem) {
            Ok(files) if !files.is_empty() => {
                tracing::info!("Charts written: {}", files.join(", "))
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Chart generation failed: {:#}", e),
        }

        Ok(markdown_path)
    }

    /// @ai:intent Persist the JSON report and all companions
    /// @ai:effects fs:write
    pub fn generate_all(
        &self,
        report: &BenchmarkReport,
        results_dir: &Path,
        output_file: Option<&Path>,
    ) -> Result<PathBuf> {
        let json_path = self.save_json(report, results_dir, output_file)?;
        self.generate_companions(report, &json_path)?;

        tracing::info!("Report saved to {}", json_path.display());
        Ok(json_path)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
