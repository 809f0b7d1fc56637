//! @ai:module:intent PNG charts for benchmark reports
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait
//! @ai:module:stateless true

use crate::metrics::BenchmarkReport;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate every chart next to the report, returning the written file names
    fn generate_all(&self, report: &BenchmarkReport, output_dir: &Path, stem: &str) -> Result<Vec<String>>;
}

/// @ai:intent Mean improvement per provider, in report order
/// @ai:effects pure
fn improvement_bars(report: &BenchmarkReport) -> Vec<(String, f64)> {
    report
        .summary
        .by_provider
        .iter()
        .map(|g| (g.name.clone(), g.average_improvement))
        .collect()
}

/// @ai:intent Mean axis scores as labelled bars
/// @ai:effects pure
fn axis_bars(report: &BenchmarkReport) -> Vec<(&'static str, f64)> {
    let averages = &report.summary.average_scores;
    vec![
        ("Alignment", averages.alignment),
        ("Consistency", averages.consistency),
        ("Relevance", averages.relevance),
    ]
}

/// @ai:intent Symmetric y-range covering every value with some headroom
/// @ai:post the range always contains zero and is never empty
/// @ai:effects pure
fn value_range(values: &[f64]) -> (f64, f64) {
    let low = values.iter().copied().fold(0.0_f64, f64::min);
    let high = values.iter().copied().fold(0.0_f64, f64::max);

    if low == 0.0 && high == 0.0 {
        return (-10.0, 10.0);
    }

    let pad = (high - low) * 0.1;
    (low - pad, high + pad)
}

/// @ai:intent Generates charts from benchmark reports
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Bar chart of mean improvement per provider
    /// @ai:effects fs:write
    fn generate_improvement_chart(&self, report: &BenchmarkReport, output_path: &Path) -> Result<()> {
        let data = improvement_bars(report);
        let values: Vec<f64> = data.iter().map(|(_, v)| *v).collect();
        let (low, high) = value_range(&values);

        let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Improvement over Baseline by Provider", ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..data.len().max(1) as i32, low..high)?;

        chart
            .configure_mesh()
            .x_labels(data.len().max(1))
            .y_desc("Improvement (%)")
            .x_desc("Provider")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(data.iter().enumerate().map(|(i, (_, value))| {
            let color = if *value >= 0.0 { GREEN } else { RED };
            Rectangle::new([(i as i32, 0.0), (i as i32 + 1, *value)], color.mix(0.7).filled())
        }))?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Bar chart of mean quality axes on the 0-5 scale
    /// @ai:effects fs:write
    fn generate_scores_chart(&self, report: &BenchmarkReport, output_path: &Path) -> Result<()> {
        let data = axis_bars(report);

        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Mean Quality Scores", ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..data.len() as i32, 0f64..5f64)?;

        chart
            .configure_mesh()
            .x_labels(data.len())
            .y_desc("Score (0-5)")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, value))| {
                Rectangle::new([(i as i32, 0.0), (i as i32 + 1, *value)], BLUE.mix(0.7).filled())
            }))?
            .label("With profile")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.mix(0.7).filled()));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:effects fs:write
    fn generate_all(&self, report: &BenchmarkReport, output_dir: &Path, stem: &str) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        if !report.scores.is_empty() {
            let improvement = format!("{}-improvement.png", stem);
            self.generate_improvement_chart(report, &output_dir.join(&improvement))?;
            generated.push(improvement);

            let scores = format!("{}-scores.png", stem);
            self.generate_scores_chart(report, &output_dir.join(&scores))?;
            generated.push(scores);
        }

        Ok(generated)
    }
}
