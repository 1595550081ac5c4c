use crate::errors::{DatasetError, FineTuneError, FineTuneResult};
use crate::evaluation::MetricScores;
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

const BAR_WIDTH: usize = 40;
const BAR_GLYPHS: [char; 4] = ['█', '▓', '▒', '░'];

/// Scores of several models side by side: one row per model, one column per metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonTable {
    metrics: Vec<String>,
    rows: Vec<ModelScores>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelScores {
    pub model: String,
    pub scores: MetricScores,
}

impl ComparisonTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the row for `model`. Metric columns are the union of
    /// all rows, in order of first appearance.
    pub fn add(&mut self, model: impl Into<String>, scores: MetricScores) {
        for metric in scores.keys() {
            if !self.metrics.contains(metric) {
                self.metrics.push(metric.clone());
            }
        }

        let model = model.into();
        match self.rows.iter_mut().find(|row| row.model == model) {
            Some(row) => row.scores = scores,
            None => self.rows.push(ModelScores { model, scores }),
        }
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.model.as_str())
    }

    pub fn get(&self, model: &str, metric: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.model == model)
            .and_then(|row| row.scores.get(metric).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes a header of `model` plus every metric, then one record per model.
    /// Missing scores are left empty.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> FineTuneResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let csv_error = |e: csv::Error| FineTuneError::Serialization(e.to_string());

        let mut header = vec!["model"];
        header.extend(self.metrics.iter().map(String::as_str));
        csv_writer.write_record(&header).map_err(csv_error)?;

        for row in &self.rows {
            let mut record = vec![row.model.clone()];
            record.extend(self.metrics.iter().map(|metric| {
                row.scores
                    .get(metric)
                    .map(|score| score.to_string())
                    .unwrap_or_default()
            }));
            csv_writer.write_record(&record).map_err(csv_error)?;
        }

        csv_writer
            .flush()
            .map_err(|e| FineTuneError::Serialization(e.to_string()))
    }

    pub fn save_csv(&self, path: &Path) -> FineTuneResult<()> {
        let file = std::fs::File::create(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.write_csv(file)
    }

    /// Horizontal bars grouped by metric, one bar per model, each labelled with its score.
    pub fn render_bar_chart(&self) -> String {
        let model_width = self.models().map(str::len).max().unwrap_or(0);
        let mut out = String::new();

        for (index, row) in self.rows.iter().enumerate() {
            let glyph = BAR_GLYPHS[index % BAR_GLYPHS.len()];
            let _ = writeln!(out, "{} {}", glyph, row.model);
        }

        for metric in &self.metrics {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", metric);
            for (index, row) in self.rows.iter().enumerate() {
                let glyph = BAR_GLYPHS[index % BAR_GLYPHS.len()];
                match row.scores.get(metric) {
                    Some(&score) => {
                        let len = (score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
                        let bar: String = std::iter::repeat(glyph).take(len).collect();
                        let _ = writeln!(
                            out,
                            "  {:<width$} {} {:.2}",
                            row.model,
                            bar,
                            score,
                            width = model_width
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  {:<width$} n/a", row.model, width = model_width);
                    }
                }
            }
        }

        out
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model_width = self
            .models()
            .map(str::len)
            .chain(std::iter::once("model".len()))
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = self.metrics.iter().map(|m| m.len().max(6)).collect();

        write!(f, "{:<width$}", "model", width = model_width)?;
        for (metric, width) in self.metrics.iter().zip(&widths) {
            write!(f, "  {:>width$}", metric, width = width)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<width$}", row.model, width = model_width)?;
            for (metric, width) in self.metrics.iter().zip(&widths) {
                match row.scores.get(metric) {
                    Some(score) => write!(f, "  {:>width$.4}", score, width = width)?,
                    None => write!(f, "  {:>width$}", "-", width = width)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
