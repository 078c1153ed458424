//! Evaluation result reporting
//!
//! Structures for representing, formatting, and saving evaluation results.

use crate::error::{EvalError, Result};
use crate::metrics::Metric;
use crate::schema::EvaluationInput;
use crate::scoring;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

/// Leading columns of the results file, before the metric columns.
pub const INPUT_COLUMNS: [&str; 4] = ["question", "contexts", "answer", "ground_truth"];

/// One evaluated sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSample {
    pub input: EvaluationInput,
    /// Score per metric; `None` when not computable
    pub scores: BTreeMap<Metric, Option<f64>>,
}

impl ScoredSample {
    pub fn score(&self, metric: Metric) -> Option<f64> {
        self.scores.get(&metric).copied().flatten()
    }
}

/// Result table of one evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Metric columns, in output order
    pub metrics: Vec<Metric>,
    /// One row per input, in input order
    pub rows: Vec<ScoredSample>,
    /// When the evaluation started
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// When the evaluation completed
    pub completed_at: chrono::DateTime<chrono::Utc>,
    /// The rows were scored by the default models after the supplied ones failed
    pub used_fallback: bool,
}

/// Per-category averages
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub samples: usize,
    pub averages: Vec<(Metric, Option<f64>)>,
}

impl EvaluationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Wall-clock time the run took.
    pub fn duration(&self) -> std::time::Duration {
        (self.completed_at - self.started_at).to_std().unwrap_or_default()
    }

    /// Mean of each metric over the rows where it was computable.
    pub fn averages(&self) -> Vec<(Metric, Option<f64>)> {
        let rows: Vec<&ScoredSample> = self.rows.iter().collect();
        metric_means(&self.metrics, &rows)
    }

    /// Group rows by the category of the record at the same index.
    ///
    /// Categories appear in first-seen order.
    pub fn category_averages(&self, categories: &[String]) -> Result<Vec<CategorySummary>> {
        if categories.len() != self.rows.len() {
            return Err(EvalError::ExecutionError(format!(
                "{} categories for {} result rows",
                categories.len(),
                self.rows.len()
            )));
        }

        let mut groups: Vec<(&str, Vec<&ScoredSample>)> = Vec::new();
        for (category, row) in categories.iter().zip(&self.rows) {
            let category = category.as_str();
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, rows)) => rows.push(row),
                None => groups.push((category, vec![row])),
            }
        }

        Ok(groups
            .into_iter()
            .map(|(category, rows)| CategorySummary {
                category: category.to_string(),
                samples: rows.len(),
                averages: metric_means(&self.metrics, &rows),
            })
            .collect())
    }

    /// Format the overall averages as a human-readable block
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", "=".repeat(60)));
        output.push_str("RAGAS EVALUATION RESULTS\n");
        output.push_str(&format!("{}\n", "=".repeat(60)));
        if self.used_fallback {
            output.push_str("(scored with fallback models)\n");
        }

        output.push_str("\nOVERALL METRICS:\n");
        output.push_str(&format!("{}\n", "-".repeat(30)));
        for (metric, average) in self.averages() {
            output.push_str(&format_metric_line("  ", metric, average));
        }
        output
    }

    /// Format per-category averages as a human-readable block
    pub fn format_category_summary(&self, categories: &[String]) -> Result<String> {
        let mut output = String::new();
        output.push_str("\nMETRICS BY CATEGORY:\n");
        output.push_str(&format!("{}\n", "-".repeat(30)));
        for summary in self.category_averages(categories)? {
            output.push_str(&format!("\n{} ({} samples):\n", summary.category, summary.samples));
            for (metric, average) in summary.averages {
                output.push_str(&format_metric_line("    ", metric, average));
            }
        }
        Ok(output)
    }

    /// Write the result table as CSV.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|e| EvalError::WriteError(format!("{}: {e}", path.display())))?;
        self.write_csv_to(file)
            .map_err(|e| EvalError::WriteError(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "results written");
        Ok(())
    }

    /// Write the result table as CSV to any sink.
    pub fn write_csv_to(&self, sink: impl Write) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);

        let mut header: Vec<&str> = INPUT_COLUMNS.to_vec();
        header.extend(self.metrics.iter().map(|m| m.name()));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.input.question.clone(),
                serde_json::to_string(&row.input.contexts)?,
                row.input.answer.clone(),
                row.input.ground_truth.clone(),
            ];
            for metric in &self.metrics {
                let score = row.score(*metric);
                record.push(score.map(|s| s.to_string()).unwrap_or_default());
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Read a results file written by [`EvaluationResult::write_csv`].
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| EvalError::LoadError(format!("{}: {e}", path.display())))?;
        Self::read_csv_from(file)
    }

    /// Read a results table from any CSV source.
    ///
    /// Timestamps are not stored in the file; both are set to the read time.
    pub fn read_csv_from(source: impl Read) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(source);
        let headers = reader.headers()?.clone();

        let position = |name: &str| headers.iter().position(|h| h == name);
        let mut input_positions = Vec::with_capacity(INPUT_COLUMNS.len());
        let mut missing = Vec::new();
        for column in INPUT_COLUMNS {
            match position(column) {
                Some(index) => input_positions.push(index),
                None => missing.push(column.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(EvalError::MissingColumn(missing));
        }

        let metric_positions: Vec<(Metric, usize)> = headers
            .iter()
            .enumerate()
            .filter_map(|(index, name)| Some((name.parse::<Metric>().ok()?, index)))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |index: usize| record.get(index).unwrap_or_default();

            let input = EvaluationInput {
                question: field(input_positions[0]).to_string(),
                contexts: serde_json::from_str(field(input_positions[1]))?,
                answer: field(input_positions[2]).to_string(),
                ground_truth: field(input_positions[3]).to_string(),
            };

            let mut scores = BTreeMap::new();
            for (metric, index) in &metric_positions {
                let cell = field(*index).trim();
                let score = if cell.is_empty() {
                    None
                } else {
                    Some(cell.parse::<f64>().map_err(|e| {
                        EvalError::LoadError(format!("invalid {metric} score '{cell}': {e}"))
                    })?)
                };
                scores.insert(*metric, score);
            }

            rows.push(ScoredSample { input, scores });
        }

        let now = chrono::Utc::now();
        Ok(Self {
            metrics: metric_positions.into_iter().map(|(m, _)| m).collect(),
            rows,
            started_at: now,
            completed_at: now,
            used_fallback: false,
        })
    }
}

fn metric_means(metrics: &[Metric], rows: &[&ScoredSample]) -> Vec<(Metric, Option<f64>)> {
    metrics
        .iter()
        .map(|m| (*m, scoring::mean(rows.iter().map(|r| r.score(*m)))))
        .collect()
}

fn format_metric_line(indent: &str, metric: Metric, average: Option<f64>) -> String {
    match average {
        Some(score) => format!("{indent}{:18}: {:.4}\n", metric.display_name(), score),
        None => format!("{indent}{:18}: n/a\n", metric.display_name()),
    }
}
