//! Question/answer dataset loading
//!
//! Reads the input CSV into [`QaRecord`]s. The header is checked before any
//! row is read, so a file missing a required column fails as a whole instead
//! of yielding empty fields.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["question", "answer", "reference", "category"];

/// One row of the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub reference: String,
    pub category: String,
}

impl QaRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        reference: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            reference: reference.into(),
            category: category.into(),
        }
    }
}

/// A loaded input file: its records plus the header it was read with.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<QaRecord>,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| EvalError::LoadError(format!("{}: {e}", path.display())))?;
        let dataset = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), records = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Load a dataset from any CSV source.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c == *required))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EvalError::MissingColumn(missing));
        }

        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<QaRecord>, _>>()?;
        Ok(Self { columns, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(rows, columns)`, as printed in the "Data shape" line.
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), self.columns.len())
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.category.as_str()) {
                seen.push(&record.category);
            }
        }
        seen
    }

    /// Category of every record, by record index.
    pub fn record_categories(&self) -> Vec<String> {
        self.records.iter().map(|r| r.category.clone()).collect()
    }
}
