//! Evaluation inputs
//!
//! The evaluation engine scores [`EvaluationInput`]s, not raw records. Each
//! input treats the record's reference as both the single retrieved context
//! and the ground truth.

use crate::dataset::QaRecord;
use serde::{Deserialize, Serialize};

/// One sample as the metrics see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// The question asked
    pub question: String,
    /// The generated answer under evaluation
    pub answer: String,
    /// Retrieved contexts, in rank order
    pub contexts: Vec<String>,
    /// The expected answer
    pub ground_truth: String,
}

impl From<&QaRecord> for EvaluationInput {
    fn from(record: &QaRecord) -> Self {
        Self {
            question: record.question.clone(),
            answer: record.answer.clone(),
            contexts: vec![record.reference.clone()],
            ground_truth: record.reference.clone(),
        }
    }
}

/// Map records 1:1 to evaluation inputs, preserving order.
pub fn prepare_dataset(records: &[QaRecord]) -> Vec<EvaluationInput> {
    records.iter().map(EvaluationInput::from).collect()
}
