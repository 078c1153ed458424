//! The fixed metric set

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A RAG evaluation metric.
///
/// Declaration order is the column order of the results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// How well the answer addresses the question
    AnswerRelevancy,
    /// Factual agreement of the answer with the ground truth, blended with similarity
    AnswerCorrectness,
    /// Semantic similarity between answer and ground truth
    AnswerSimilarity,
    /// How much of the ground truth the contexts cover
    ContextRecall,
    /// Whether useful contexts are ranked first
    ContextPrecision,
    /// How much of the answer the contexts support
    Faithfulness,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::AnswerRelevancy,
        Metric::AnswerCorrectness,
        Metric::AnswerSimilarity,
        Metric::ContextRecall,
        Metric::ContextPrecision,
        Metric::Faithfulness,
    ];

    /// Column name in the results file.
    pub fn name(self) -> &'static str {
        match self {
            Metric::AnswerRelevancy => "answer_relevancy",
            Metric::AnswerCorrectness => "answer_correctness",
            Metric::AnswerSimilarity => "answer_similarity",
            Metric::ContextRecall => "context_recall",
            Metric::ContextPrecision => "context_precision",
            Metric::Faithfulness => "faithfulness",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::AnswerRelevancy => "Answer Relevancy",
            Metric::AnswerCorrectness => "Answer Correctness",
            Metric::AnswerSimilarity => "Answer Similarity",
            Metric::ContextRecall => "Context Recall",
            Metric::ContextPrecision => "Context Precision",
            Metric::Faithfulness => "Faithfulness",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown metric: {s}"))
    }
}
