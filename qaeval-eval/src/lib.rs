//! # qaeval-eval
//!
//! RAG evaluation for question/answer/reference datasets.
//!
//! This crate loads a CSV of questions with generated answers and reference
//! answers, turns every row into an evaluation input, and scores it with six
//! RAGAS-style metrics using a chat model as judge and an embedding model
//! for similarity.
//!
//! ## Features
//!
//! - **Dataset loading**: CSV with `question`, `answer`, `reference`, `category`
//! - **Metrics**: answer relevancy, correctness, similarity, context recall,
//!   context precision, faithfulness
//! - **Single fallback**: a failed run is retried once with default models
//! - **Reporting**: overall and per-category averages, CSV results file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qaeval_eval::{Dataset, EvalModels, EvaluationConfig, Evaluator, prepare_dataset};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Dataset::load("sample_questions_with_answers.csv")?;
//!     let inputs = prepare_dataset(&dataset.records);
//!
//!     let models = EvalModels::new(Arc::new(my_llm()), Arc::new(my_embedder()));
//!     let evaluator = Evaluator::new(EvaluationConfig::default());
//!
//!     if let Some(result) = evaluator.evaluate(&inputs, Some(&models)).await {
//!         println!("{}", result.format_summary());
//!         result.write_csv("ragas_evaluation_results.csv")?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod llm_judge;
pub mod metrics;
pub mod report;
pub mod schema;
pub mod scoring;

// Re-exports
pub use dataset::{Dataset, QaRecord, REQUIRED_COLUMNS};
pub use error::{EvalError, Result};
pub use evaluator::{EvalModels, EvaluationConfig, Evaluator};
pub use llm_judge::{GeneratedQuestions, LlmJudge, LlmJudgeConfig};
pub use metrics::Metric;
pub use report::{CategorySummary, EvaluationResult, INPUT_COLUMNS, ScoredSample};
pub use schema::{EvaluationInput, prepare_dataset};
pub use scoring::StatementCounts;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dataset::{Dataset, QaRecord};
    pub use crate::error::{EvalError, Result};
    pub use crate::evaluator::{EvalModels, EvaluationConfig, Evaluator};
    pub use crate::metrics::Metric;
    pub use crate::report::EvaluationResult;
    pub use crate::schema::{EvaluationInput, prepare_dataset};
}
