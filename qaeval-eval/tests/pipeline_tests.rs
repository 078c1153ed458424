//! End-to-end pipeline: CSV in, scored CSV out, with scripted models.

use qaeval_eval::prelude::*;
use qaeval_model::{MockEmbedder, MockLlm};
use std::io::Write;
use std::sync::Arc;

const JUDGE_REPLY: &str = "\
QUESTION: What is the capital of France?
NONCOMMITTAL: NO
TP: Paris is the capital of France.
ATTRIBUTED: 1 | Paris is the capital of France.
VERDICT: 1 | Paris is the capital of France.
STATEMENT: Paris is the capital of France.";

fn write_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sample_questions_with_answers.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "question,answer,reference,category").unwrap();
    writeln!(file, "What is 2+2?,4,4,math").unwrap();
    writeln!(file, "Capital of France?,Paris,Paris,geography").unwrap();
    writeln!(file, "What is 3*3?,9,9,math").unwrap();
    path
}

#[tokio::test]
async fn test_csv_to_results_file() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = Dataset::load(write_input(&dir)).unwrap();
    let inputs = prepare_dataset(&dataset.records);
    assert_eq!(inputs.len(), 3);

    let models = EvalModels::new(
        Arc::new(MockLlm::new("azure").with_default_response(JUDGE_REPLY)),
        Arc::new(MockEmbedder::new("azure")),
    );
    let evaluator = Evaluator::new(EvaluationConfig::default());
    let result = evaluator.evaluate(&inputs, Some(&models)).await.unwrap();
    assert!(!result.used_fallback);
    assert_eq!(result.len(), 3);

    let categories = dataset.record_categories();
    let by_category = result.category_averages(&categories).unwrap();
    assert_eq!(by_category.len(), 2);
    assert_eq!(by_category[0].category, "math");
    assert_eq!(by_category[0].samples, 2);

    let output = dir.path().join("ragas_evaluation_results.csv");
    result.write_csv(&output).unwrap();

    let read = EvaluationResult::read_csv(&output).unwrap();
    assert_eq!(read.metrics, Metric::ALL.to_vec());
    assert_eq!(read.len(), 3);
    assert_eq!(read.rows[1].input.contexts, vec!["Paris"]);
    assert_eq!(read.rows[1].input.ground_truth, "Paris");
    for (read_row, row) in read.rows.iter().zip(&result.rows) {
        for metric in Metric::ALL {
            match (read_row.score(metric), row.score(metric)) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-12),
                (a, b) => assert_eq!(a, b),
            }
        }
    }
}

#[tokio::test]
async fn test_failing_service_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = Dataset::load(write_input(&dir)).unwrap();
    let inputs = prepare_dataset(&dataset.records);

    let azure = EvalModels::new(
        Arc::new(MockLlm::failing("azure", "DeploymentNotFound")),
        Arc::new(MockEmbedder::new("azure")),
    );
    let openai = EvalModels::new(
        Arc::new(MockLlm::new("openai").with_default_response(JUDGE_REPLY)),
        Arc::new(MockEmbedder::new("openai")),
    );
    let evaluator = Evaluator::new(EvaluationConfig::default()).with_default_models(openai);

    let result = evaluator.evaluate(&inputs, Some(&azure)).await.unwrap();
    assert!(result.used_fallback);
    assert!(result.format_summary().contains("fallback"));
}

#[test]
fn test_missing_reference_column_fails_before_evaluation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "question,answer,category\nQ,A,C\n").unwrap();

    let err = Dataset::load(&path).unwrap_err();
    assert_eq!(err.to_string(), "Missing required columns: reference");
}
