//! Evaluation run: configure services, load, evaluate, report, save.

use qaeval_eval::{Dataset, EvalModels, EvaluationConfig, Evaluator, prepare_dataset};
use qaeval_model::ServiceSettings;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_INPUT: &str = "sample_questions_with_answers.csv";
pub const DEFAULT_OUTPUT: &str = "ragas_evaluation_results.csv";

/// Example values printed when Azure variables are missing.
const AZURE_ENV_HINT: [&str; 4] = [
    "AZURE_OPENAI_API_KEY=your-azure-openai-api-key",
    "AZURE_OPENAI_ENDPOINT=https://your-resource.openai.azure.com/",
    "AZURE_OPENAI_MODEL_DEPLOYMENT=your-model-deployment-name",
    "AZURE_OPENAI_EMBEDDING_DEPLOYMENT=your-embedding-deployment-name",
];

/// Paths for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub csv_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_INPUT),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Build the Azure models, reporting to `out`.
///
/// Missing variables or a client error yield `None`; the run then relies on
/// the default models alone.
pub fn configure_azure<W: Write>(
    settings: &ServiceSettings,
    out: &mut W,
) -> io::Result<Option<EvalModels>> {
    let missing = settings.missing_required();
    if !missing.is_empty() {
        let missing = missing.join(", ");
        writeln!(
            out,
            "Error: Missing required environment variables: {missing}"
        )?;
        writeln!(out, "Please set the following environment variables:")?;
        for line in AZURE_ENV_HINT {
            writeln!(out, "  {line}")?;
        }
        return Ok(None);
    }

    match settings.azure_clients() {
        Ok((llm, embedder)) => {
            let endpoint = settings.azure_endpoint.as_deref().unwrap_or_default();
            writeln!(out, "✓ Azure OpenAI configured successfully")?;
            writeln!(out, "  Endpoint: {endpoint}")?;
            writeln!(out, "  Model: {}", settings.model_deployment())?;
            writeln!(out, "  Embedding: {}", settings.embedding_deployment())?;
            Ok(Some(EvalModels::new(Arc::new(llm), Arc::new(embedder))))
        }
        Err(e) => {
            writeln!(out, "Error configuring Azure OpenAI: {e}")?;
            Ok(None)
        }
    }
}

/// Build the default OpenAI models when `OPENAI_API_KEY` is set.
pub fn default_models(settings: &ServiceSettings) -> Option<EvalModels> {
    match settings.openai_clients() {
        Ok((llm, embedder)) => Some(EvalModels::new(Arc::new(llm), Arc::new(embedder))),
        Err(e) => {
            tracing::warn!(error = %e, "no default models available");
            None
        }
    }
}

/// Load, evaluate, display, and save. Returns whether results were saved.
pub async fn run<W: Write>(
    options: &RunOptions,
    models: Option<EvalModels>,
    defaults: Option<EvalModels>,
    out: &mut W,
) -> io::Result<bool> {
    if !options.csv_path.exists() {
        let path = options.csv_path.display();
        writeln!(out, "Error: Input file '{path}' not found.")?;
        return Ok(false);
    }

    let dataset = match Dataset::load(&options.csv_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            writeln!(out, "Error loading data: {e}")?;
            return Ok(false);
        }
    };
    writeln!(
        out,
        "Successfully loaded {} records from {}",
        dataset.len(),
        options.csv_path.display()
    )?;

    let (rows, columns) = dataset.shape();
    writeln!(out, "Data shape: ({rows}, {columns})")?;
    writeln!(out, "Categories: {:?}", dataset.categories())?;

    writeln!(out, "\nPreparing dataset for RAGAS evaluation...")?;
    let inputs = prepare_dataset(&dataset.records);

    let mut evaluator = Evaluator::new(EvaluationConfig::default());
    if let Some(defaults) = defaults {
        evaluator = evaluator.with_default_models(defaults);
    }

    writeln!(out, "Starting RAGAS evaluation...")?;
    let Some(result) = evaluator.evaluate(&inputs, models.as_ref()).await else {
        writeln!(out, "Evaluation failed. No results to display.")?;
        return Ok(false);
    };

    tracing::info!(
        rows = result.len(),
        duration = ?result.duration(),
        fallback = result.used_fallback,
        "evaluation finished"
    );
    if result.used_fallback {
        writeln!(out, "RAGAS evaluation completed with fallback OpenAI!")?;
    } else {
        writeln!(out, "RAGAS evaluation completed successfully!")?;
    }

    write!(out, "{}", result.format_summary())?;
    match result.format_category_summary(&dataset.record_categories()) {
        Ok(text) => write!(out, "{text}")?,
        Err(e) => tracing::warn!(error = %e, "category summary unavailable"),
    }

    save_results(&result, &options.output_path, out)
}

fn save_results<W: Write>(
    result: &qaeval_eval::EvaluationResult,
    path: &Path,
    out: &mut W,
) -> io::Result<bool> {
    match result.write_csv(path) {
        Ok(()) => {
            writeln!(out, "\nDetailed results saved to: {}", path.display())?;
            writeln!(out, "\nEvaluation complete!")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "Error saving results: {e}")?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaeval_model::{MockEmbedder, MockLlm};

    const JUDGE_REPLY: &str = "\
QUESTION: What is 2+2?
NONCOMMITTAL: NO
TP: The answer is 4.
ATTRIBUTED: 1 | The answer is 4.
VERDICT: 1 | The answer is 4.
STATEMENT: The answer is 4.";

    fn working(name: &str) -> EvalModels {
        EvalModels::new(
            Arc::new(MockLlm::new(name).with_default_response(JUDGE_REPLY)),
            Arc::new(MockEmbedder::new(name)),
        )
    }

    fn options(dir: &tempfile::TempDir) -> RunOptions {
        let csv_path = dir.path().join("input.csv");
        let csv = "\
question,answer,reference,category
What is 2+2?,4,4,math
Capital of France?,Paris,Paris,geography
";
        std::fs::write(&csv_path, csv).unwrap();
        RunOptions {
            csv_path,
            output_path: dir.path().join("results.csv"),
        }
    }

    #[test]
    fn test_missing_azure_vars_downgrade() {
        let mut out = Vec::new();
        let models = configure_azure(&ServiceSettings::default(), &mut out).unwrap();
        assert!(models.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "Missing required environment variables: AZURE_OPENAI_API_KEY"
        ));
        assert!(text.contains(
            "  AZURE_OPENAI_ENDPOINT=https://your-resource.openai.azure.com/"
        ));
    }

    #[test]
    fn test_no_default_models_without_openai_key() {
        assert!(default_models(&ServiceSettings::default()).is_none());
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            csv_path: dir.path().join("nope.csv"),
            output_path: dir.path().join("results.csv"),
        };
        let mut out = Vec::new();

        let saved = run(&options, Some(working("azure")), None, &mut out)
            .await
            .unwrap();
        assert!(!saved);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error: Input file '"));
        assert!(text.contains("nope.csv' not found."));
        assert!(!options.output_path.exists());
    }

    #[tokio::test]
    async fn test_full_run_writes_results() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);
        let mut out = Vec::new();

        let saved = run(&options, Some(working("azure")), None, &mut out)
            .await
            .unwrap();
        assert!(saved);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Data shape: (2, 4)"));
        assert!(text.contains("Categories: [\"math\", \"geography\"]"));
        assert!(text.contains("completed successfully"));
        assert!(text.contains("OVERALL METRICS:"));
        assert!(text.contains("geography (1 samples):"));

        let written = std::fs::read_to_string(&options.output_path).unwrap();
        let header = written.lines().next().unwrap();
        assert_eq!(
            header.split(',').collect::<Vec<_>>(),
            [
                "question",
                "contexts",
                "answer",
                "ground_truth",
                "answer_relevancy",
                "answer_correctness",
                "answer_similarity",
                "context_recall",
                "context_precision",
                "faithfulness",
            ]
        );
        assert_eq!(written.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_failure_without_fallback_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);
        let failing = EvalModels::new(
            Arc::new(MockLlm::failing("azure", "401")),
            Arc::new(MockEmbedder::failing("azure", "401")),
        );
        let mut out = Vec::new();

        let saved = run(&options, Some(failing), None, &mut out).await.unwrap();
        assert!(!saved);
        assert!(!options.output_path.exists());
    }

    #[tokio::test]
    async fn test_fallback_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);
        let failing = EvalModels::new(
            Arc::new(MockLlm::failing("azure", "401")),
            Arc::new(MockEmbedder::new("azure")),
        );
        let mut out = Vec::new();

        let defaults = Some(working("openai"));
        let saved = run(&options, Some(failing), defaults, &mut out)
            .await
            .unwrap();
        assert!(saved);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("completed with fallback OpenAI!"));
    }
}
