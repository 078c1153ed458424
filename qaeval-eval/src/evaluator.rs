//! Core evaluator implementation
//!
//! The Evaluator scores every input against the configured metrics, one
//! sample and one service call at a time. A failed run gets exactly one
//! more attempt with the default models.

use crate::error::{EvalError, Result};
use crate::llm_judge::{LlmJudge, LlmJudgeConfig};
use crate::metrics::Metric;
use crate::report::{EvaluationResult, ScoredSample};
use crate::schema::EvaluationInput;
use crate::scoring::{self, DEFAULT_FACTUALITY_WEIGHT};

use qaeval_core::{Embedder, Llm, cosine_similarity};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Configuration for the evaluator
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Metrics to compute, in output order
    pub metrics: Vec<Metric>,
    /// Number of questions generated back from each answer
    pub strictness: usize,
    /// Weight of factuality in answer correctness
    pub factuality_weight: f64,
    /// Judge call settings
    pub judge: LlmJudgeConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
            strictness: 3,
            factuality_weight: DEFAULT_FACTUALITY_WEIGHT,
            judge: LlmJudgeConfig::default(),
        }
    }
}

impl EvaluationConfig {
    /// Create config with specific metrics
    pub fn with_metrics(metrics: impl IntoIterator<Item = Metric>) -> Self {
        let mut metrics: Vec<Metric> = metrics.into_iter().collect();
        metrics.sort();
        metrics.dedup();
        Self {
            metrics,
            ..Default::default()
        }
    }
}

/// The chat and embedding handles one evaluation attempt runs against.
#[derive(Clone)]
pub struct EvalModels {
    pub llm: Arc<dyn Llm>,
    pub embedder: Arc<dyn Embedder>,
}

impl EvalModels {
    pub fn new(llm: Arc<dyn Llm>, embedder: Arc<dyn Embedder>) -> Self {
        Self { llm, embedder }
    }
}

impl std::fmt::Debug for EvalModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalModels")
            .field("llm", &self.llm.name())
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

/// The main evaluator struct
pub struct Evaluator {
    config: EvaluationConfig,
    default_models: Option<EvalModels>,
}

impl Evaluator {
    /// Create a new evaluator without default models
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            default_models: None,
        }
    }

    /// Set the models used when none are supplied or the supplied ones fail
    pub fn with_default_models(mut self, models: EvalModels) -> Self {
        self.default_models = Some(models);
        self
    }

    /// Evaluate inputs, falling back to the default models once.
    ///
    /// Returns `None` when every allowed attempt failed; the cause is logged.
    pub async fn evaluate(
        &self,
        inputs: &[EvaluationInput],
        models: Option<&EvalModels>,
    ) -> Option<EvaluationResult> {
        let Some(primary) = models else {
            let Some(defaults) = &self.default_models else {
                tracing::error!("no models supplied and no default models configured");
                return None;
            };
            return match self.try_evaluate(inputs, defaults).await {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::error!(error = %e, "evaluation with default models failed");
                    None
                }
            };
        };

        let err = match self.try_evaluate(inputs, primary).await {
            Ok(result) => return Some(result),
            Err(e) => e,
        };

        let Some(defaults) = &self.default_models else {
            tracing::error!(error = %err, "evaluation failed and no default models configured");
            return None;
        };

        tracing::warn!(error = %err, "evaluation failed, retrying once with default models");
        match self.try_evaluate(inputs, defaults).await {
            Ok(mut result) => {
                result.used_fallback = true;
                Some(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "evaluation with default models failed");
                None
            }
        }
    }

    /// Run a single evaluation attempt; any service error fails the attempt.
    pub async fn try_evaluate(
        &self,
        inputs: &[EvaluationInput],
        models: &EvalModels,
    ) -> Result<EvaluationResult> {
        let started_at = chrono::Utc::now();
        let judge = LlmJudge::with_config(models.llm.clone(), self.config.judge.clone());

        tracing::info!(
            samples = inputs.len(),
            metrics = self.config.metrics.len(),
            llm = models.llm.name(),
            embedder = models.embedder.name(),
            "starting evaluation"
        );

        let mut rows = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            tracing::debug!(sample = index, "scoring sample");
            let scores = self
                .score_sample(input, &judge, models.embedder.as_ref())
                .await?;
            rows.push(ScoredSample {
                input: input.clone(),
                scores,
            });
        }

        let completed_at = chrono::Utc::now();
        tracing::info!(samples = rows.len(), "evaluation complete");

        Ok(EvaluationResult {
            metrics: self.config.metrics.clone(),
            rows,
            started_at,
            completed_at,
            used_fallback: false,
        })
    }

    async fn score_sample(
        &self,
        input: &EvaluationInput,
        judge: &LlmJudge,
        embedder: &dyn Embedder,
    ) -> Result<BTreeMap<Metric, Option<f64>>> {
        let mut scores = BTreeMap::new();
        // answer_similarity feeds answer_correctness; embed once per sample.
        let mut similarity: Option<f64> = None;

        for metric in &self.config.metrics {
            let score = match metric {
                Metric::AnswerSimilarity => {
                    Some(self.similarity(input, embedder, &mut similarity).await?)
                }
                Metric::AnswerCorrectness => {
                    let counts = judge
                        .classify_statements(&input.question, &input.answer, &input.ground_truth)
                        .await?;
                    let factuality = counts.and_then(|c| c.f1());
                    if factuality.is_some() {
                        let sim = self.similarity(input, embedder, &mut similarity).await?;
                        scoring::correctness(factuality, sim, self.config.factuality_weight)
                    } else {
                        None
                    }
                }
                Metric::AnswerRelevancy => self.relevancy(input, judge, embedder).await?,
                Metric::ContextRecall => {
                    let verdicts = judge
                        .attribute_sentences(
                            &input.question,
                            &input.contexts.join("\n"),
                            &input.ground_truth,
                        )
                        .await?;
                    verdicts.as_deref().and_then(scoring::verdict_ratio)
                }
                Metric::ContextPrecision => {
                    let mut verdicts = Vec::with_capacity(input.contexts.len());
                    for context in &input.contexts {
                        match judge
                            .context_usefulness(&input.question, context, &input.ground_truth)
                            .await?
                        {
                            Some(useful) => verdicts.push(useful),
                            None => {
                                verdicts.clear();
                                break;
                            }
                        }
                    }
                    scoring::average_precision(&verdicts)
                }
                Metric::Faithfulness => {
                    let statements = judge
                        .extract_statements(&input.question, &input.answer)
                        .await?;
                    if statements.is_empty() {
                        None
                    } else {
                        let verdicts = judge
                            .statement_verdicts(&input.contexts.join("\n"), &statements)
                            .await?;
                        // one verdict per statement, or the ratio means nothing
                        verdicts
                            .filter(|v| v.len() == statements.len())
                            .as_deref()
                            .and_then(scoring::verdict_ratio)
                    }
                }
            };

            if score.is_none() {
                tracing::warn!(
                    metric = %metric,
                    question = %input.question,
                    "score not computable"
                );
            }
            scores.insert(*metric, score);
        }

        Ok(scores)
    }

    async fn similarity(
        &self,
        input: &EvaluationInput,
        embedder: &dyn Embedder,
        cached: &mut Option<f64>,
    ) -> Result<f64> {
        if let Some(value) = cached {
            return Ok(*value);
        }
        let texts = [input.answer.as_str(), input.ground_truth.as_str()];
        let vectors = embed(embedder, &texts).await?;
        let value = cosine_similarity(&vectors[0], &vectors[1]);
        *cached = Some(value);
        Ok(value)
    }

    async fn relevancy(
        &self,
        input: &EvaluationInput,
        judge: &LlmJudge,
        embedder: &dyn Embedder,
    ) -> Result<Option<f64>> {
        let context = input.contexts.join("\n");
        let Some(generated) = judge
            .generate_questions(&input.answer, &context, self.config.strictness)
            .await?
        else {
            return Ok(None);
        };

        let mut texts: Vec<&str> = vec![input.question.as_str()];
        texts.extend(generated.questions.iter().map(String::as_str));
        let vectors = embed(embedder, &texts).await?;

        Ok(scoring::relevancy(&vectors[0], &vectors[1..], generated.noncommittal))
    }
}

/// Embed a batch, checking one vector comes back per text.
async fn embed(embedder: &dyn Embedder, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
    let vectors = embedder
        .embed_batch(texts)
        .await
        .map_err(|e| EvalError::ScoringError(format!("embedding failed: {}", e)))?;
    if vectors.len() != texts.len() {
        return Err(EvalError::ScoringError(format!(
            "expected {} embeddings, got {}",
            texts.len(),
            vectors.len()
        )));
    }
    Ok(vectors)
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

    fn input() -> EvaluationInput {
        EvaluationInput {
            question: "What is 2+2?".to_string(),
            answer: "4".to_string(),
            contexts: vec!["4".to_string()],
            ground_truth: "4".to_string(),
        }
    }

    fn replying(name: &str, reply: &str) -> EvalModels {
        EvalModels::new(
            Arc::new(MockLlm::new(name).with_default_response(reply)),
            Arc::new(MockEmbedder::new(name)),
        )
    }

    fn working(name: &str) -> EvalModels {
        replying(name, JUDGE_REPLY)
    }

    fn failing(name: &str) -> EvalModels {
        EvalModels::new(
            Arc::new(MockLlm::failing(name, "401 unauthorized")),
            Arc::new(MockEmbedder::failing(name, "401 unauthorized")),
        )
    }

    #[tokio::test]
    async fn test_scores_all_metrics() {
        let evaluator = Evaluator::new(EvaluationConfig::default());
        let result = evaluator
            .try_evaluate(&[input()], &working("azure"))
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert!(!result.used_fallback);
        let scores = &result.rows[0].scores;
        assert_eq!(scores.len(), 6);
        for metric in Metric::ALL {
            let score = scores[&metric].unwrap();
            assert!((score - 1.0).abs() < 1e-6, "{metric} = {score}");
        }
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_empty_score() {
        let models = replying("azure", "I would rather not say.");
        let evaluator = Evaluator::new(EvaluationConfig::default());
        let result = evaluator.try_evaluate(&[input()], &models).await.unwrap();

        let scores = &result.rows[0].scores;
        assert!(scores[&Metric::AnswerSimilarity].is_some());
        assert_eq!(scores[&Metric::Faithfulness], None);
        assert_eq!(scores[&Metric::AnswerRelevancy], None);
        assert_eq!(scores[&Metric::ContextPrecision], None);
    }

    #[tokio::test]
    async fn test_empty_reply_is_empty_score() {
        let models = replying("azure", "");
        let evaluator = Evaluator::new(EvaluationConfig::default());
        let result = evaluator.try_evaluate(&[input()], &models).await.unwrap();

        let scores = &result.rows[0].scores;
        assert!(scores[&Metric::AnswerSimilarity].is_some());
        for metric in [
            Metric::AnswerCorrectness,
            Metric::AnswerRelevancy,
            Metric::ContextRecall,
            Metric::ContextPrecision,
            Metric::Faithfulness,
        ] {
            assert_eq!(scores[&metric], None, "{metric}");
        }
    }

    #[tokio::test]
    async fn test_empty_reply_does_not_trigger_fallback() {
        let default_llm = Arc::new(MockLlm::new("openai").with_default_response(JUDGE_REPLY));
        let defaults = EvalModels::new(default_llm.clone(), Arc::new(MockEmbedder::new("openai")));
        let evaluator = Evaluator::new(EvaluationConfig::default()).with_default_models(defaults);

        let models = replying("azure", "  ");
        let result = evaluator.evaluate(&[input()], Some(&models)).await.unwrap();
        assert!(!result.used_fallback);
        assert_eq!(default_llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_faithfulness_needs_a_verdict_per_statement() {
        let reply = "\
STATEMENT: The answer is 4.
STATEMENT: Four is even.
VERDICT: 1 | The answer is 4.";
        let models = replying("azure", reply);
        let evaluator = Evaluator::new(EvaluationConfig::with_metrics([Metric::Faithfulness]));
        let result = evaluator.try_evaluate(&[input()], &models).await.unwrap();

        assert_eq!(result.rows[0].score(Metric::Faithfulness), None);
    }

    #[tokio::test]
    async fn test_faithfulness_ratio_over_statements() {
        let reply = "\
STATEMENT: The answer is 4.
STATEMENT: Four is odd.
VERDICT: 1 | The answer is 4.
VERDICT: 0 | Four is odd.";
        let models = replying("azure", reply);
        let evaluator = Evaluator::new(EvaluationConfig::with_metrics([Metric::Faithfulness]));
        let result = evaluator.try_evaluate(&[input()], &models).await.unwrap();

        assert_eq!(result.rows[0].score(Metric::Faithfulness), Some(0.5));
    }

    #[tokio::test]
    async fn test_similarity_embedded_once_per_sample() {
        let embedder = Arc::new(MockEmbedder::new("azure"));
        let models = EvalModels::new(
            Arc::new(MockLlm::new("azure").with_default_response(JUDGE_REPLY)),
            embedder.clone(),
        );
        let evaluator = Evaluator::new(EvaluationConfig::with_metrics([
            Metric::AnswerSimilarity,
            Metric::AnswerCorrectness,
        ]));
        evaluator.try_evaluate(&[input()], &models).await.unwrap();

        assert_eq!(embedder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_without_defaults_is_none() {
        let evaluator = Evaluator::new(EvaluationConfig::default());
        let result = evaluator.evaluate(&[input()], Some(&failing("azure"))).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_failure_falls_back_once() {
        let default_llm = Arc::new(MockLlm::new("openai").with_default_response(JUDGE_REPLY));
        let defaults = EvalModels::new(default_llm.clone(), Arc::new(MockEmbedder::new("openai")));
        let evaluator = Evaluator::new(EvaluationConfig::default()).with_default_models(defaults);

        let result = evaluator
            .evaluate(&[input()], Some(&failing("azure")))
            .await
            .unwrap();
        assert!(result.used_fallback);
        assert_eq!(result.rows.len(), 1);
        assert!(default_llm.call_count() > 0);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_none() {
        let default_llm = Arc::new(MockLlm::failing("openai", "quota exceeded"));
        let defaults = EvalModels::new(default_llm.clone(), Arc::new(MockEmbedder::new("openai")));
        let evaluator = Evaluator::new(EvaluationConfig::default()).with_default_models(defaults);

        let result = evaluator.evaluate(&[input()], Some(&failing("azure"))).await;
        assert!(result.is_none());
        // one attempt only: the failing judge call ends the run
        assert_eq!(default_llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_models_at_all_is_none() {
        let evaluator = Evaluator::new(EvaluationConfig::default());
        assert!(evaluator.evaluate(&[input()], None).await.is_none());
    }

    #[tokio::test]
    async fn test_no_models_uses_defaults() {
        let evaluator =
            Evaluator::new(EvaluationConfig::default()).with_default_models(working("openai"));
        let result = evaluator.evaluate(&[input()], None).await.unwrap();
        assert!(!result.used_fallback);
    }

    #[tokio::test]
    async fn test_empty_dataset() {
        let evaluator = Evaluator::new(EvaluationConfig::default());
        let result = evaluator
            .evaluate(&[], Some(&failing("azure")))
            .await
            .unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.metrics, Metric::ALL.to_vec());
    }
}
