//! LLM-based judgments
//!
//! Every metric that needs language understanding asks the judge model a
//! single question and parses a line-oriented reply. Transport failures are
//! errors; replies that cannot be parsed come back as `None` so the metric
//! is recorded as not computable for that sample.

use crate::error::{EvalError, Result};
use crate::scoring::StatementCounts;
use qaeval_core::{Content, GenerateConfig, Llm, LlmRequest};
use std::sync::Arc;

const JUDGE_INSTRUCTION: &str =
    "You are an evaluation judge. Be objective and consistent. Always respond in the exact format requested.";

/// LLM-based judge for RAG metrics
pub struct LlmJudge {
    model: Arc<dyn Llm>,
    config: LlmJudgeConfig,
}

/// Configuration for the LLM judge
#[derive(Debug, Clone)]
pub struct LlmJudgeConfig {
    /// Maximum tokens for judge response
    pub max_tokens: u32,
    /// Temperature for judge (low for consistency)
    pub temperature: f32,
}

impl Default for LlmJudgeConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

/// Questions generated back from an answer
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestions {
    pub questions: Vec<String>,
    /// The answer was evasive or vague ("I don't know")
    pub noncommittal: bool,
}

impl LlmJudge {
    /// Create a new LLM judge with the given model
    pub fn new(model: Arc<dyn Llm>) -> Self {
        Self {
            model,
            config: LlmJudgeConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(model: Arc<dyn Llm>, config: LlmJudgeConfig) -> Self {
        Self { model, config }
    }

    /// Generate `count` questions the answer would plausibly respond to.
    pub async fn generate_questions(
        &self,
        answer: &str,
        context: &str,
        count: usize,
    ) -> Result<Option<GeneratedQuestions>> {
        let prompt = format!(
            r#"Generate {count} different questions for the given answer, using the context to understand it.
Also identify whether the answer is noncommittal. An answer is noncommittal if it is evasive, vague or ambiguous, for example "I don't know" or "I'm not sure".

Context:
"{context}"

Answer:
"{answer}"

Respond in this exact format, one QUESTION line per question:
QUESTION: [question]
NONCOMMITTAL: [YES/NO]"#
        );

        let response = self.call_judge(&prompt).await?;
        Ok(parse_generated_questions(&response))
    }

    /// Classify answer statements against the ground truth.
    pub async fn classify_statements(
        &self,
        question: &str,
        answer: &str,
        ground_truth: &str,
    ) -> Result<Option<StatementCounts>> {
        let prompt = format!(
            r#"Given a ground truth and an answer, break both into standalone statements and classify each one:
- TP (true positive): a statement in the answer that is directly supported by the ground truth
- FP (false positive): a statement in the answer that is not supported by the ground truth
- FN (false negative): a statement in the ground truth that is missing from the answer
Each statement belongs to exactly one category.

Question:
"{question}"

Answer:
"{answer}"

Ground truth:
"{ground_truth}"

Respond in this exact format, one line per statement:
TP: [statement]
FP: [statement]
FN: [statement]"#
        );

        let response = self.call_judge(&prompt).await?;
        Ok(parse_statement_classification(&response))
    }

    /// Attribute each ground-truth sentence to the context (true) or not.
    pub async fn attribute_sentences(
        &self,
        question: &str,
        context: &str,
        ground_truth: &str,
    ) -> Result<Option<Vec<bool>>> {
        let prompt = format!(
            r#"Given a context and a ground truth answer, analyze each sentence of the ground truth and decide whether it can be attributed to the context.

Question:
"{question}"

Context:
"{context}"

Ground truth:
"{ground_truth}"

Respond in this exact format, one line per ground truth sentence:
ATTRIBUTED: [1/0] | [sentence]"#
        );

        let response = self.call_judge(&prompt).await?;
        Ok(parse_verdict_lines(&response, "ATTRIBUTED"))
    }

    /// Decide whether one context chunk was useful for reaching the ground truth.
    pub async fn context_usefulness(
        &self,
        question: &str,
        context: &str,
        ground_truth: &str,
    ) -> Result<Option<bool>> {
        let prompt = format!(
            r#"Given a question, a ground truth answer and a context, verify whether the context was useful in arriving at the answer.

Question:
"{question}"

Context:
"{context}"

Ground truth:
"{ground_truth}"

Respond in this exact format:
VERDICT: [1/0]
REASONING: [Brief explanation]"#
        );

        let response = self.call_judge(&prompt).await?;
        let verdicts = parse_verdict_lines(&response, "VERDICT");
        Ok(verdicts.and_then(|v| v.first().copied()))
    }

    /// Break an answer into standalone statements.
    pub async fn extract_statements(&self, question: &str, answer: &str) -> Result<Vec<String>> {
        let prompt = format!(
            r#"Given a question and an answer, break the answer into one or more fully understandable statements. Do not use pronouns in the statements.

Question:
"{question}"

Answer:
"{answer}"

Respond in this exact format, one line per statement:
STATEMENT: [statement]"#
        );

        let response = self.call_judge(&prompt).await?;
        Ok(parse_statements(&response))
    }

    /// Decide, per statement, whether the context supports it.
    pub async fn statement_verdicts(
        &self,
        context: &str,
        statements: &[String],
    ) -> Result<Option<Vec<bool>>> {
        let listed = statements
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            r#"Judge the faithfulness of a series of statements based on a given context. For each statement, return 1 if it can be directly inferred from the context and 0 if it cannot.

Context:
"{context}"

Statements:
{listed}

Respond in this exact format, one line per statement in the same order:
VERDICT: [1/0] | [statement]"#
        );

        let response = self.call_judge(&prompt).await?;
        Ok(parse_verdict_lines(&response, "VERDICT"))
    }

    /// Call the LLM judge
    ///
    /// An empty reply (for example a content-filtered completion) is returned
    /// as is; the parsers turn it into a not-computable score.
    async fn call_judge(&self, prompt: &str) -> Result<String> {
        let request = LlmRequest::new(
            self.model.name(),
            vec![Content::system(JUDGE_INSTRUCTION), Content::user(prompt)],
        )
        .with_config(GenerateConfig {
            temperature: Some(self.config.temperature),
            max_output_tokens: Some(self.config.max_tokens),
        });

        let response = self
            .model
            .generate(request)
            .await
            .map_err(|e| EvalError::JudgeError(format!("LLM judge call failed: {}", e)))?;

        let text = response.text().trim();
        if text.is_empty() {
            tracing::warn!(
                model = self.model.name(),
                finish_reason = ?response.finish_reason,
                "empty response from judge"
            );
        }

        Ok(text.to_string())
    }
}

/// Value of a `KEY: value` line, tolerating list markers and case.
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let line = line.trim().trim_start_matches(is_list_marker).trim_start();
    let head = line.get(..key.len())?;
    if !head.eq_ignore_ascii_case(key) {
        return None;
    }
    let rest = line[key.len()..].trim_start().strip_prefix(':')?;
    Some(rest.trim())
}

fn is_list_marker(c: char) -> bool {
    matches!(c, '-' | '*' | '.' | ')') || c.is_ascii_digit()
}

fn is_decoration(c: char) -> bool {
    matches!(c, '[' | ']' | '"' | '.')
}

fn parse_flag(value: &str) -> Option<bool> {
    let token = value.split('|').next().unwrap_or_default().trim();
    let token = token.trim_matches(is_decoration);
    match token.to_ascii_uppercase().as_str() {
        "1" | "YES" | "TRUE" => Some(true),
        "0" | "NO" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_generated_questions(response: &str) -> Option<GeneratedQuestions> {
    let mut questions = Vec::new();
    let mut noncommittal = false;

    for line in response.lines() {
        if let Some(q) = field(line, "QUESTION") {
            if !q.is_empty() {
                questions.push(q.to_string());
            }
        } else if let Some(flag) = field(line, "NONCOMMITTAL") {
            noncommittal = parse_flag(flag).unwrap_or(false);
        }
    }

    if questions.is_empty() {
        None
    } else {
        Some(GeneratedQuestions {
            questions,
            noncommittal,
        })
    }
}

fn parse_statement_classification(response: &str) -> Option<StatementCounts> {
    let mut counts = StatementCounts::default();

    for line in response.lines() {
        if field(line, "TP").is_some() {
            counts.true_positive += 1;
        } else if field(line, "FP").is_some() {
            counts.false_positive += 1;
        } else if field(line, "FN").is_some() {
            counts.false_negative += 1;
        }
    }

    if counts.total() == 0 {
        None
    } else {
        Some(counts)
    }
}

fn parse_verdict_lines(response: &str, key: &str) -> Option<Vec<bool>> {
    let verdicts: Vec<bool> = response
        .lines()
        .filter_map(|line| field(line, key))
        .filter_map(parse_flag)
        .collect();
    if verdicts.is_empty() {
        None
    } else {
        Some(verdicts)
    }
}

fn parse_statements(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| field(line, "STATEMENT"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
