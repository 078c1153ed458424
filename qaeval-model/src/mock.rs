//! Scripted models for tests.

use async_trait::async_trait;
use qaeval_core::{Content, CoreError, Embedder, Llm, LlmRequest, LlmResponse, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chat model that replays queued replies, then repeats a default reply.
///
/// Every request is recorded so tests can assert on prompts.
pub struct MockLlm {
    name: String,
    responses: Mutex<VecDeque<Result<String>>>,
    default_response: Option<String>,
    failure: Option<String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
            default_response: None,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every call fails with a model error.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(name)
        }
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.lock_responses().push_back(Ok(text.into()));
        self
    }

    /// Queue a failed call, as a transport or service error would produce.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.lock_responses().push_back(Err(CoreError::Model(message.into())));
        self
    }

    /// Reply used once the queue is empty.
    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_response = Some(text.into());
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, req: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(req);
        }

        if let Some(message) = &self.failure {
            return Err(CoreError::Model(message.clone()));
        }

        let next = self.lock_responses().pop_front();
        let text = match next {
            Some(reply) => reply?,
            None => self.default_response.clone().ok_or_else(|| {
                CoreError::Model(format!("{}: no scripted response left", self.name))
            })?,
        };
        Ok(LlmResponse::new(Content::assistant(text)))
    }
}

/// Deterministic embedder.
///
/// Texts registered with [`with_embedding`](MockEmbedder::with_embedding)
/// return that vector; any other text maps to a letter-frequency vector, so
/// equal texts always embed identically.
pub struct MockEmbedder {
    name: String,
    fixed: HashMap<String, Vec<f32>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: HashMap::new(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// An embedder whose every call fails with an embedding error.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(name)
        }
    }

    pub fn with_embedding(mut self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.fixed.insert(text.into(), embedding);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn letter_frequencies(text: &str) -> Vec<f32> {
        let mut counts = vec![0.0f32; 27];
        for c in text.chars() {
            match c.to_ascii_lowercase() {
                c @ 'a'..='z' => counts[(c as u8 - b'a') as usize] += 1.0,
                c if c.is_alphanumeric() => counts[26] += 1.0,
                _ => {}
            }
        }
        counts
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(CoreError::Embedding(message.clone()));
        }

        Ok(texts
            .iter()
            .map(|text| {
                self.fixed
                    .get(*text)
                    .cloned()
                    .unwrap_or_else(|| Self::letter_frequencies(text))
            })
            .collect())
    }
}
