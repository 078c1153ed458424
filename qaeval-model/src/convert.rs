//! Wire types shared by the Azure OpenAI and OpenAI REST APIs.
//!
//! Both services accept the same chat-completions and embeddings bodies; the
//! only differences are the URL layout, the auth header, and whether `model`
//! is sent in the body (Azure routes by deployment in the path instead).

use qaeval_core::{Content, CoreError, FinishReason, LlmRequest, LlmResponse, Result, UsageMetadata};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── Chat completions ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Build a chat-completions body. `model` is `None` for Azure deployments.
pub(crate) fn build_chat_body<'a>(
    model: Option<&'a str>,
    request: &'a LlmRequest,
) -> ChatCompletionBody<'a> {
    let messages = request
        .contents
        .iter()
        .map(|c| ChatMessage {
            role: c.role.as_str(),
            content: c.text.as_str(),
        })
        .collect();
    let config = request.config.as_ref();

    ChatCompletionBody {
        model,
        messages,
        temperature: config.and_then(|c| c.temperature),
        max_tokens: config.and_then(|c| c.max_output_tokens),
    }
}

pub(crate) fn parse_chat_response(response: ChatCompletionResponse) -> LlmResponse {
    let usage_metadata = response.usage.map(|u| UsageMetadata {
        prompt_token_count: u.prompt_tokens,
        candidates_token_count: u.completion_tokens,
        total_token_count: u.total_tokens,
    });

    let Some(choice) = response.choices.into_iter().next() else {
        return LlmResponse {
            content: None,
            usage_metadata,
            finish_reason: None,
        };
    };

    let role = choice.message.role.as_deref().unwrap_or("assistant");
    LlmResponse {
        content: choice.message.content.map(|text| Content::new(role, text)),
        usage_metadata,
        finish_reason: choice
            .finish_reason
            .as_deref()
            .map(FinishReason::from_openai),
    }
}

// ── Embeddings ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingData {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: usize,
}

/// Order embeddings by their `index` field and check one came back per input.
pub(crate) fn parse_embedding_response(
    provider: &str,
    response: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(CoreError::Embedding(format!(
            "{provider} returned {} embeddings for {expected} inputs",
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

// ── Transport ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Send a prepared request and decode a JSON body.
///
/// Non-2xx responses are turned into an error through `to_error`, carrying
/// the service's own `error.message` when the body has one.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &str,
    to_error: fn(String) -> CoreError,
) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        tracing::error!(provider, error = %e, "request failed");
        to_error(format!("{provider} request failed: {e}"))
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| to_error(format!("{provider} response read failed: {e}")))?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        tracing::error!(provider, %status, "API error");
        return Err(to_error(format!("{provider} returned {status}: {detail}")));
    }

    serde_json::from_str(&body)
        .map_err(|e| to_error(format!("{provider} response parse failed: {e}")))
}
