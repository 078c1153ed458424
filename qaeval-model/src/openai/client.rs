//! OpenAI client implementation.

use super::config::OpenAIConfig;
use crate::convert::{self, ChatCompletionResponse, EmbeddingBody, EmbeddingResponse, send_json};
use async_trait::async_trait;
use qaeval_core::{CoreError, Embedder, Llm, LlmRequest, LlmResponse, Result};
use reqwest::Client;

const PROVIDER: &str = "OpenAI";

fn http_client(config: &OpenAIConfig) -> Result<Client> {
    if config.api_key.is_empty() {
        return Err(CoreError::Config("OpenAI API key must not be empty".to_string()));
    }
    Client::builder()
        .build()
        .map_err(|e| CoreError::Config(format!("Failed to create HTTP client: {e}")))
}

/// OpenAI chat-completions client.
pub struct OpenAIClient {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIClient {
    /// Create a new OpenAI chat client.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&config)?,
            config,
        })
    }
}

#[async_trait]
impl Llm for OpenAIClient {
    fn name(&self) -> &str {
        &self.config.chat_model
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        let body = convert::build_chat_body(Some(&self.config.chat_model), &request);
        tracing::debug!(provider = PROVIDER, model = %self.config.chat_model, "chat completion");

        let response: ChatCompletionResponse = send_json(
            self.client
                .post(self.config.url("chat/completions"))
                .bearer_auth(&self.config.api_key)
                .json(&body),
            PROVIDER,
            CoreError::Model,
        )
        .await?;

        Ok(convert::parse_chat_response(response))
    }
}

/// OpenAI embeddings client.
pub struct OpenAIEmbeddings {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIEmbeddings {
    /// Create a new OpenAI embeddings client.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(&config)?,
            config,
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbeddings {
    fn name(&self) -> &str {
        &self.config.embedding_model
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            provider = PROVIDER,
            model = %self.config.embedding_model,
            batch_size = texts.len(),
            "embedding batch"
        );

        let body = EmbeddingBody {
            model: Some(&self.config.embedding_model),
            input: texts,
        };
        let response: EmbeddingResponse = send_json(
            self.client
                .post(self.config.url("embeddings"))
                .bearer_auth(&self.config.api_key)
                .json(&body),
            PROVIDER,
            CoreError::Embedding,
        )
        .await?;

        convert::parse_embedding_response(PROVIDER, response, texts.len())
    }
}
