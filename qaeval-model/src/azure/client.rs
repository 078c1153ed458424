//! Azure OpenAI client implementation.

use super::config::AzureOpenAIConfig;
use crate::convert::{self, ChatCompletionResponse, EmbeddingBody, EmbeddingResponse, send_json};
use async_trait::async_trait;
use qaeval_core::{CoreError, Embedder, Llm, LlmRequest, LlmResponse, Result};
use reqwest::Client;

const PROVIDER: &str = "Azure OpenAI";

fn http_client() -> Result<Client> {
    Client::builder()
        .build()
        .map_err(|e| CoreError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Azure OpenAI chat-completions client bound to one deployment.
///
/// # Example
///
/// ```rust,ignore
/// use qaeval_model::azure::{AzureOpenAIClient, AzureOpenAIConfig};
///
/// let config = AzureOpenAIConfig::new("https://my-resource.openai.azure.com/", "my-api-key")
///     .with_chat_deployment("gpt-4o");
/// let client = AzureOpenAIClient::new(config)?;
/// ```
pub struct AzureOpenAIClient {
    client: Client,
    config: AzureOpenAIConfig,
}

impl AzureOpenAIClient {
    /// Create a new Azure OpenAI chat client from the given config.
    pub fn new(config: AzureOpenAIConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    fn api_url(&self) -> String {
        self.config
            .deployment_url(&self.config.chat_deployment, "chat/completions")
    }
}

#[async_trait]
impl Llm for AzureOpenAIClient {
    fn name(&self) -> &str {
        &self.config.chat_deployment
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        let body = convert::build_chat_body(None, &request);
        tracing::debug!(
            provider = PROVIDER,
            deployment = %self.config.chat_deployment,
            messages = body.messages.len(),
            "chat completion"
        );

        let response: ChatCompletionResponse = send_json(
            self.client
                .post(self.api_url())
                .header("api-key", &self.config.api_key)
                .json(&body),
            PROVIDER,
            CoreError::Model,
        )
        .await?;

        Ok(convert::parse_chat_response(response))
    }
}

/// Azure OpenAI embeddings client bound to one deployment.
pub struct AzureOpenAIEmbeddings {
    client: Client,
    config: AzureOpenAIConfig,
}

impl AzureOpenAIEmbeddings {
    /// Create a new Azure OpenAI embeddings client from the given config.
    pub fn new(config: AzureOpenAIConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    fn api_url(&self) -> String {
        self.config
            .deployment_url(&self.config.embedding_deployment, "embeddings")
    }
}

#[async_trait]
impl Embedder for AzureOpenAIEmbeddings {
    fn name(&self) -> &str {
        &self.config.embedding_deployment
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            provider = PROVIDER,
            deployment = %self.config.embedding_deployment,
            batch_size = texts.len(),
            "embedding batch"
        );

        let body = EmbeddingBody {
            model: None,
            input: texts,
        };
        let response: EmbeddingResponse = send_json(
            self.client
                .post(self.api_url())
                .header("api-key", &self.config.api_key)
                .json(&body),
            PROVIDER,
            CoreError::Embedding,
        )
        .await?;

        convert::parse_embedding_response(PROVIDER, response, texts.len())
    }
}
