//! Configuration types for the Azure OpenAI provider.

use crate::settings::{DEFAULT_API_VERSION, DEFAULT_EMBEDDING_DEPLOYMENT, DEFAULT_MODEL_DEPLOYMENT};
use serde::{Deserialize, Serialize};

/// Configuration for an Azure OpenAI resource.
///
/// One resource hosts both the chat deployment and the embedding deployment;
/// they share the endpoint, key, and API version.
#[derive(Clone, Serialize, Deserialize)]
pub struct AzureOpenAIConfig {
    /// Resource endpoint (e.g., `https://my-resource.openai.azure.com/`).
    pub endpoint: String,
    /// Azure OpenAI API key.
    pub api_key: String,
    /// REST API version (e.g., "2024-02-01").
    pub api_version: String,
    /// Deployment used for chat completions.
    pub chat_deployment: String,
    /// Deployment used for embeddings.
    pub embedding_deployment: String,
}

impl AzureOpenAIConfig {
    /// Create a config with the default API version and deployment names.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            chat_deployment: DEFAULT_MODEL_DEPLOYMENT.to_string(),
            embedding_deployment: DEFAULT_EMBEDDING_DEPLOYMENT.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_chat_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.chat_deployment = deployment.into();
        self
    }

    pub fn with_embedding_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.embedding_deployment = deployment.into();
        self
    }

    /// URL for an operation (`chat/completions`, `embeddings`) on a deployment.
    pub(crate) fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint.trim_end_matches('/'),
            deployment,
            operation,
            self.api_version
        )
    }
}

impl std::fmt::Debug for AzureOpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAIConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &crate::mask_secret(&self.api_key))
            .field("api_version", &self.api_version)
            .field("chat_deployment", &self.chat_deployment)
            .field("embedding_deployment", &self.embedding_deployment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AzureOpenAIConfig::new("https://res.openai.azure.com/", "key");
        assert_eq!(config.api_version, "2024-02-01");
        assert_eq!(config.chat_deployment, "gpt-4");
        assert_eq!(config.embedding_deployment, "text-embedding-ada-002");
    }

    #[test]
    fn test_deployment_url_trims_trailing_slash() {
        let config = AzureOpenAIConfig::new("https://res.openai.azure.com/", "key")
            .with_api_version("2024-06-01");
        assert_eq!(
            config.deployment_url("gpt-4", "chat/completions"),
            "https://res.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = AzureOpenAIConfig::new("https://res.openai.azure.com", "abcdefgh12345678wxyz");
        let debug = format!("{config:?}");
        assert!(!debug.contains("abcdefgh12345678wxyz"));
        assert!(debug.contains("abcdefgh...wxyz"));
    }
}
