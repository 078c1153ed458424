//! Service settings read once from the process environment.
//!
//! The binaries build a [`ServiceSettings`] at startup and pass it down;
//! nothing else in the workspace reads environment variables.

use qaeval_core::{CoreError, Result};

pub const AZURE_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const AZURE_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const AZURE_OPENAI_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const AZURE_OPENAI_MODEL_DEPLOYMENT: &str = "AZURE_OPENAI_MODEL_DEPLOYMENT";
pub const AZURE_OPENAI_EMBEDDING_DEPLOYMENT: &str = "AZURE_OPENAI_EMBEDDING_DEPLOYMENT";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Variables that must be set before any Azure client is built.
pub const REQUIRED_VARS: [&str; 2] = [AZURE_OPENAI_API_KEY, AZURE_OPENAI_ENDPOINT];

/// All Azure variables with their human-readable descriptions, in display order.
pub const AZURE_VARS: [(&str, &str); 5] = [
    (AZURE_OPENAI_API_KEY, "Azure OpenAI API Key"),
    (AZURE_OPENAI_ENDPOINT, "Azure OpenAI Endpoint"),
    (AZURE_OPENAI_API_VERSION, "Azure OpenAI API Version"),
    (AZURE_OPENAI_MODEL_DEPLOYMENT, "Azure OpenAI Model Deployment"),
    (AZURE_OPENAI_EMBEDDING_DEPLOYMENT, "Azure OpenAI Embedding Deployment"),
];

pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_MODEL_DEPLOYMENT: &str = "gpt-4";
pub const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-ada-002";

/// Snapshot of the service configuration.
///
/// Empty values are treated as unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServiceSettings {
    pub azure_api_key: Option<String>,
    pub azure_endpoint: Option<String>,
    pub api_version: Option<String>,
    pub model_deployment: Option<String>,
    pub embedding_deployment: Option<String>,
    pub openai_api_key: Option<String>,
}

impl ServiceSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            azure_api_key: get(AZURE_OPENAI_API_KEY),
            azure_endpoint: get(AZURE_OPENAI_ENDPOINT),
            api_version: get(AZURE_OPENAI_API_VERSION),
            model_deployment: get(AZURE_OPENAI_MODEL_DEPLOYMENT),
            embedding_deployment: get(AZURE_OPENAI_EMBEDDING_DEPLOYMENT),
            openai_api_key: get(OPENAI_API_KEY),
        }
    }

    /// Raw value of a known variable, without defaults applied.
    pub fn raw(&self, name: &str) -> Option<&str> {
        let value = match name {
            AZURE_OPENAI_API_KEY => &self.azure_api_key,
            AZURE_OPENAI_ENDPOINT => &self.azure_endpoint,
            AZURE_OPENAI_API_VERSION => &self.api_version,
            AZURE_OPENAI_MODEL_DEPLOYMENT => &self.model_deployment,
            AZURE_OPENAI_EMBEDDING_DEPLOYMENT => &self.embedding_deployment,
            OPENAI_API_KEY => &self.openai_api_key,
            _ => return None,
        };
        value.as_deref()
    }

    /// Required variables that are unset, in [`REQUIRED_VARS`] order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_VARS
            .into_iter()
            .filter(|name| self.raw(name).is_none())
            .collect()
    }

    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn model_deployment(&self) -> &str {
        self.model_deployment
            .as_deref()
            .unwrap_or(DEFAULT_MODEL_DEPLOYMENT)
    }

    pub fn embedding_deployment(&self) -> &str {
        self.embedding_deployment
            .as_deref()
            .unwrap_or(DEFAULT_EMBEDDING_DEPLOYMENT)
    }

    /// Azure config with defaults applied, or a config error naming the missing variables.
    #[cfg(feature = "azure")]
    pub fn azure_config(&self) -> Result<crate::azure::AzureOpenAIConfig> {
        let (Some(api_key), Some(endpoint)) = (&self.azure_api_key, &self.azure_endpoint) else {
            return Err(CoreError::Config(format!(
                "Missing required environment variables: {}",
                self.missing_required().join(", ")
            )));
        };

        Ok(crate::azure::AzureOpenAIConfig::new(endpoint, api_key)
            .with_api_version(self.api_version())
            .with_chat_deployment(self.model_deployment())
            .with_embedding_deployment(self.embedding_deployment()))
    }

    /// Build the Azure chat and embedding clients.
    #[cfg(feature = "azure")]
    pub fn azure_clients(
        &self,
    ) -> Result<(crate::azure::AzureOpenAIClient, crate::azure::AzureOpenAIEmbeddings)> {
        let config = self.azure_config()?;
        Ok((
            crate::azure::AzureOpenAIClient::new(config.clone())?,
            crate::azure::AzureOpenAIEmbeddings::new(config)?,
        ))
    }

    /// OpenAI config for the default service, when `OPENAI_API_KEY` is set.
    #[cfg(feature = "openai")]
    pub fn openai_config(&self) -> Option<crate::openai::OpenAIConfig> {
        self.openai_api_key
            .as_ref()
            .map(crate::openai::OpenAIConfig::new)
    }

    /// Build the default OpenAI chat and embedding clients.
    #[cfg(feature = "openai")]
    pub fn openai_clients(
        &self,
    ) -> Result<(crate::openai::OpenAIClient, crate::openai::OpenAIEmbeddings)> {
        let Some(config) = self.openai_config() else {
            return Err(CoreError::Config(format!("{OPENAI_API_KEY} is not set")));
        };
        Ok((
            crate::openai::OpenAIClient::new(config.clone())?,
            crate::openai::OpenAIEmbeddings::new(config)?,
        ))
    }
}

impl std::fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = |v: &Option<String>| v.as_deref().map(mask_secret);
        f.debug_struct("ServiceSettings")
            .field("azure_api_key", &masked(&self.azure_api_key))
            .field("azure_endpoint", &self.azure_endpoint)
            .field("api_version", &self.api_version)
            .field("model_deployment", &self.model_deployment)
            .field("embedding_deployment", &self.embedding_deployment)
            .field("openai_api_key", &masked(&self.openai_api_key))
            .finish()
    }
}

/// Mask a secret for display: first 8 and last 4 characters when longer
/// than 12 characters, `***` otherwise.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
