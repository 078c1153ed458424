//! Azure OpenAI provider.
//!
//! Chat completions and embeddings against deployments on an Azure OpenAI
//! resource. Requires the `azure` feature flag (on by default).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use qaeval_model::azure::{AzureOpenAIClient, AzureOpenAIConfig, AzureOpenAIEmbeddings};
//!
//! let config = AzureOpenAIConfig::new("https://my-resource.openai.azure.com/", "my-api-key");
//! let llm = AzureOpenAIClient::new(config.clone())?;
//! let embeddings = AzureOpenAIEmbeddings::new(config)?;
//! ```
//!
//! # Authentication
//!
//! Uses `api-key` header authentication with the resource endpoint.

mod client;
mod config;

pub use client::{AzureOpenAIClient, AzureOpenAIEmbeddings};
pub use config::AzureOpenAIConfig;
