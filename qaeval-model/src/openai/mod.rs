//! OpenAI provider.
//!
//! Chat completions and embeddings against the standard OpenAI API or an
//! OpenAI-compatible base URL. This is the default service the evaluator
//! falls back to when the Azure handles fail.
//!
//! # Example
//!
//! ```rust,ignore
//! use qaeval_model::openai::{OpenAIClient, OpenAIConfig, OpenAIEmbeddings};
//!
//! let config = OpenAIConfig::new(std::env::var("OPENAI_API_KEY").unwrap());
//! let llm = OpenAIClient::new(config.clone())?;
//! let embeddings = OpenAIEmbeddings::new(config)?;
//! ```

mod client;
mod config;

pub use client::{OpenAIClient, OpenAIEmbeddings};
pub use config::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL, OpenAIConfig};
