//! # qaeval-model
//!
//! Chat and embedding clients for the hosted services qaeval talks to.
//!
//! ## Overview
//!
//! - [`azure::AzureOpenAIClient`] / [`azure::AzureOpenAIEmbeddings`] - Azure OpenAI deployments
//! - [`openai::OpenAIClient`] / [`openai::OpenAIEmbeddings`] - the standard OpenAI API,
//!   used as the default service when no Azure handles are configured
//! - [`ServiceSettings`] - configuration read once from the environment
//! - [`MockLlm`] / [`MockEmbedder`] - scripted models for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qaeval_model::ServiceSettings;
//!
//! let settings = ServiceSettings::from_env();
//! let (llm, embeddings) = settings.azure_clients().unwrap();
//! ```
//!
//! Every client issues a single HTTP request per call. There is no retry
//! layer and no timeout beyond the `reqwest` defaults.

#[cfg(feature = "azure")]
pub mod azure;
#[cfg(any(feature = "azure", feature = "openai"))]
mod convert;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod settings;

pub use mock::{MockEmbedder, MockLlm};
pub use settings::{ServiceSettings, mask_secret};
