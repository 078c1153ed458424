//! # qaeval-core
//!
//! Core traits and types shared by the qaeval crates.
//!
//! ## Overview
//!
//! - [`Llm`] - A hosted chat-completion model
//! - [`Embedder`] - A hosted embedding model
//! - [`CoreError`] / [`Result`] - Unified error handling
//!
//! Both traits take one request and return one response.
//! Provider clients live in `qaeval-model`; the evaluation engine in
//! `qaeval-eval` only ever talks to these traits.
//!
//! ```rust,ignore
//! use qaeval_core::{Content, Llm, LlmRequest};
//!
//! let request = LlmRequest::new(llm.name(), vec![Content::user("Hello, how are you?")])
//!     .with_temperature(0.0);
//! let response = llm.generate(request).await?;
//! println!("{}", response.text());
//! ```

pub mod embedding;
pub mod error;
pub mod model;

pub use embedding::{Embedder, cosine_similarity};
pub use error::{CoreError, Result};
pub use model::{
    Content, FinishReason, GenerateConfig, Llm, LlmRequest, LlmResponse, UsageMetadata,
};
