//! # qaeval-cli
//!
//! Command-line tools for RAG evaluation against Azure OpenAI.
//!
//! ## Overview
//!
//! - `qaeval-check-config` - reports the Azure OpenAI environment and makes
//!   one chat call and one embedding call ([`config_check`])
//! - `qaeval-evaluate [csv_path]` - scores a question/answer CSV and writes
//!   `ragas_evaluation_results.csv` ([`runner`])
//!
//! Both load a `.env` file from the working directory before reading the
//! environment.

pub mod cli;
pub mod config_check;
pub mod runner;

pub use cli::{CheckConfigCli, EvaluateCli};
pub use runner::{DEFAULT_INPUT, DEFAULT_OUTPUT, RunOptions};
