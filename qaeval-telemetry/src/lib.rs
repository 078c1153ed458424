//! # qaeval-telemetry
//!
//! Structured logging for the qaeval binaries.
//!
//! Log output goes to stderr so it never interleaves with the report the
//! binaries print to stdout. Verbosity follows `RUST_LOG`.
//!
//! ## Usage
//!
//! ```rust
//! use qaeval_telemetry::{init_telemetry, info};
//!
//! init_telemetry("qaeval-evaluate").expect("Failed to initialize telemetry");
//! info!("starting");
//! ```

pub mod init;

// Re-export tracing macros for convenience
pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::{DEFAULT_FILTER, init_telemetry};
