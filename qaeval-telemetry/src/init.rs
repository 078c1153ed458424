//! Telemetry initialization

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize console logging.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// A subscriber installed elsewhere (e.g. by a test harness) is left alone.
///
/// # Arguments
/// * `service_name` - Name recorded on the initialization event
///
/// # Example
/// ```
/// use qaeval_telemetry::init_telemetry;
/// init_telemetry("qaeval-check-config").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = Ok(());

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        result = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(|e| e.into());

        tracing::info!(service.name = service_name, "Telemetry initialized");
    });

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_telemetry("test-service").is_ok());
        assert!(init_telemetry("test-service").is_ok());
    }
}
