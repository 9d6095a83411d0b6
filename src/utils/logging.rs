// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable.
/// Defaults to "info" if `RUST_LOG` is not set.
///
/// Returns `false` when a global subscriber was already installed.
pub fn setup_logging() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")); // Default to INFO level

    let installed = fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging setup complete.");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_setup_is_a_no_op() {
        setup_logging();
        assert!(!setup_logging());
    }
}
