//! Shared infrastructure for the service binaries.

mod retry;

pub use retry::RetryPolicy;

/// Initialize tracing for a binary.
///
/// Respects the `RUST_LOG` env var; defaults to `info`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
