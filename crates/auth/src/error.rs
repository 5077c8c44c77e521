use thiserror::Error;

/// Errors that can occur during credential loading or request signing.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The signer was constructed with unusable configuration.
    #[error("Invalid signer configuration: {0}")]
    InvalidConfig(&'static str),

    /// A signing input was empty.
    #[error("Invalid signing input: {0}")]
    InvalidInput(&'static str),

    /// The host clock could not be read.
    #[error("System clock unavailable")]
    ClockUnavailable,
}
