//! Secure credential management for the request signer.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the base
//! secret and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Identity and base secret used to sign outbound requests.
///
/// The base secret is long-lived; only the derived key rotates. It is
/// wrapped in `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct SignerCredentials {
    api_key: String,
    base_secret: SecretString,
}

impl SignerCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `SIGNER_API_KEY` - The service identifier sent in the key header (public)
    /// - `SIGNER_BASE_SECRET` - The base secret for key derivation (private)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is not set.
    pub fn from_env() -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let api_key = std::env::var("SIGNER_API_KEY")
            .map_err(|_| AuthError::MissingEnvVar("SIGNER_API_KEY".into()))?;

        let base_secret = std::env::var("SIGNER_BASE_SECRET")
            .map_err(|_| AuthError::MissingEnvVar("SIGNER_BASE_SECRET".into()))?;

        Ok(Self::new(api_key, base_secret))
    }

    /// Create credentials from explicit values.
    ///
    /// Useful for testing or when credentials come from other sources.
    pub fn new(api_key: String, base_secret: String) -> Self {
        Self {
            api_key,
            base_secret: SecretString::from(base_secret),
        }
    }

    /// Get the API key (public, safe to log).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the base secret for key derivation.
    ///
    /// **WARNING**: Only use this for cryptographic operations.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.base_secret.expose_secret()
    }
}

impl std::fmt::Debug for SignerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerCredentials")
            .field("api_key", &self.api_key)
            .field("base_secret", &"[REDACTED]")
            .finish()
    }
}
