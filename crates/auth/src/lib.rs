//! Authentication and signing for internal service-to-service calls.
//!
//! This crate provides secure credential management and time-rotating
//! HMAC request signing for authenticated HTTP calls between services.
//!
//! # Features
//!
//! - **Secure Credentials**: the base secret is wrapped in `SecretString` to
//!   prevent accidental logging and ensure memory is zeroed on drop.
//! - **Rotating Derived Keys**: the signing key is derived from the base
//!   secret and the current time slice, so the validity of any single key is
//!   bounded by the rotation period.
//! - **Injectable Clock**: the wall-clock read sits behind the [`Clock`]
//!   trait, making slice-boundary behavior testable without elapsed time.
//! - **Environment Loading**: credentials can be loaded from environment
//!   variables or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{RequestSigner, SignerCredentials};
//!
//! // Load credentials from environment
//! let credentials = SignerCredentials::from_env()?;
//!
//! // Create a signer and produce headers for an outbound request
//! let signer = RequestSigner::new(&credentials)?;
//! let headers = signer.sign_headers("GET", "http://localhost:3009/internal/status")?;
//! ```

mod clock;
mod credentials;
mod error;
mod signer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::SignerCredentials;
pub use error::AuthError;
pub use signer::{RequestSigner, SignerConfig};
