//! Generic REST client infrastructure.
//!
//! This crate provides a thin wrapper around `reqwest` with:
//!
//! - Consistent error handling via `RestError`
//! - JSON response deserialization
//! - Header injection for authentication
//! - Rejected-signature (401) detection
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::RestClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct StatusResponse {
//!     ok: bool,
//! }
//!
//! let client = RestClient::with_default_timeout("http://localhost:3009")?;
//! let status: StatusResponse = client.get("/internal/status", None, Some(&headers)).await?;
//! ```

mod client;
mod error;

pub use client::RestClient;
pub use error::RestError;
