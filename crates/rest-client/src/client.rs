//! Generic REST client wrapper around reqwest.

use crate::error::RestError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Generic REST client for making HTTP requests.
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for all requests (e.g., "http://localhost:3009")
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new REST client with default timeout.
    pub fn with_default_timeout(base_url: &str) -> Result<Self, RestError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request.
    ///
    /// # Arguments
    /// * `path` - Request path (e.g., "/internal/status")
    /// * `query` - Optional query string (without leading '?')
    /// * `headers` - Optional additional headers (e.g., signed auth headers)
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
        headers: Option<&[(String, String)]>,
    ) -> Result<T, RestError> {
        let url = self.build_url(path, query);
        tracing::debug!(url = %url, "GET request");

        let mut request = self.client.get(&url);

        if let Some(hdrs) = headers {
            for (key, value) in hdrs {
                request = request.header(key.as_str(), value.as_str());
            }
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    ///
    /// # Arguments
    /// * `path` - Request path
    /// * `body` - JSON-serialized request body
    /// * `headers` - Optional additional headers
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&[(String, String)]>,
    ) -> Result<T, RestError> {
        let url = self.build_url(path, None);
        tracing::debug!(url = %url, "POST request");

        let mut request = self.client.post(&url).json(body);

        if let Some(hdrs) = headers {
            for (key, value) in hdrs {
                request = request.header(key.as_str(), value.as_str());
            }
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Build a full URL from path and optional query string.
    fn build_url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base_url, path, q),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    /// Handle HTTP response and deserialize JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, RestError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                tracing::warn!(body = %body, error = %e, "Failed to parse response");
                RestError::Parse(e.to_string())
            })
        } else {
            let body = response.text().await.unwrap_or_default();

            // 401 means the verifier rejected the headers, often just a
            // signature signed under an expired rotation window
            if status.as_u16() == 401 {
                return Err(RestError::Unauthorized { message: body });
            }

            Err(RestError::HttpError {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
