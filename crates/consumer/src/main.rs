use auth::{RequestSigner, SignerConfig, SignerCredentials};
use common::RetryPolicy;
use rest_client::RestClient;
use serde::Deserialize;
use tracing::{error, info, warn};

/// Reply from the verifier's status endpoint.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    ok: bool,
    from: Option<String>,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    common::init_logging();

    let credentials = match SignerCredentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "Failed to load signer credentials");
            std::process::exit(1);
        }
    };

    let period_seconds = match env_or("SIGNER_PERIOD_SECONDS", "60").parse::<u64>() {
        Ok(period) => period,
        Err(_) => {
            error!("SIGNER_PERIOD_SECONDS must be a positive integer");
            std::process::exit(1);
        }
    };

    let config = SignerConfig {
        period_seconds,
        key_header: env_or("SIGNER_KEY_HEADER", "X-Api-Key"),
    };

    let signer = match RequestSigner::with_config(&credentials, config) {
        Ok(signer) => signer,
        Err(e) => {
            error!(error = %e, "Failed to construct signer");
            std::process::exit(1);
        }
    };

    let base_url = env_or("SERVICE_BASE_URL", "http://localhost:3009");
    let status_path = env_or("STATUS_PATH", "/internal/status");

    let client = match RestClient::with_default_timeout(&base_url) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    let full_url = format!("{}{}", client.base_url(), status_path);
    info!(api_key = credentials.api_key(), url = %full_url, "Checking service status");
    let policy = RetryPolicy::default();
    let mut attempt = 0;

    loop {
        // Sign freshly on every attempt: a header set reused across a
        // rotation boundary fails verification server-side.
        let headers = match signer.sign_headers("GET", &full_url) {
            Ok(headers) => headers,
            Err(e) => {
                error!(error = %e, "Signing failed");
                std::process::exit(1);
            }
        };

        match client
            .get::<StatusResponse>(&status_path, None, Some(&headers))
            .await
        {
            Ok(status) => {
                info!(ok = status.ok, from = ?status.from, "Status check succeeded");
                break;
            }
            Err(e) if e.is_retryable() && attempt + 1 < policy.max_attempts() => {
                let delay = policy.delay_for(attempt);
                warn!(
                    error = %e,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(error = %e, "Status check failed");
                std::process::exit(1);
            }
        }
    }
}
