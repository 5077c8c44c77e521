//! Time-rotating HMAC-SHA256 request signing.

use crate::clock::{Clock, SystemClock};
use crate::credentials::SignerCredentials;
use crate::error::AuthError;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Default rotation period for the derived signing key.
const DEFAULT_PERIOD_SECONDS: u64 = 60;

/// Default header carrying the API key.
const DEFAULT_KEY_HEADER: &str = "X-Api-Key";

/// Header carrying the request timestamp.
const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Header carrying the request signature.
const SIGNATURE_HEADER: &str = "X-Signature";

/// Signer configuration beyond the credentials themselves.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// How often the derived signing key changes, in seconds. Must be
    /// positive.
    pub period_seconds: u64,
    /// Header name used for the API key. Some deployments expect
    /// `X-Service` instead of the default `X-Api-Key`.
    pub key_header: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            period_seconds: DEFAULT_PERIOD_SECONDS,
            key_header: DEFAULT_KEY_HEADER.to_string(),
        }
    }
}

/// Request signer producing time-rotating HMAC authentication headers.
///
/// Each signing call derives a short-lived key from the base secret and
/// the current time slice, signs a canonical representation of the
/// request with it, and emits three headers: the API key, an ISO-8601
/// UTC timestamp, and the base64 signature.
pub struct RequestSigner<'a> {
    credentials: &'a SignerCredentials,
    config: SignerConfig,
    clock: Arc<dyn Clock>,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer with the default configuration.
    pub fn new(credentials: &'a SignerCredentials) -> Result<Self, AuthError> {
        Self::with_config(credentials, SignerConfig::default())
    }

    /// Create a signer with explicit configuration.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidConfig` if the rotation period is zero,
    /// or the API key, base secret, or key header name is empty. A zero
    /// period would make the slice arithmetic undefined, so it is rejected
    /// here rather than at first use.
    pub fn with_config(
        credentials: &'a SignerCredentials,
        config: SignerConfig,
    ) -> Result<Self, AuthError> {
        if config.period_seconds == 0 {
            return Err(AuthError::InvalidConfig("rotation period must be positive"));
        }
        if credentials.api_key().is_empty() {
            return Err(AuthError::InvalidConfig("api key must not be empty"));
        }
        if credentials.expose_secret().is_empty() {
            return Err(AuthError::InvalidConfig("base secret must not be empty"));
        }
        if config.key_header.is_empty() {
            return Err(AuthError::InvalidConfig("key header must not be empty"));
        }

        Ok(Self {
            credentials,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock source.
    ///
    /// Tests pin the clock to exercise slice boundaries deterministically.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sign a request and return the authentication headers.
    ///
    /// This method:
    /// 1. Extracts the path component from the full URL
    /// 2. Formats the current UTC time with second precision
    /// 3. Derives the signing key for the current time slice
    /// 4. Signs the canonical string `METHOD\npath\napi_key\ntimestamp`
    ///
    /// # Arguments
    /// * `method` - HTTP method (case-insensitive)
    /// * `full_url` - Full request URL; only the path is signed
    ///
    /// # Returns
    /// Exactly three header pairs, in order: key header, `X-Timestamp`,
    /// `X-Signature`.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidInput` if method or URL is empty, and
    /// `AuthError::ClockUnavailable` if the clock cannot be read.
    pub fn sign_headers(
        &self,
        method: &str,
        full_url: &str,
    ) -> Result<Vec<(String, String)>, AuthError> {
        if method.is_empty() {
            return Err(AuthError::InvalidInput("method must not be empty"));
        }
        if full_url.is_empty() {
            return Err(AuthError::InvalidInput("url must not be empty"));
        }

        let now = self.clock.unix_seconds()?;
        let path = extract_path(full_url);
        let timestamp = iso_timestamp(now)?;
        let derived = self.derive_secret(now);

        let canonical = canonical_string(method, path, self.credentials.api_key(), &timestamp);

        let mut mac = HmacSha256::new_from_slice(derived.as_ref())
            .expect("HMAC can take key of any size");
        mac.update(canonical.as_bytes());
        let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        Ok(vec![
            (
                self.config.key_header.clone(),
                self.credentials.api_key().to_string(),
            ),
            (TIMESTAMP_HEADER.to_string(), timestamp),
            (SIGNATURE_HEADER.to_string(), signature),
        ])
    }

    /// Derive the signing key for the time slice containing `unix_seconds`.
    ///
    /// The slice number changes every `period_seconds`, so two calls within
    /// the same slice derive the same key and calls straddling a boundary
    /// do not. The raw digest is the signing key; it is wiped on drop.
    fn derive_secret(&self, unix_seconds: u64) -> Zeroizing<[u8; 32]> {
        let slice = unix_seconds / self.config.period_seconds;

        let mut mac = HmacSha256::new_from_slice(self.credentials.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(slice.to_string().as_bytes());
        let digest: [u8; 32] = mac.finalize().into_bytes().into();

        Zeroizing::new(digest)
    }
}

/// Extract the path component of a URL.
///
/// Scheme, host, and query string are stripped; fragments are not
/// handled. A URL with no path segment yields `"/"`.
fn extract_path(full_url: &str) -> &str {
    let start = match full_url.find("://") {
        Some(pos) => pos + 3,
        None => 0,
    };

    let slash = match full_url[start..].find('/') {
        Some(offset) => start + offset,
        None => return "/",
    };

    match full_url[slash..].find('?') {
        Some(offset) => &full_url[slash..slash + offset],
        None => &full_url[slash..],
    }
}

/// Format a Unix timestamp as `YYYY-MM-DDTHH:MM:SSZ` (UTC, second precision).
fn iso_timestamp(unix_seconds: u64) -> Result<String, AuthError> {
    let seconds = i64::try_from(unix_seconds).map_err(|_| AuthError::ClockUnavailable)?;
    let datetime =
        chrono::DateTime::from_timestamp(seconds, 0).ok_or(AuthError::ClockUnavailable)?;

    Ok(datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Build the canonical string that gets signed.
///
/// Newlines in any field would corrupt the canonical form; inputs are
/// not escaped.
fn canonical_string(method: &str, path: &str, api_key: &str, timestamp: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        path,
        api_key,
        timestamp
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const FIXED_TIME: u64 = 1_700_000_000; // 2023-11-14T22:13:20Z

    fn test_credentials() -> SignerCredentials {
        SignerCredentials::new("core".into(), "super-secret-b".into())
    }

    fn pinned_signer(
        credentials: &SignerCredentials,
        period_seconds: u64,
        at: u64,
    ) -> (RequestSigner<'_>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(at));
        let config = SignerConfig {
            period_seconds,
            ..SignerConfig::default()
        };
        let signer = RequestSigner::with_config(credentials, config)
            .unwrap()
            .with_clock(clock.clone());

        (signer, clock)
    }

    #[test]
    fn test_extract_path_host_and_port() {
        assert_eq!(
            extract_path("http://localhost:3009/internal/status"),
            "/internal/status"
        );
        assert_eq!(
            extract_path("http://192.168.1.245:8089/api/v2/nodes"),
            "/api/v2/nodes"
        );
    }

    #[test]
    fn test_extract_path_no_path_segment() {
        assert_eq!(extract_path("http://host"), "/");
        assert_eq!(extract_path("http://host:8080"), "/");
    }

    #[test]
    fn test_extract_path_strips_query() {
        assert_eq!(extract_path("http://host/path?x=1"), "/path");
        assert_eq!(
            extract_path("http://host/a/b?x=1&y=2"),
            "/a/b"
        );
    }

    #[test]
    fn test_extract_path_schemeless() {
        assert_eq!(extract_path("localhost:3009/internal/status"), "/internal/status");
        assert_eq!(extract_path("/path?x=1"), "/path");
        assert_eq!(extract_path("no-slash-at-all"), "/");
    }

    #[test]
    fn test_extract_path_keeps_fragment() {
        // Fragments are deliberately not handled
        assert_eq!(extract_path("http://host/path#frag"), "/path#frag");
    }

    #[test]
    fn test_iso_timestamp_format() {
        assert_eq!(iso_timestamp(0).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(iso_timestamp(FIXED_TIME).unwrap(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_canonical_string_uppercases_method() {
        let canonical = canonical_string("get", "/x", "core", "2023-11-14T22:13:20Z");
        assert_eq!(canonical, "GET\n/x\ncore\n2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_header_shape_and_order() {
        let creds = test_credentials();
        let (signer, _) = pinned_signer(&creds, 60, FIXED_TIME);

        let headers = signer
            .sign_headers("GET", "http://localhost:3009/internal/status")
            .unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0].0, "X-Api-Key");
        assert_eq!(headers[0].1, "core");
        assert_eq!(headers[1].0, "X-Timestamp");
        assert_eq!(headers[1].1, "2023-11-14T22:13:20Z");
        assert_eq!(headers[2].0, "X-Signature");
    }

    #[test]
    fn test_key_header_is_configurable() {
        let creds = test_credentials();
        let config = SignerConfig {
            key_header: "X-Service".into(),
            ..SignerConfig::default()
        };
        let signer = RequestSigner::with_config(&creds, config).unwrap();

        let headers = signer.sign_headers("GET", "http://host/x").unwrap();
        assert_eq!(headers[0].0, "X-Service");
        assert_eq!(headers[0].1, "core");
    }

    #[test]
    fn test_signature_is_base64_of_32_bytes() {
        let creds = test_credentials();
        let (signer, _) = pinned_signer(&creds, 60, FIXED_TIME);

        let headers = signer
            .sign_headers("GET", "http://localhost:3009/internal/status")
            .unwrap();

        let raw = general_purpose::STANDARD.decode(&headers[2].1).unwrap();
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn test_deterministic_with_pinned_clock() {
        let creds = test_credentials();
        let (signer, _) = pinned_signer(&creds, 60, FIXED_TIME);

        let first = signer
            .sign_headers("GET", "http://localhost:3009/internal/status")
            .unwrap();
        let second = signer
            .sign_headers("GET", "http://localhost:3009/internal/status")
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_method_case_does_not_change_signature() {
        let creds = test_credentials();
        let (signer, _) = pinned_signer(&creds, 60, FIXED_TIME);

        let lower = signer.sign_headers("get", "http://host/x").unwrap();
        let upper = signer.sign_headers("GET", "http://host/x").unwrap();

        assert_eq!(lower, upper);
    }

    #[test]
    fn test_signature_rotates_across_slice_boundary() {
        let creds = test_credentials();
        let (signer, clock) = pinned_signer(&creds, 5, FIXED_TIME);

        let before = signer.sign_headers("GET", "http://host/x").unwrap();

        // FIXED_TIME is a multiple of 5, so +5 lands in the next slice
        clock.set(FIXED_TIME + 5);
        let after = signer.sign_headers("GET", "http://host/x").unwrap();

        assert_ne!(before[2].1, after[2].1);
    }

    #[test]
    fn test_derived_key_depends_on_rotation_period() {
        // Same instant, same canonical string, different period: only the
        // derived key differs, so the signatures must differ.
        let creds = test_credentials();
        let (five, _) = pinned_signer(&creds, 5, FIXED_TIME);
        let (sixty, _) = pinned_signer(&creds, 60, FIXED_TIME);

        let a = five.sign_headers("GET", "http://host/x").unwrap();
        let b = sixty.sign_headers("GET", "http://host/x").unwrap();

        assert_eq!(a[1].1, b[1].1);
        assert_ne!(a[2].1, b[2].1);
    }

    #[test]
    fn test_signature_sensitivity() {
        let creds = test_credentials();
        let (signer, _) = pinned_signer(&creds, 60, FIXED_TIME);
        let base = signer.sign_headers("GET", "http://host/x").unwrap();

        let other_method = signer.sign_headers("POST", "http://host/x").unwrap();
        assert_ne!(base[2].1, other_method[2].1);

        let other_path = signer.sign_headers("GET", "http://host/y").unwrap();
        assert_ne!(base[2].1, other_path[2].1);

        let other_key = SignerCredentials::new("edge".into(), "super-secret-b".into());
        let (signer, _) = pinned_signer(&other_key, 60, FIXED_TIME);
        let with_other_key = signer.sign_headers("GET", "http://host/x").unwrap();
        assert_ne!(base[2].1, with_other_key[2].1);

        let other_secret = SignerCredentials::new("core".into(), "super-secret-c".into());
        let (signer, _) = pinned_signer(&other_secret, 60, FIXED_TIME);
        let with_other_secret = signer.sign_headers("GET", "http://host/x").unwrap();
        assert_ne!(base[2].1, with_other_secret[2].1);
    }

    #[test]
    fn test_conformance_fixture() {
        // Rebuild the expected signature from the raw primitives and check
        // the signer produces the same value end to end.
        let creds = test_credentials();
        let (signer, _) = pinned_signer(&creds, 5, FIXED_TIME);

        let headers = signer
            .sign_headers("GET", "http://localhost:3009/internal/status")
            .unwrap();

        let slice = FIXED_TIME / 5;
        let mut mac = HmacSha256::new_from_slice(b"super-secret-b").unwrap();
        mac.update(slice.to_string().as_bytes());
        let derived = mac.finalize().into_bytes();

        let canonical = "GET\n/internal/status\ncore\n2023-11-14T22:13:20Z";
        let mut mac = HmacSha256::new_from_slice(&derived).unwrap();
        mac.update(canonical.as_bytes());
        let expected = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        assert_eq!(headers[0], ("X-Api-Key".to_string(), "core".to_string()));
        assert_eq!(
            headers[1],
            ("X-Timestamp".to_string(), "2023-11-14T22:13:20Z".to_string())
        );
        assert_eq!(headers[2], ("X-Signature".to_string(), expected));
    }

    #[test]
    fn test_rejects_zero_period() {
        let creds = test_credentials();
        let config = SignerConfig {
            period_seconds: 0,
            ..SignerConfig::default()
        };

        let err = RequestSigner::with_config(&creds, config).unwrap_err();
        assert!(matches!(err, AuthError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_empty_credentials() {
        let no_key = SignerCredentials::new("".into(), "secret".into());
        assert!(matches!(
            RequestSigner::new(&no_key).unwrap_err(),
            AuthError::InvalidConfig(_)
        ));

        let no_secret = SignerCredentials::new("core".into(), "".into());
        assert!(matches!(
            RequestSigner::new(&no_secret).unwrap_err(),
            AuthError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let creds = test_credentials();
        let signer = RequestSigner::new(&creds).unwrap();

        assert!(matches!(
            signer.sign_headers("", "http://host/x").unwrap_err(),
            AuthError::InvalidInput(_)
        ));
        assert!(matches!(
            signer.sign_headers("GET", "").unwrap_err(),
            AuthError::InvalidInput(_)
        ));
    }
}
