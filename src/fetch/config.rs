//! Construction-time configuration for the fetch layer

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cache::CacheStore;

/// Base URL of the SofaScore public JSON API
pub const DEFAULT_BASE_URL: &str = "https://api.sofascore.com/api/v1";

/// Cache entries older than this read as misses (6 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 6);

pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;

pub const DEFAULT_MAX_RETRIES: u32 = 5;

pub const DEFAULT_BACKOFF_BASE: f64 = 1.5;

/// Timeout applied to each individual HTTP attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Invalid `FetchConfig` values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    #[error("max_retries must be at least 1")]
    ZeroRetries,

    #[error("backoff base must be a finite number >= 1.0, got {0}")]
    InvalidBackoffBase(f64),

    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Immutable settings bound when a `FetchClient` is constructed
///
/// `Default` carries the documented fallbacks; use the `with_*` methods to
/// override individual fields.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Prefix joined with request paths (trailing `/` is ignored)
    pub base_url: String,
    /// Headers sent with every request, in insertion order
    pub headers: Vec<(String, String)>,
    /// Directory holding cache files
    pub cache_dir: PathBuf,
    /// Age after which cached entries are ignored
    pub ttl: Duration,
    /// Global request budget; clamped to at least 1
    pub requests_per_minute: u32,
    /// Total attempts per fetch, including the first
    pub max_retries: u32,
    /// Backoff before attempt `n + 1` is `backoff_base ^ n` seconds
    pub backoff_base: f64,
    /// Per-attempt timeout
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: default_headers(),
            cache_dir: CacheStore::default_dir(),
            ttl: DEFAULT_TTL,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Descriptive client identifier plus a JSON `Accept` header
pub fn default_headers() -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), default_user_agent()),
        ("Accept".to_string(), "application/json".to_string()),
    ]
}

fn default_user_agent() -> String {
    format!(
        "matchday/{} (research client; academic use)",
        env!("CARGO_PKG_VERSION")
    )
}

impl FetchConfig {
    /// Sets the endpoint prefix that relative paths are joined to
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets a header, replacing any existing header with the same name (case-insensitive)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Sets the directory holding cache entries
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Sets the age after which a cached entry reads as a miss
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the request budget; zero is clamped to one
    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    /// Sets the total number of attempts per fetch, including the first
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base of the `base^n` second backoff between attempts
    pub fn with_backoff_base(mut self, backoff_base: f64) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Sets the per-attempt request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request budget after clamping to at least one request per minute
    pub fn effective_requests_per_minute(&self) -> u32 {
        self.requests_per_minute.max(1)
    }

    /// Checks the values that would otherwise make the fetch loop misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalized_base_url().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if !self.backoff_base.is_finite() || self.backoff_base < 1.0 {
            return Err(ConfigError::InvalidBackoffBase(self.backoff_base));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_documented_fallbacks() {
        let config = FetchConfig::default();
        assert_eq!(config.base_url, "https://api.sofascore.com/api/v1");
        assert_eq!(config.ttl, Duration::from_secs(21_600));
        assert_eq!(config.requests_per_minute, 30);
        assert_eq!(config.max_retries, 5);
        assert!((config.backoff_base - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_headers_identify_client_and_accept_json() {
        let headers = default_headers();
        let ua = headers
            .iter()
            .find(|(n, _)| n == "User-Agent")
            .map(|(_, v)| v.as_str())
            .unwrap();
        assert!(ua.starts_with("matchday/"));
        assert!(headers
            .iter()
            .any(|(n, v)| n == "Accept" && v == "application/json"));
    }

    #[test]
    fn test_with_header_replaces_case_insensitively() {
        let config = FetchConfig::default().with_header("user-agent", "custom/1.0");
        let agents: Vec<_> = config
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("user-agent"))
            .collect();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].1, "custom/1.0");
    }

    #[test]
    fn test_base_url_trailing_slash_is_ignored() {
        let config = FetchConfig::default().with_base_url("http://localhost:8080/api/");
        assert_eq!(config.normalized_base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_requests_per_minute_is_clamped() {
        let config = FetchConfig::default().with_requests_per_minute(0);
        assert_eq!(config.effective_requests_per_minute(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            FetchConfig::default().with_max_retries(0).validate(),
            Err(ConfigError::ZeroRetries)
        );
        assert_eq!(
            FetchConfig::default().with_base_url("/").validate(),
            Err(ConfigError::EmptyBaseUrl)
        );
        assert!(matches!(
            FetchConfig::default().with_backoff_base(0.5).validate(),
            Err(ConfigError::InvalidBackoffBase(_))
        ));
        assert!(matches!(
            FetchConfig::default().with_backoff_base(f64::NAN).validate(),
            Err(ConfigError::InvalidBackoffBase(_))
        ));
    }
}
