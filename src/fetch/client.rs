//! Cached, rate-limited, retrying GET client
//!
//! A fetch checks the cache first; hits return without touching the network
//! or the rate limiter. Misses run the retry loop until success, a fatal
//! status, or the attempt ceiling. Each attempt is admitted by the shared
//! limiter; backoff sleeps happen outside it.

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use super::config::{ConfigError, FetchConfig};
use super::error::FetchError;
use super::rate_limiter::RateLimiter;
use super::retry::{FatalCause, RetryPolicy, Verdict};
use super::transport::{ReqwestTransport, Transport};
use crate::cache::{CacheKey, CacheStore, QueryParams};

/// Client for a single upstream JSON API
///
/// Cloning is cheap and clones share the same rate limiter, so one budget
/// covers every task that uses the client.
#[derive(Clone)]
pub struct FetchClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    cache: CacheStore,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl FetchClient {
    /// Creates a client that talks to the network through `reqwest`
    pub fn new(config: FetchConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client with a custom transport
    pub fn with_transport(
        config: FetchConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            "FetchClient initialized (base_url={}, cache_dir={}, ttl={}s, rpm={})",
            config.normalized_base_url(),
            config.cache_dir.display(),
            config.ttl.as_secs(),
            config.effective_requests_per_minute()
        );

        Ok(Self {
            base_url: config.normalized_base_url().to_string(),
            transport,
            cache: CacheStore::new(config.cache_dir.clone(), config.ttl),
            limiter: Arc::new(RateLimiter::new(config.effective_requests_per_minute())),
            policy: RetryPolicy::new(config.max_retries, config.backoff_base),
        })
    }

    /// The disk cache backing this client
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Joins `path` onto the base URL; absolute `http(s)://` URLs are returned unchanged
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Cache key for a request as `fetch` would compute it
    pub fn cache_key(&self, path: &str, params: &QueryParams) -> CacheKey {
        CacheKey::new(&self.resolve_url(path), params)
    }

    /// Fetches the raw JSON body for `path` with `params`
    ///
    /// # Errors
    /// * `FetchError::Upstream` - a non-retryable HTTP status, returned after one attempt
    /// * `FetchError::RetryExhausted` - every allowed attempt was retryable
    /// * `FetchError::Transport` - the request could not be built
    pub async fn fetch(
        &self,
        path: &str,
        params: &QueryParams,
        use_cache: bool,
    ) -> Result<Vec<u8>, FetchError> {
        let url = self.resolve_url(path);
        let key = CacheKey::new(&url, params);

        if use_cache {
            if let Some(payload) = self.cache.lookup(&key) {
                debug!("Cache hit for {}", url);
                return Ok(payload);
            }
        }

        let mut attempt = 1;
        loop {
            // Every attempt, retries included, is admitted by the shared limiter
            self.limiter.wait().await;
            info!("GET {} (attempt {})", url, attempt);
            let outcome = self.transport.get(&url, params).await;

            match self.policy.classify(outcome) {
                Verdict::Success(body) => {
                    if use_cache {
                        self.cache.store(&key, &body);
                    }
                    return Ok(body);
                }
                Verdict::Retryable(cause) => {
                    if !self.policy.allows_another(attempt) {
                        error!("Giving up on {} after {} attempts: {}", url, attempt, cause);
                        return Err(FetchError::RetryExhausted {
                            url,
                            attempts: attempt,
                            last: cause,
                        });
                    }
                    let delay = self.policy.delay(attempt);
                    warn!(
                        "{} for {}, backing off {:.1}s",
                        cause,
                        url,
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Verdict::Fatal(FatalCause::Status {
                    status,
                    body_excerpt,
                }) => {
                    error!("HTTP {} for {} - body: {}", status, url, body_excerpt);
                    return Err(FetchError::Upstream {
                        url,
                        status,
                        body_excerpt,
                    });
                }
                Verdict::Fatal(FatalCause::Transport(e)) => {
                    error!("Cannot issue request to {}: {}", url, e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Fetches and parses the body as untyped JSON
    pub async fn fetch_json(
        &self,
        path: &str,
        params: &QueryParams,
        use_cache: bool,
    ) -> Result<serde_json::Value, FetchError> {
        self.fetch_as(path, params, use_cache).await
    }

    /// Fetches and decodes the body into `T`
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        use_cache: bool,
    ) -> Result<T, FetchError> {
        let body = self.fetch(path, params, use_cache).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
