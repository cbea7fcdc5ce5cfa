//! Resilient fetch layer for rate-limited upstream JSON APIs
//!
//! `FetchClient` ties together the disk cache, a global `RateLimiter`, and a
//! `RetryPolicy` with exponential backoff over a pluggable `Transport`.

mod client;
mod config;
mod error;
mod rate_limiter;
mod retry;
mod transport;

pub use client::FetchClient;
pub use config::{
    default_headers, ConfigError, FetchConfig, DEFAULT_BACKOFF_BASE, DEFAULT_BASE_URL,
    DEFAULT_MAX_RETRIES, DEFAULT_REQUESTS_PER_MINUTE, DEFAULT_TIMEOUT, DEFAULT_TTL,
};
pub use error::{body_excerpt, FetchError, RetryCause, TransportError, BODY_EXCERPT_CHARS};
pub use rate_limiter::RateLimiter;
pub use retry::{FatalCause, RetryPolicy, Verdict, RETRYABLE_STATUSES};
pub use transport::{RawResponse, ReqwestTransport, Transport};
