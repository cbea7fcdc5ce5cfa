//! Error types surfaced by the fetch layer

use thiserror::Error;

/// Maximum number of characters of an upstream body kept for diagnostics
pub const BODY_EXCERPT_CHARS: usize = 400;

/// A network-level failure while issuing one attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The attempt exceeded its per-request timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS resolution or TCP/TLS connection failed
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request failed after the connection was established
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request could not be built (e.g. an invalid URL); retrying cannot help
    #[error("invalid request: {0}")]
    Build(String),
}

impl TransportError {
    /// Whether a further attempt might succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Build(_))
    }
}

/// Why the last attempt of an exhausted retry loop failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryCause {
    #[error("HTTP {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// HTTP 200 whose body was not valid JSON
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

/// Terminal failure of a single fetch
///
/// Nothing is cached when a fetch fails; the caller decides whether to skip,
/// abort, or continue with an empty result.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every allowed attempt ended in a retryable outcome
    #[error("failed to GET {url} after {attempts} attempts (last: {last})")]
    RetryExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: RetryCause,
    },

    /// The upstream answered with a non-retryable status
    #[error("upstream returned HTTP {status} for {url}: {body_excerpt}")]
    Upstream {
        url: String,
        status: u16,
        body_excerpt: String,
    },

    /// A transport failure that is not worth retrying
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The payload was fetched but does not match the requested type
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status of an `Upstream` error or of the last exhausted attempt
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => Some(*status),
            FetchError::RetryExhausted {
                last: RetryCause::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Truncates a response body to at most `BODY_EXCERPT_CHARS` characters
pub fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_keeps_short_bodies() {
        assert_eq!(body_excerpt(b"{\"error\":\"not found\"}"), "{\"error\":\"not found\"}");
    }

    #[test]
    fn test_body_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_EXCERPT_CHARS + 10);
        let excerpt = body_excerpt(body.as_bytes());
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), BODY_EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_build_errors_are_not_retryable() {
        assert!(!TransportError::Build("bad url".into()).is_retryable());
        assert!(TransportError::Timeout("15s".into()).is_retryable());
        assert!(TransportError::Connect("dns".into()).is_retryable());
    }

    #[test]
    fn test_status_accessor() {
        let upstream = FetchError::Upstream {
            url: "u".into(),
            status: 404,
            body_excerpt: String::new(),
        };
        assert_eq!(upstream.status(), Some(404));

        let exhausted = FetchError::RetryExhausted {
            url: "u".into(),
            attempts: 5,
            last: RetryCause::Status(503),
        };
        assert_eq!(exhausted.status(), Some(503));
        assert!(exhausted.to_string().contains("after 5 attempts"));
    }
}
