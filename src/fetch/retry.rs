//! Classification of attempt outcomes and exponential backoff
//!
//! HTTP 429 and 503 mean "slow down" or "try again shortly", so they are
//! retried along with every transport failure. Any other non-200 status
//! points at a bad request or a server bug and fails immediately.

use std::time::Duration;

use super::error::{body_excerpt, RetryCause, TransportError};
use super::transport::RawResponse;

/// Statuses that are retried after a backoff
pub const RETRYABLE_STATUSES: [u16; 2] = [429, 503];

/// How one attempt ended
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    /// HTTP 200 with a JSON body
    Success(Vec<u8>),
    /// Transient failure; eligible for another attempt
    Retryable(RetryCause),
    /// Non-transient failure; ends the fetch
    Fatal(FatalCause),
}

#[derive(Debug, PartialEq, Eq)]
pub enum FatalCause {
    Status { status: u16, body_excerpt: String },
    Transport(TransportError),
}

/// Attempt ceiling and backoff schedule for one `FetchClient`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_base: f64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: f64) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// Classifies the outcome of one attempt
    pub fn classify(&self, outcome: Result<RawResponse, TransportError>) -> Verdict {
        match outcome {
            Ok(response) if response.status == 200 => {
                match serde_json::from_slice::<serde::de::IgnoredAny>(&response.body) {
                    Ok(_) => Verdict::Success(response.body),
                    Err(e) => Verdict::Retryable(RetryCause::MalformedBody(e.to_string())),
                }
            }
            Ok(response) if RETRYABLE_STATUSES.contains(&response.status) => {
                Verdict::Retryable(RetryCause::Status(response.status))
            }
            Ok(response) => Verdict::Fatal(FatalCause::Status {
                status: response.status,
                body_excerpt: body_excerpt(&response.body),
            }),
            Err(e) if e.is_retryable() => Verdict::Retryable(RetryCause::Transport(e)),
            Err(e) => Verdict::Fatal(FatalCause::Transport(e)),
        }
    }

    /// Whether a retryable failure on `attempt` (1-based) may be followed by another attempt
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Sleep before the attempt after `attempt`: `backoff_base ^ attempt` seconds
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_base.powi(exponent)).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(5, 1.5)
    }

    #[test]
    fn test_200_with_json_is_success() {
        assert_eq!(
            policy().classify(response(200, r#"{"events":[]}"#)),
            Verdict::Success(br#"{"events":[]}"#.to_vec())
        );
    }

    #[test]
    fn test_200_with_malformed_body_is_retryable() {
        assert!(matches!(
            policy().classify(response(200, "<html>challenge</html>")),
            Verdict::Retryable(RetryCause::MalformedBody(_))
        ));
    }

    #[test]
    fn test_429_and_503_are_retryable() {
        assert_eq!(
            policy().classify(response(429, "")),
            Verdict::Retryable(RetryCause::Status(429))
        );
        assert_eq!(
            policy().classify(response(503, "")),
            Verdict::Retryable(RetryCause::Status(503))
        );
    }

    #[test]
    fn test_other_statuses_are_fatal() {
        for status in [201, 204, 400, 401, 403, 404, 500, 502, 504] {
            match policy().classify(response(status, "nope")) {
                Verdict::Fatal(FatalCause::Status { status: s, body_excerpt }) => {
                    assert_eq!(s, status);
                    assert_eq!(body_excerpt, "nope");
                }
                other => panic!("status {} classified as {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_transport_failures() {
        assert_eq!(
            policy().classify(Err(TransportError::Timeout("15s".into()))),
            Verdict::Retryable(RetryCause::Transport(TransportError::Timeout("15s".into())))
        );
        assert_eq!(
            policy().classify(Err(TransportError::Build("bad url".into()))),
            Verdict::Fatal(FatalCause::Transport(TransportError::Build("bad url".into())))
        );
    }

    #[test]
    fn test_backoff_growth() {
        let policy = policy();
        let delays: Vec<f64> = (1..=5).map(|n| policy.delay(n).as_secs_f64()).collect();

        for (n, delay) in delays.iter().enumerate() {
            let expected = 1.5_f64.powi(n as i32 + 1);
            assert!((delay - expected).abs() < 1e-6, "delay({}) = {}", n + 1, delay);
        }
        assert!(delays.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_allows_another_until_ceiling() {
        let policy = policy();
        assert!(policy.allows_another(1));
        assert!(policy.allows_another(4));
        assert!(!policy.allows_another(5));
        assert!(!RetryPolicy::new(1, 1.5).allows_another(1));
    }

    #[test]
    fn test_huge_delay_saturates() {
        assert_eq!(RetryPolicy::new(5, 1e300).delay(10), Duration::MAX);
    }
}
