//! The network seam between `FetchClient` and the upstream API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use super::config::{ConfigError, FetchConfig};
use super::error::TransportError;
use crate::cache::QueryParams;

/// Status and body of one HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Issues a single GET attempt
///
/// Implementations must not retry on their own; retries belong to the
/// `FetchClient` loop.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, params: &QueryParams) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport carrying the configured headers and per-attempt timeout
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &FetchConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .default_headers(header_map(&config.headers)?)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, params: &QueryParams) -> Result<RawResponse, TransportError> {
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = e.to_string();
        if e.is_timeout() {
            TransportError::Timeout(message)
        } else if e.is_builder() {
            TransportError::Build(message)
        } else if e.is_connect() {
            TransportError::Connect(message)
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(message)
        } else {
            TransportError::Request(message)
        }
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = |reason: String| ConfigError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
