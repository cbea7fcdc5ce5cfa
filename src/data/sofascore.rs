//! SofaScore endpoint wrappers
//!
//! Each method maps to one undocumented public JSON endpoint and goes
//! through the shared `FetchClient`, so caching, throttling and retries
//! apply uniformly.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use super::{MatchStatistics, ScheduledEvents};
use crate::cache::QueryParams;
use crate::fetch::{FetchClient, FetchError};

/// Errors from the SofaScore wrappers
#[derive(Debug, Error)]
pub enum DataError {
    /// Date argument was not `YYYY-MM-DD`
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Typed access to the SofaScore endpoints used for match research
#[derive(Clone)]
pub struct SofaScoreClient {
    fetch: FetchClient,
}

impl SofaScoreClient {
    pub fn new(fetch: FetchClient) -> Self {
        Self { fetch }
    }

    pub fn scheduled_events_path(date: NaiveDate) -> String {
        format!("/sport/football/scheduled-events/{}", date.format("%Y-%m-%d"))
    }

    /// Football events scheduled on `date`
    pub async fn scheduled_events(
        &self,
        date: NaiveDate,
        use_cache: bool,
    ) -> Result<ScheduledEvents, DataError> {
        let path = Self::scheduled_events_path(date);
        Ok(self.fetch.fetch_as(&path, &QueryParams::new(), use_cache).await?)
    }

    /// Same as [`scheduled_events`](Self::scheduled_events) with a `YYYY-MM-DD` string
    pub async fn scheduled_events_str(
        &self,
        date: &str,
        use_cache: bool,
    ) -> Result<ScheduledEvents, DataError> {
        self.scheduled_events(parse_date(date)?, use_cache).await
    }

    pub async fn event_details(&self, event_id: u64, use_cache: bool) -> Result<Value, DataError> {
        let path = format!("/event/{}", event_id);
        Ok(self.fetch.fetch_json(&path, &QueryParams::new(), use_cache).await?)
    }

    pub async fn match_statistics(
        &self,
        event_id: u64,
        use_cache: bool,
    ) -> Result<MatchStatistics, DataError> {
        let path = format!("/event/{}/match-statistics", event_id);
        Ok(self.fetch.fetch_as(&path, &QueryParams::new(), use_cache).await?)
    }

    pub async fn team(&self, team_id: u64, use_cache: bool) -> Result<Value, DataError> {
        let path = format!("/team/{}", team_id);
        Ok(self.fetch.fetch_json(&path, &QueryParams::new(), use_cache).await?)
    }
}

/// Parses a `YYYY-MM-DD` date, tolerating surrounding whitespace
pub fn parse_date(s: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DataError::InvalidDate(s.to_string()))
}
