//! Command-line interface parsing for the matchday binary
//!
//! Global flags map one-to-one onto `FetchConfig` fields; anything not given
//! keeps the documented default.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::QueryParams;
use crate::fetch::FetchConfig;

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// A `--param` value without an `=`
    #[error("Invalid parameter: '{0}'. Expected key=value")]
    InvalidParam(String),
}

/// matchday - cached, rate-limited access to SofaScore football data
#[derive(Parser, Debug)]
#[command(name = "matchday")]
#[command(about = "Cached, rate-limited access to SofaScore football data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL that request paths are joined onto
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory for cached responses (defaults to the XDG cache dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Cache time-to-live in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub ttl: Option<u64>,

    /// Request budget shared by all requests
    #[arg(long, global = true, value_name = "N")]
    pub rpm: Option<u32>,

    /// Maximum attempts per request
    #[arg(long, global = true, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Backoff base; the wait after attempt n is BASE^n seconds
    #[arg(long, global = true, value_name = "BASE")]
    pub backoff: Option<f64>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Always hit the network and leave the cache untouched
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Log debug output (cache hits, rate-limit sleeps)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Fetch any path (or absolute URL) and print the JSON body
    Get {
        path: String,
        /// Query parameter as key=value; repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Print scheduled football events for one or more dates as TSV
    Events {
        /// Dates as YYYY-MM-DD
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// Print event details as JSON
    Event { id: u64 },
    /// Print match statistics as TSV
    Stats { id: u64 },
    /// Print team details as JSON
    Team { id: u64 },
}

impl Cli {
    /// Builds a `FetchConfig` from the defaults plus any flags given
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if let Some(ttl) = self.ttl {
            config = config.with_ttl(Duration::from_secs(ttl));
        }
        if let Some(rpm) = self.rpm {
            config = config.with_requests_per_minute(rpm);
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(backoff) = self.backoff {
            config = config.with_backoff_base(backoff);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        config
    }

    pub fn use_cache(&self) -> bool {
        !self.no_cache
    }
}

/// Parses repeated `key=value` arguments into query parameters
///
/// Only the first `=` splits, so values may themselves contain `=`.
pub fn parse_params(raw: &[String]) -> Result<QueryParams, CliError> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(k, _)| !k.is_empty())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| CliError::InvalidParam(pair.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&["season=2025".into(), "h2h=1-2".into(), "q=a=b".into()]).unwrap();
        assert_eq!(params.get("season").map(String::as_str), Some("2025"));
        assert_eq!(params.get("q").map(String::as_str), Some("a=b"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_parse_params_invalid() {
        assert_eq!(
            parse_params(&["season".into()]),
            Err(CliError::InvalidParam("season".into()))
        );
        assert!(parse_params(&["=2025".into()]).is_err());
        let err = parse_params(&["oops".into()]).unwrap_err();
        assert!(err.to_string().contains("Invalid parameter"));
    }

    #[test]
    fn test_cli_parse_get_with_params() {
        let cli = Cli::parse_from(["matchday", "get", "/fixtures", "-p", "league=39", "--param", "season=2025"]);
        assert_eq!(
            cli.command,
            Command::Get {
                path: "/fixtures".into(),
                params: vec!["league=39".into(), "season=2025".into()],
            }
        );
        assert!(cli.use_cache());
    }

    #[test]
    fn test_cli_parse_events_multiple_dates() {
        let cli = Cli::parse_from(["matchday", "events", "2025-10-28", "2025-10-29"]);
        assert_eq!(
            cli.command,
            Command::Events {
                dates: vec!["2025-10-28".into(), "2025-10-29".into()],
            }
        );
    }

    #[test]
    fn test_cli_events_requires_a_date() {
        assert!(Cli::try_parse_from(["matchday", "events"]).is_err());
    }

    #[test]
    fn test_default_flags_keep_default_config() {
        let cli = Cli::parse_from(["matchday", "team", "42"]);
        let config = cli.fetch_config();
        let defaults = FetchConfig::default();
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.ttl, defaults.ttl);
        assert_eq!(config.requests_per_minute, defaults.requests_per_minute);
        assert_eq!(config.max_retries, defaults.max_retries);
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::parse_from([
            "matchday", "stats", "7", "--rpm", "20", "--ttl", "60", "--max-retries", "3",
            "--backoff", "2", "--timeout", "5", "--cache-dir", "/tmp/mc", "--base-url",
            "http://localhost:9000", "--no-cache",
        ]);
        let config = cli.fetch_config();
        assert_eq!(config.requests_per_minute, 20);
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
        assert!((config.backoff_base - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/mc"));
        assert_eq!(config.base_url, "http://localhost:9000");
        assert!(!cli.use_cache());
    }
}
