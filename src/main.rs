//! matchday - fetch SofaScore football data through a cached, rate-limited client
//!
//! Responses are cached on disk, requests are spaced by a global
//! requests-per-minute budget, and transient failures are retried with
//! exponential backoff.

use clap::Parser;
use futures::future::join_all;
use log::error;

use matchday::cli::{parse_params, Cli, Command};
use matchday::data::{parse_date, SofaScoreClient, EVENT_TSV_HEADER, STAT_TSV_HEADER};
use matchday::fetch::FetchClient;

/// Installs `env_logger`, honouring `RUST_LOG` when set
fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // Surface the Display text; returning the error as is would print its Debug form
    run(cli).await.map_err(|e| e.to_string().into())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let fetch = FetchClient::new(cli.fetch_config())?;
    let use_cache = cli.use_cache();

    match &cli.command {
        Command::Get { path, params } => {
            let params = parse_params(params)?;
            let value = fetch.fetch_json(path, &params, use_cache).await?;
            print_json(&value)?;
        }
        Command::Events { dates } => {
            // Validate every date before issuing any request
            let dates = dates
                .iter()
                .map(|d| parse_date(d))
                .collect::<Result<Vec<_>, _>>()?;

            let client = SofaScoreClient::new(fetch);
            let results = join_all(
                dates
                    .iter()
                    .map(|date| client.scheduled_events(*date, use_cache)),
            )
            .await;

            println!("{}", EVENT_TSV_HEADER);
            let mut failures = 0;
            for (date, result) in dates.iter().zip(results) {
                match result {
                    Ok(events) => {
                        for row in events.rows() {
                            println!("{}", row.to_tsv());
                        }
                    }
                    Err(e) => {
                        error!("Skipping {}: {}", date, e);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                return Err(format!("{} of {} dates failed", failures, dates.len()).into());
            }
        }
        Command::Event { id } => {
            let value = SofaScoreClient::new(fetch).event_details(*id, use_cache).await?;
            print_json(&value)?;
        }
        Command::Stats { id } => {
            let stats = SofaScoreClient::new(fetch)
                .match_statistics(*id, use_cache)
                .await?;
            println!("{}", STAT_TSV_HEADER);
            for row in stats.stat_rows() {
                println!("{}", row.to_tsv());
            }
        }
        Command::Team { id } => {
            let value = SofaScoreClient::new(fetch).team(*id, use_cache).await?;
            print_json(&value)?;
        }
    }

    Ok(())
}
