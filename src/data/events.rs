//! Scheduled-events payloads and their flattened rows
//!
//! Every field is optional: the endpoint is undocumented and its shape
//! varies, so missing or null values decode to `None` instead of failing.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Column order used by [`EventRow::to_tsv`]
pub const EVENT_TSV_HEADER: &str =
    "event_id\ttournament\tstart_utc\thome_id\thome_name\taway_id\taway_name\thome_score\taway_score\tstatus";

/// Body of `/sport/football/scheduled-events/{date}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduledEvents {
    pub events: Option<Vec<Event>>,
    /// Older payloads carry the list under `data`
    pub data: Option<Vec<Event>>,
}

impl ScheduledEvents {
    /// The event list, preferring a non-empty `events` over `data`
    pub fn items(&self) -> &[Event] {
        match (&self.events, &self.data) {
            (Some(events), _) if !events.is_empty() => events,
            (_, Some(data)) => data,
            _ => &[],
        }
    }

    pub fn rows(&self) -> Vec<EventRow> {
        self.items().iter().map(Event::to_row).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub id: Option<u64>,
    pub detail_id: Option<u64>,
    pub tournament: Option<Tournament>,
    pub start_timestamp: Option<i64>,
    pub home_team: Option<Team>,
    pub away_team: Option<Team>,
    pub home_score: Option<Score>,
    pub away_score: Option<Score>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tournament {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventStatus {
    pub description: Option<String>,
}

/// A score given either as `{"current": n, ...}` or as a bare number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Bare(i64),
    Detailed {
        #[serde(default)]
        current: Option<i64>,
    },
}

impl Score {
    pub fn current(&self) -> Option<i64> {
        match self {
            Score::Bare(n) => Some(*n),
            Score::Detailed { current } => *current,
        }
    }
}

/// One event flattened into a table row
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub event_id: Option<u64>,
    pub tournament: Option<String>,
    pub start_utc: Option<DateTime<Utc>>,
    pub start_ts: Option<i64>,
    pub home_id: Option<u64>,
    pub home_name: Option<String>,
    pub away_id: Option<u64>,
    pub away_name: Option<String>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub status: Option<String>,
}

impl Event {
    pub fn to_row(&self) -> EventRow {
        let team = |t: &Option<Team>| {
            t.as_ref()
                .map(|t| (t.id, t.name.clone()))
                .unwrap_or((None, None))
        };
        let (home_id, home_name) = team(&self.home_team);
        let (away_id, away_name) = team(&self.away_team);

        EventRow {
            event_id: self.id.or(self.detail_id),
            tournament: self.tournament.as_ref().and_then(|t| t.name.clone()),
            start_utc: self
                .start_timestamp
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            start_ts: self.start_timestamp,
            home_id,
            home_name,
            away_id,
            away_name,
            home_score: self.home_score.as_ref().and_then(Score::current),
            away_score: self.away_score.as_ref().and_then(Score::current),
            status: self.status.as_ref().and_then(|s| s.description.clone()),
        }
    }
}

impl EventRow {
    /// Tab-separated line in [`EVENT_TSV_HEADER`] order; missing values are empty
    pub fn to_tsv(&self) -> String {
        fn cell<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        [
            cell(&self.event_id),
            cell(&self.tournament),
            self.start_utc
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            cell(&self.home_id),
            cell(&self.home_name),
            cell(&self.away_id),
            cell(&self.away_name),
            cell(&self.home_score),
            cell(&self.away_score),
            cell(&self.status),
        ]
        .join("\t")
    }
}
