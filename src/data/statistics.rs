//! Match-statistics payloads flattened to one row per side per stat

use serde::Deserialize;
use serde_json::Value;

pub const STAT_TSV_HEADER: &str = "event_id\tside\tstat_key\tstat_label\tvalue";

/// Body of `/event/{id}/match-statistics`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchStatistics {
    pub event_id: Option<u64>,
    pub id: Option<u64>,
    pub statistics: Option<Vec<StatGroup>>,
    pub groups: Option<Vec<StatGroup>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatGroup {
    pub statistics: Vec<StatItem>,
}

/// A single statistic; values stay untyped since they may be numbers or strings like `"54%"`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatItem {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub key: Option<String>,
    pub id: Option<Value>,
    pub label: Option<String>,
    pub home: Option<Value>,
    pub away: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub event_id: Option<u64>,
    pub side: Side,
    pub stat_key: Option<String>,
    pub stat_label: Option<String>,
    pub value: Option<Value>,
}

impl StatItem {
    /// `type`, then `key`, then `id`
    pub fn stat_key(&self) -> Option<String> {
        self.kind
            .clone()
            .or_else(|| self.key.clone())
            .or_else(|| self.id.as_ref().map(value_text))
    }
}

impl MatchStatistics {
    pub fn groups(&self) -> &[StatGroup] {
        self.statistics
            .as_deref()
            .filter(|groups| !groups.is_empty())
            .or(self.groups.as_deref())
            .unwrap_or(&[])
    }

    /// Two rows (home, away) for every statistic in every group
    pub fn stat_rows(&self) -> Vec<StatRow> {
        let event_id = self.event_id.or(self.id);
        let mut rows = Vec::new();

        for item in self.groups().iter().flat_map(|g| g.statistics.iter()) {
            let stat_key = item.stat_key();
            let stat_label = item.label.clone().or_else(|| stat_key.clone());
            for (side, value) in [(Side::Home, &item.home), (Side::Away, &item.away)] {
                rows.push(StatRow {
                    event_id,
                    side,
                    stat_key: stat_key.clone(),
                    stat_label: stat_label.clone(),
                    value: value.clone(),
                });
            }
        }

        rows
    }
}

impl StatRow {
    pub fn to_tsv(&self) -> String {
        [
            self.event_id.map(|id| id.to_string()).unwrap_or_default(),
            self.side.as_str().to_string(),
            self.stat_key.clone().unwrap_or_default(),
            self.stat_label.clone().unwrap_or_default(),
            self.value.as_ref().map(value_text).unwrap_or_default(),
        ]
        .join("\t")
    }
}

/// Strings without quotes, everything else as compact JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
