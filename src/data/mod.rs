//! Typed SofaScore payloads and endpoint wrappers
//!
//! Decoding is lenient throughout: unknown fields are ignored and every
//! upstream field is optional, so a schema drift degrades to empty cells
//! rather than a failed fetch.

pub mod events;
pub mod sofascore;
pub mod statistics;

pub use events::{Event, EventRow, ScheduledEvents, EVENT_TSV_HEADER};
pub use sofascore::{parse_date, DataError, SofaScoreClient};
pub use statistics::{MatchStatistics, Side, StatRow, STAT_TSV_HEADER};
