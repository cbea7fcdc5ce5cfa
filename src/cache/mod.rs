//! Cache module for storing upstream responses on disk
//!
//! Responses are keyed by a SHA-256 fingerprint of the resolved URL and its
//! sorted query parameters. Entries expire by file age; an unreadable or
//! corrupt entry behaves exactly like a missing one.

mod key;
mod store;

pub use key::{query_params, CacheKey, QueryParams};
pub use store::{CacheError, CacheStore};
