//! Matchday library
//!
//! A resilient fetch layer (disk cache, global rate limiter, bounded retries)
//! for rate-limited JSON APIs, with typed decoders for SofaScore football data.

pub mod cache;
pub mod cli;
pub mod data;
pub mod fetch;
