//! In-memory TTL cache for GET responses
//!
//! This module provides the response cache backing the API client. Entries are
//! classified as fresh or expired lazily at read time; there is no background
//! sweep, so an expired entry stays resident but inert until it is overwritten
//! or the cache is cleared.

mod response;

pub use response::{ResponseCache, DEFAULT_TTL};
