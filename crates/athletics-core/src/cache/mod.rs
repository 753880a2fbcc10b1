//! In-memory caching for view data.
//!
//! This module provides `FetchCache`, a per-view keyed store with a
//! time-to-live per entry. Fresh entries are served without a network call;
//! expired entries are refetched and, if the refetch fails, served as stale
//! data alongside the error. Nothing is persisted.

pub mod fetch;

pub use fetch::{CacheEntry, FetchCache, FetchPhase, FetchState, DEFAULT_TTL};
