//! In-memory caching of the four remote collections.
//!
//! This module provides the `CacheManager`, which holds the ingredient
//! catalog, measurement units, the user's lists and the user's recipes.
//! Each collection is either unpopulated or a snapshot stamped with the time
//! of its last successful fetch, and is considered stale after 5 minutes.
//!
//! Nothing here talks to the network; see `crate::store` for the operations
//! that fetch and patch these collections.

pub mod entry;
pub mod manager;

pub use entry::{CacheEntry, CachedData, DEFAULT_TTL_SECS};
pub use manager::{CacheAges, CacheManager, CacheState};
