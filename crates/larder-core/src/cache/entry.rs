use chrono::{DateTime, Duration, Utc};

/// Default freshness window for every cached collection.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.cached_at
    }

    pub fn age_minutes(&self) -> i64 {
        self.age().num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        }
    }

    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// State of one cached collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry<T> {
    /// Never fetched (or explicitly invalidated).
    Unpopulated,
    /// Snapshot plus the time of the last successful fetch.
    Populated(CachedData<Vec<T>>),
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        CacheEntry::Unpopulated
    }
}

impl<T: Clone> CacheEntry<T> {
    pub fn is_populated(&self) -> bool {
        matches!(self, CacheEntry::Populated(_))
    }

    /// True when the collection has to be fetched before it can be served:
    /// never fetched, empty, or older than `ttl`.
    pub fn needs_refresh(&self, ttl: Duration) -> bool {
        match self {
            CacheEntry::Unpopulated => true,
            CacheEntry::Populated(cached) => cached.data.is_empty() || cached.is_stale(ttl),
        }
    }

    /// Replace the snapshot with freshly fetched data, stamping it now.
    pub fn replace(&mut self, data: Vec<T>) {
        *self = CacheEntry::Populated(CachedData::new(data));
    }

    pub fn invalidate(&mut self) {
        *self = CacheEntry::Unpopulated;
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            CacheEntry::Unpopulated => None,
            CacheEntry::Populated(cached) => Some(&cached.data),
        }
    }

    /// Mutable access for in-place patches. The fetch timestamp is untouched.
    pub fn items_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            CacheEntry::Unpopulated => None,
            CacheEntry::Populated(cached) => Some(&mut cached.data),
        }
    }

    /// Owned copy of the current items; empty when unpopulated.
    pub fn snapshot(&self) -> Vec<T> {
        self.items().map(<[T]>::to_vec).unwrap_or_default()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CacheEntry::Unpopulated => None,
            CacheEntry::Populated(cached) => Some(cached.cached_at),
        }
    }

    pub fn age_display(&self) -> Option<String> {
        match self {
            CacheEntry::Unpopulated => None,
            CacheEntry::Populated(cached) => Some(cached.age_display()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
