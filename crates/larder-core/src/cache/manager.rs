use chrono::Duration;
use tokio::sync::Mutex;

use crate::models::{Ingredient, NamedList, Recipe};

use super::entry::{CacheEntry, DEFAULT_TTL_SECS};

/// The four independently-aged collections.
///
/// Each collection sits behind its own async mutex. Callers that need more
/// than one must lock them in field order: catalog, units, lists, recipes.
pub struct CacheManager {
    pub(crate) catalog: Mutex<CacheEntry<Ingredient>>,
    pub(crate) units: Mutex<CacheEntry<String>>,
    pub(crate) lists: Mutex<CacheEntry<NamedList>>,
    pub(crate) recipes: Mutex<CacheEntry<Recipe>>,
    ttl: Duration,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl CacheManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            catalog: Mutex::new(CacheEntry::Unpopulated),
            units: Mutex::new(CacheEntry::Unpopulated),
            lists: Mutex::new(CacheEntry::Unpopulated),
            recipes: Mutex::new(CacheEntry::Unpopulated),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mark every collection unpopulated so the next read re-fetches it.
    pub async fn invalidate_all(&self) {
        self.catalog.lock().await.invalidate();
        self.units.lock().await.invalidate();
        self.lists.lock().await.invalidate();
        self.recipes.lock().await.invalidate();
    }

    /// Copy of every entry, timestamps included.
    pub async fn state(&self) -> CacheState {
        CacheState {
            catalog: self.catalog.lock().await.clone(),
            units: self.units.lock().await.clone(),
            lists: self.lists.lock().await.clone(),
            recipes: self.recipes.lock().await.clone(),
        }
    }

    pub async fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            catalog: self.catalog.lock().await.age_display(),
            units: self.units.lock().await.age_display(),
            lists: self.lists.lock().await.age_display(),
            recipes: self.recipes.lock().await.age_display(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheState {
    pub catalog: CacheEntry<Ingredient>,
    pub units: CacheEntry<String>,
    pub lists: CacheEntry<NamedList>,
    pub recipes: CacheEntry<Recipe>,
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub catalog: Option<String>,
    pub units: Option<String>,
    pub lists: Option<String>,
    pub recipes: Option<String>,
}

impl CacheAges {
    pub fn lists_age(&self) -> String {
        self.lists.clone().unwrap_or_else(|| "never".to_string())
    }

    pub fn recipes_age(&self) -> String {
        self.recipes.clone().unwrap_or_else(|| "never".to_string())
    }

    /// Age of the first populated collection, catalog first.
    pub fn last_updated(&self) -> String {
        [&self.catalog, &self.lists, &self.recipes, &self.units]
            .into_iter()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "never".to_string())
    }
}
