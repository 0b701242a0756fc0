//! Synchronized reads and mutations over the cached collections.
//!
//! `Store` is the only entry point a UI needs. Reads are gated by the
//! freshness policy and served from the cache when possible. Every mutation
//! issues exactly one remote call and patches the cache only after that call
//! succeeds, so a failed mutation leaves the cache exactly as it was. A
//! mutation on a never-fetched collection fetches it once the call has
//! succeeded rather than patching it.
//!
//! Each collection's lock is held from the staleness check through the cache
//! patch, which serializes mutations on the same collection. Operations that
//! touch several collections lock them in the order catalog, units, lists,
//! recipes.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::TokenProvider;
use crate::cache::{CacheEntry, CacheManager};
use crate::config::Config;
use crate::models::{
    find_list_mut, find_recipe_mut, normalize_name, remove_from_catalog, sort_catalog,
    Ingredient, NamedList, Recipe,
};
use crate::utils::contains_ignore_case;

/// Result of a read: whatever is cached after the read, plus the refresh
/// failure if a needed re-fetch did not succeed.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub refresh_error: Option<ApiError>,
}

impl<T> Snapshot<T> {
    pub fn is_ok(&self) -> bool {
        self.refresh_error.is_none()
    }

    /// Discard the cached items if the refresh failed.
    pub fn into_result(self) -> Result<Vec<T>, ApiError> {
        match self.refresh_error {
            Some(e) => Err(e),
            None => Ok(self.items),
        }
    }
}

pub struct Store {
    api: ApiClient,
    tokens: Arc<dyn TokenProvider>,
    cache: CacheManager,
}

impl Store {
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenProvider>, cache: CacheManager) -> Self {
        Self { api, tokens, cache }
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url, config.request_timeout())?;
        Ok(Self::new(api, tokens, CacheManager::new(config.cache_ttl())))
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    fn token(&self) -> Result<String, ApiError> {
        self.tokens
            .bearer_token()
            .map_err(|e| ApiError::MissingToken(format!("{:#}", e)))
    }

    // =========================================================================
    // Fetch plumbing
    // =========================================================================

    async fn remote_catalog(&self) -> Result<Vec<Ingredient>, ApiError> {
        let token = self.token()?;
        self.api.fetch_catalog(&token).await
    }

    async fn remote_units(&self) -> Result<Vec<String>, ApiError> {
        let token = self.token()?;
        self.api.fetch_units(&token).await
    }

    async fn remote_lists(&self) -> Result<Vec<NamedList>, ApiError> {
        let token = self.token()?;
        self.api.fetch_lists(&token).await
    }

    async fn remote_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let token = self.token()?;
        self.api.fetch_recipes(&token).await
    }

    /// Replace `entry` with the result of `fetch`, stamping it now.
    /// On failure the previous snapshot is kept.
    async fn refresh_entry<T, F>(
        &self,
        entry: &mut CacheEntry<T>,
        collection: &'static str,
        fetch: F,
    ) -> Result<(), ApiError>
    where
        T: Clone,
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        match fetch.await {
            Ok(items) => {
                debug!(collection, count = items.len(), "Collection refreshed");
                entry.replace(items);
                Ok(())
            }
            Err(e) => {
                warn!(collection, error = %e, "Failed to refresh collection");
                Err(e)
            }
        }
    }

    /// Serve `entry`, re-fetching first if the freshness policy demands it.
    async fn read<T, F>(&self, entry: &mut CacheEntry<T>, collection: &'static str, fetch: F) -> Snapshot<T>
    where
        T: Clone,
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let refresh_error = if entry.needs_refresh(self.cache.ttl()) {
            self.refresh_entry(entry, collection, fetch).await.err()
        } else {
            debug!(collection, "Serving cached collection");
            None
        };

        Snapshot {
            items: entry.snapshot(),
            refresh_error,
        }
    }

    /// Called after a mutation succeeded. A never-fetched collection is
    /// fetched now instead of patched, since the server's copy already holds
    /// the change. Returns true when the caller should patch the entry.
    /// A failed fetch leaves it unpopulated for the next read to retry.
    async fn should_patch<T, F>(&self, entry: &mut CacheEntry<T>, collection: &'static str, fetch: F) -> bool
    where
        T: Clone,
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        if entry.is_populated() {
            return true;
        }
        debug!(collection, "Populating collection after mutation");
        let _ = self.refresh_entry(entry, collection, fetch).await;
        false
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register the current identity with the service. No cache effect.
    pub async fn create_user(&self) -> Result<(), ApiError> {
        let token = self.token()?;
        self.api.create_user(&token).await?;
        info!("User registered");
        Ok(())
    }

    // =========================================================================
    // Catalog and units
    // =========================================================================

    /// The merged common + custom catalog, sorted by name.
    pub async fn get_all_ingredients(&self) -> Snapshot<Ingredient> {
        let mut catalog = self.cache.catalog.lock().await;
        self.read(&mut *catalog, "catalog", self.remote_catalog()).await
    }

    /// Catalog entries whose name contains `query`, ignoring case.
    pub async fn search_catalog(&self, query: &str) -> Snapshot<Ingredient> {
        let mut snapshot = self.get_all_ingredients().await;
        snapshot.items.retain(|i| contains_ignore_case(&i.name, query));
        snapshot
    }

    pub async fn get_measurement_units(&self) -> Snapshot<String> {
        let mut units = self.cache.units.lock().await;
        self.read(&mut *units, "units", self.remote_units()).await
    }

    pub async fn create_custom_ingredient(&self, name: &str, category: &str) -> Result<(), ApiError> {
        let mut catalog = self.cache.catalog.lock().await;

        let token = self.token()?;
        self.api.create_custom_ingredient(&token, name, category).await?;

        if self.should_patch(&mut *catalog, "catalog", self.remote_catalog()).await {
            let ingredient = Ingredient::new(name, category, true);
            if let Some(items) = catalog.items_mut() {
                if items.iter().any(|i| i.matches(&ingredient.key())) {
                    debug!(ingredient = name, "Custom ingredient already cached");
                } else {
                    items.push(ingredient);
                    sort_catalog(items);
                }
            }
        }
        info!(ingredient = name, category, "Custom ingredient created");
        Ok(())
    }

    /// Delete a custom ingredient from the catalog and from every cached
    /// list that references it. Cached recipes keep their copies.
    pub async fn delete_custom_ingredient(&self, name: &str, category: &str) -> Result<(), ApiError> {
        let mut catalog = self.cache.catalog.lock().await;
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api.delete_custom_ingredient(&token, name, category).await?;

        let key = Ingredient::new(name, category, true).key();
        if self.should_patch(&mut *catalog, "catalog", self.remote_catalog()).await {
            if let Some(items) = catalog.items_mut() {
                remove_from_catalog(items, &key);
                sort_catalog(items);
            }
        }

        // Unfetched lists are left for the next read
        let mut cascaded = 0;
        if let Some(lists) = lists.items_mut() {
            for list in lists.iter_mut() {
                cascaded += list.remove_all(&key);
            }
        }
        info!(ingredient = name, category, cascaded, "Custom ingredient deleted");
        Ok(())
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub async fn get_my_lists(&self) -> Snapshot<NamedList> {
        let mut lists = self.cache.lists.lock().await;
        self.read(&mut *lists, "lists", self.remote_lists()).await
    }

    /// Add an ingredient to a list, merging into an entry with the same
    /// identity.
    pub async fn add_ingredient_to_list(&self, list_name: &str, ingredient: Ingredient) -> Result<(), ApiError> {
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api.add_list_ingredient(&token, list_name, &ingredient).await?;

        let name = ingredient.name.clone();
        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            match lists.items_mut().and_then(|l| find_list_mut(l, list_name)) {
                Some(list) => list.add_ingredient(ingredient),
                None => warn!(list = list_name, "List not cached, skipping patch"),
            }
        }
        info!(list = list_name, ingredient = %name, "Ingredient added to list");
        Ok(())
    }

    pub async fn remove_ingredient_from_list(&self, list_name: &str, ingredient: &Ingredient) -> Result<(), ApiError> {
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api.remove_list_ingredient(&token, list_name, ingredient).await?;

        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            if let Some(list) = lists.items_mut().and_then(|l| find_list_mut(l, list_name)) {
                list.remove_ingredient(&ingredient.key());
            }
        }
        info!(list = list_name, ingredient = %ingredient.name, "Ingredient removed from list");
        Ok(())
    }

    /// Change the amount and unit of an ingredient on a list.
    pub async fn set_ingredient(
        &self,
        list_name: &str,
        ingredient: &Ingredient,
        amount: f64,
        unit: &str,
    ) -> Result<(), ApiError> {
        let mut lists = self.cache.lists.lock().await;

        let updated = ingredient.clone().with_amount(amount, unit);
        let token = self.token()?;
        self.api
            .edit_list_ingredient(&token, list_name, ingredient, &updated)
            .await?;

        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            let patched = lists
                .items_mut()
                .and_then(|l| find_list_mut(l, list_name))
                .map(|list| list.set_ingredient(&ingredient.key(), amount, unit))
                .unwrap_or(false);
            if !patched {
                warn!(list = list_name, ingredient = %ingredient.name, "Ingredient not cached, skipping patch");
            }
        }
        info!(list = list_name, ingredient = %ingredient.name, amount, unit, "Ingredient updated");
        Ok(())
    }

    /// Move `ingredient` off `from_list` and add `moved` to `to_list`.
    pub async fn move_ingredient(
        &self,
        from_list: &str,
        ingredient: &Ingredient,
        to_list: &str,
        moved: Ingredient,
    ) -> Result<(), ApiError> {
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api
            .move_list_ingredient(&token, from_list, ingredient, to_list, &moved)
            .await?;

        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            if let Some(items) = lists.items_mut() {
                if let Some(source) = find_list_mut(items, from_list) {
                    source.remove_ingredient(&ingredient.key());
                }
                match find_list_mut(items, to_list) {
                    Some(destination) => destination.add_ingredient(moved),
                    None => warn!(list = to_list, "Destination list not cached, skipping patch"),
                }
            }
        }
        info!(from = from_list, to = to_list, ingredient = %ingredient.name, "Ingredient moved");
        Ok(())
    }

    /// Create a list. The remote call is always made; the cache only gains a
    /// list if none with that name exists yet.
    pub async fn create_list(&self, name: &str) -> Result<(), ApiError> {
        let name = normalize_name(Some(name));
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api.create_list(&token, &name).await?;

        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            if let Some(items) = lists.items_mut() {
                if items.iter().any(|l| l.name == name) {
                    debug!(list = %name, "List already cached");
                } else {
                    items.push(NamedList::new(&name));
                }
            }
        }
        info!(list = %name, "List created");
        Ok(())
    }

    pub async fn delete_list(&self, name: &str) -> Result<(), ApiError> {
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api.delete_list(&token, name).await?;

        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            if let Some(items) = lists.items_mut() {
                if let Some(idx) = items.iter().position(|l| l.name == name) {
                    items.remove(idx);
                }
            }
        }
        info!(list = name, "List deleted");
        Ok(())
    }

    /// Rename the first list called `old_name`. Name collisions are not checked.
    pub async fn rename_list(&self, old_name: &str, new_name: &str) -> Result<(), ApiError> {
        let mut lists = self.cache.lists.lock().await;

        let token = self.token()?;
        self.api.rename_list(&token, old_name, new_name).await?;

        if self.should_patch(&mut *lists, "lists", self.remote_lists()).await {
            if let Some(list) = lists.items_mut().and_then(|l| find_list_mut(l, old_name)) {
                list.name = new_name.to_string();
            }
        }
        info!(from = old_name, to = new_name, "List renamed");
        Ok(())
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    pub async fn get_all_recipes(&self) -> Snapshot<Recipe> {
        let mut recipes = self.cache.recipes.lock().await;
        self.read(&mut *recipes, "recipes", self.remote_recipes()).await
    }

    pub async fn create_recipe(&self, name: &str) -> Result<(), ApiError> {
        let name = normalize_name(Some(name));
        let mut recipes = self.cache.recipes.lock().await;

        let token = self.token()?;
        self.api.create_recipe(&token, &name).await?;

        if self.should_patch(&mut *recipes, "recipes", self.remote_recipes()).await {
            if let Some(items) = recipes.items_mut() {
                if !items.iter().any(|r| r.name == name) {
                    items.push(Recipe::new(&name));
                }
            }
        }
        info!(recipe = %name, "Recipe created");
        Ok(())
    }

    pub async fn delete_recipe(&self, name: &str) -> Result<(), ApiError> {
        let mut recipes = self.cache.recipes.lock().await;

        let token = self.token()?;
        self.api.delete_recipe(&token, name).await?;

        if self.should_patch(&mut *recipes, "recipes", self.remote_recipes()).await {
            if let Some(items) = recipes.items_mut() {
                if let Some(idx) = items.iter().position(|r| r.name == name) {
                    items.remove(idx);
                }
            }
        }
        info!(recipe = name, "Recipe deleted");
        Ok(())
    }

    pub async fn add_ingredient_to_recipe(&self, recipe_name: &str, ingredient: Ingredient) -> Result<(), ApiError> {
        let mut recipes = self.cache.recipes.lock().await;

        let token = self.token()?;
        self.api
            .add_recipe_ingredient(&token, recipe_name, &ingredient)
            .await?;

        let name = ingredient.name.clone();
        if self.should_patch(&mut *recipes, "recipes", self.remote_recipes()).await {
            match recipes.items_mut().and_then(|r| find_recipe_mut(r, recipe_name)) {
                Some(recipe) => recipe.add_ingredient(ingredient),
                None => warn!(recipe = recipe_name, "Recipe not cached, skipping patch"),
            }
        }
        info!(recipe = recipe_name, ingredient = %name, "Ingredient added to recipe");
        Ok(())
    }

    pub async fn delete_ingredient_in_recipe(&self, recipe_name: &str, ingredient: &Ingredient) -> Result<(), ApiError> {
        let mut recipes = self.cache.recipes.lock().await;

        let token = self.token()?;
        self.api
            .delete_recipe_ingredient(&token, recipe_name, ingredient)
            .await?;

        if self.should_patch(&mut *recipes, "recipes", self.remote_recipes()).await {
            if let Some(recipe) = recipes.items_mut().and_then(|r| find_recipe_mut(r, recipe_name)) {
                recipe.remove_ingredient(&ingredient.key());
            }
        }
        info!(recipe = recipe_name, ingredient = %ingredient.name, "Ingredient removed from recipe");
        Ok(())
    }

    pub async fn add_step_to_recipe(&self, recipe_name: &str, step: &str) -> Result<(), ApiError> {
        let mut recipes = self.cache.recipes.lock().await;

        let token = self.token()?;
        self.api.add_recipe_step(&token, recipe_name, step).await?;

        if self.should_patch(&mut *recipes, "recipes", self.remote_recipes()).await {
            if let Some(recipe) = recipes.items_mut().and_then(|r| find_recipe_mut(r, recipe_name)) {
                recipe.add_step(step);
            }
        }
        info!(recipe = recipe_name, "Step added");
        Ok(())
    }

    /// Delete step `step_number` (1-based). The cached recipe is only patched
    /// when the position is within its current step range.
    pub async fn delete_step_from_recipe(&self, recipe_name: &str, step_number: usize) -> Result<(), ApiError> {
        let mut recipes = self.cache.recipes.lock().await;

        let token = self.token()?;
        self.api
            .delete_recipe_step(&token, recipe_name, step_number)
            .await?;

        if self.should_patch(&mut *recipes, "recipes", self.remote_recipes()).await {
            let removed = recipes
                .items_mut()
                .and_then(|r| find_recipe_mut(r, recipe_name))
                .and_then(|recipe| recipe.remove_step(step_number));
            if removed.is_none() {
                warn!(recipe = recipe_name, step_number, "Step not cached, skipping patch");
            }
        }
        info!(recipe = recipe_name, step_number, "Step deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_into_result() {
        let ok = Snapshot {
            items: vec![1, 2],
            refresh_error: None,
        };
        assert!(ok.is_ok());
        assert_eq!(ok.into_result().ok(), Some(vec![1, 2]));

        let failed = Snapshot {
            items: vec![1],
            refresh_error: Some(ApiError::InvalidResponse("truncated body".into())),
        };
        assert!(!failed.is_ok());
        assert!(failed.into_result().is_err());
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_ttl() {
        let config = Config {
            cache_ttl_secs: 60,
            ..Config::default()
        };
        let store = Store::from_config(&config, Arc::new(crate::auth::StaticToken::new("t")))
            .expect("default config builds a store");
        assert_eq!(store.cache().ttl(), chrono::Duration::minutes(1));
        assert_eq!(store.api.base_url().as_str(), "http://localhost:8080/api/");
    }
}
