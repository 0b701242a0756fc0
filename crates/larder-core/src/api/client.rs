//! API client for the larder REST service.
//!
//! `ApiClient` is a stateless translation layer: one method per remote
//! operation, each attaching the caller's bearer token and checking the
//! response status. It never touches cached state.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{header, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::models::{merge_catalog, normalize_name, Ingredient, NamedList, Recipe};

use super::error::{ApiError, Expected};

// ============================================================================
// Constants
// ============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the larder service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry paths: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments. Each segment is
    /// percent-encoded, so names containing `/` or spaces are safe.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn auth_headers(token: &str) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ApiError::MissingToken(format!("token is not a valid header value: {}", e)))?;
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    /// Check the response against the operation's expected status,
    /// returning an error with the body if it does not match.
    async fn check_response(response: Response, expected: Expected) -> Result<Response, ApiError> {
        let status = response.status();
        if expected.accepts(status) {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, expected, &body))
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        token: &str,
        expected: Expected,
    ) -> Result<Response, ApiError> {
        let response = request.headers(Self::auth_headers(token)?).send().await?;
        debug!(url = %response.url(), status = %response.status(), "Response received");
        Self::check_response(response, expected).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &str,
        expected: Expected,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.client.get(url), token, expected).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::decode(what, e))
    }

    // ===== Users =====

    /// Register the logged-in identity with the service.
    pub async fn create_user(&self, token: &str) -> Result<(), ApiError> {
        let url = self.url(&["users"]);
        self.send(self.client.post(url), token, Expected::created()).await?;
        Ok(())
    }

    // ===== Catalog =====

    /// Fetch the common and custom ingredient sets, merged and sorted by name.
    pub async fn fetch_catalog(&self, token: &str) -> Result<Vec<Ingredient>, ApiError> {
        let url = self.url(&["ingredients"]);
        let parsed: CatalogResponse = self
            .get_json(url, token, Expected::AnySuccess, "Failed to parse ingredient catalog")
            .await?;

        let common = parsed.common_ingredients.into_iter().map(|i| i.into_ingredient(false)).collect();
        let custom = parsed.custom_ingredients.into_iter().map(|i| i.into_ingredient(true)).collect();
        Ok(merge_catalog(common, custom))
    }

    pub async fn create_custom_ingredient(
        &self,
        token: &str,
        name: &str,
        category: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&["ingredients", "custom"]);
        let body = json!({ "ingredient": name, "type": category });
        self.send(self.client.post(url).json(&body), token, Expected::AnySuccess)
            .await?;
        Ok(())
    }

    pub async fn delete_custom_ingredient(
        &self,
        token: &str,
        name: &str,
        category: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&["ingredients", "custom", name]);
        let request = self.client.delete(url).query(&[("type", category)]);
        self.send(request, token, Expected::AnySuccess).await?;
        Ok(())
    }

    // ===== Measurement units =====

    pub async fn fetch_units(&self, token: &str) -> Result<Vec<String>, ApiError> {
        let url = self.url(&["units"]);
        let parsed: Vec<UnitItem> = self
            .get_json(url, token, Expected::ok(), "Failed to parse measurement units")
            .await?;
        Ok(parsed.into_iter().map(|u| u.unit).collect())
    }

    // ===== Lists =====

    pub async fn fetch_lists(&self, token: &str) -> Result<Vec<NamedList>, ApiError> {
        let url = self.url(&["lists"]);
        let parsed: Vec<ListResponse> = self
            .get_json(url, token, Expected::ok(), "Failed to parse lists")
            .await?;
        Ok(parsed.into_iter().map(ListResponse::into_list).collect())
    }

    pub async fn add_list_ingredient(
        &self,
        token: &str,
        list_name: &str,
        ingredient: &Ingredient,
    ) -> Result<(), ApiError> {
        let url = self.url(&["lists", "ingredients"]);
        let body = json!({
            "list_name": list_name,
            "ingredient": ingredient.name,
            "ingredient_type": ingredient.category,
            "amount": ingredient.amount,
            "unit": ingredient.unit,
            "is_custom_ingredient": ingredient.is_custom,
        });
        self.send(self.client.post(url).json(&body), token, Expected::ok())
            .await?;
        Ok(())
    }

    pub async fn remove_list_ingredient(
        &self,
        token: &str,
        list_name: &str,
        ingredient: &Ingredient,
    ) -> Result<(), ApiError> {
        let url = self.url(&["lists", "ingredients"]);
        let is_custom = ingredient.is_custom.to_string();
        let request = self.client.delete(url).query(&[
            ("ingredient", ingredient.name.as_str()),
            ("ingredient_type", ingredient.category.as_str()),
            ("is_custom_ingredient", is_custom.as_str()),
            ("list_name", list_name),
            ("unit", ingredient.unit.as_str()),
        ]);
        self.send(request, token, Expected::ok()).await?;
        Ok(())
    }

    /// Change the amount/unit of an ingredient already on a list.
    pub async fn edit_list_ingredient(
        &self,
        token: &str,
        list_name: &str,
        old: &Ingredient,
        new: &Ingredient,
    ) -> Result<(), ApiError> {
        let url = self.url(&["lists", "ingredients"]);
        let body = json!({
            "list_name": list_name,
            "old_ingredient": old.name,
            "old_ingredient_type": old.category,
            "old_amount": old.amount,
            "old_unit": old.unit,
            "old_is_custom_ingredient": old.is_custom,
            "new_ingredient": new.name,
            "new_ingredient_type": new.category,
            "new_amount": new.amount,
            "new_unit": new.unit,
            "new_is_custom_ingredient": new.is_custom,
        });
        self.send(self.client.patch(url).json(&body), token, Expected::ok())
            .await?;
        Ok(())
    }

    /// Move an ingredient from one list to another in a single call.
    pub async fn move_list_ingredient(
        &self,
        token: &str,
        old_list: &str,
        old: &Ingredient,
        new_list: &str,
        new: &Ingredient,
    ) -> Result<(), ApiError> {
        let url = self.url(&["lists", "ingredients", "move"]);
        let body = json!({
            "old_list_name": old_list,
            "old_ingredient": old.name,
            "old_ingredient_type": old.category,
            "old_amount": old.amount,
            "old_unit": old.unit,
            "old_is_custom_ingredient": old.is_custom,
            "new_list_name": new_list,
            "new_ingredient": new.name,
            "new_ingredient_type": new.category,
            "new_amount": new.amount,
            "new_unit": new.unit,
            "new_is_custom_ingredient": new.is_custom,
        });
        self.send(self.client.patch(url).json(&body), token, Expected::AnySuccess)
            .await?;
        Ok(())
    }

    pub async fn create_list(&self, token: &str, name: &str) -> Result<(), ApiError> {
        let url = self.url(&["lists", name]);
        self.send(self.client.post(url), token, Expected::created()).await?;
        Ok(())
    }

    pub async fn delete_list(&self, token: &str, name: &str) -> Result<(), ApiError> {
        let url = self.url(&["lists", name]);
        self.send(self.client.delete(url), token, Expected::ok()).await?;
        Ok(())
    }

    pub async fn rename_list(&self, token: &str, old_name: &str, new_name: &str) -> Result<(), ApiError> {
        let url = self.url(&["lists", old_name]);
        let body = json!({ "new_list_name": new_name });
        self.send(self.client.put(url).json(&body), token, Expected::AnySuccess)
            .await?;
        Ok(())
    }

    // ===== Recipes =====

    pub async fn fetch_recipes(&self, token: &str) -> Result<Vec<Recipe>, ApiError> {
        let url = self.url(&["recipes"]);
        let parsed: Vec<RecipeResponse> = self
            .get_json(url, token, Expected::ok(), "Failed to parse recipes")
            .await?;
        Ok(parsed.into_iter().map(RecipeResponse::into_recipe).collect())
    }

    pub async fn create_recipe(&self, token: &str, name: &str) -> Result<(), ApiError> {
        let url = self.url(&["recipes", name]);
        self.send(self.client.post(url), token, Expected::AnySuccess).await?;
        Ok(())
    }

    pub async fn delete_recipe(&self, token: &str, name: &str) -> Result<(), ApiError> {
        let url = self.url(&["recipes", name]);
        self.send(self.client.delete(url), token, Expected::AnySuccess).await?;
        Ok(())
    }

    pub async fn add_recipe_ingredient(
        &self,
        token: &str,
        recipe_name: &str,
        ingredient: &Ingredient,
    ) -> Result<(), ApiError> {
        let url = self.url(&["recipes", "ingredients"]);
        let body = json!({
            "recipe_name": recipe_name,
            "ingredient": ingredient.name,
            "ingredient_type": ingredient.category,
            "amount": ingredient.amount,
            "unit": ingredient.unit,
            "is_custom_ingredient": ingredient.is_custom,
        });
        self.send(self.client.post(url).json(&body), token, Expected::AnySuccess)
            .await?;
        Ok(())
    }

    pub async fn delete_recipe_ingredient(
        &self,
        token: &str,
        recipe_name: &str,
        ingredient: &Ingredient,
    ) -> Result<(), ApiError> {
        let url = self.url(&["recipes", "ingredients"]);
        let is_custom = ingredient.is_custom.to_string();
        let request = self.client.delete(url).query(&[
            ("recipe_name", recipe_name),
            ("ingredient", ingredient.name.as_str()),
            ("ingredient_type", ingredient.category.as_str()),
            ("is_custom_ingredient", is_custom.as_str()),
        ]);
        self.send(request, token, Expected::AnySuccess).await?;
        Ok(())
    }

    pub async fn add_recipe_step(&self, token: &str, recipe_name: &str, step: &str) -> Result<(), ApiError> {
        let url = self.url(&["recipes", "steps"]);
        let body = json!({ "recipe_name": recipe_name, "step": step });
        self.send(self.client.post(url).json(&body), token, Expected::AnySuccess)
            .await?;
        Ok(())
    }

    pub async fn delete_recipe_step(
        &self,
        token: &str,
        recipe_name: &str,
        step_number: usize,
    ) -> Result<(), ApiError> {
        let url = self.url(&["recipes", "steps"]);
        let step_number = step_number.to_string();
        let request = self
            .client
            .delete(url)
            .query(&[("recipe_name", recipe_name), ("step_number", step_number.as_str())]);
        self.send(request, token, Expected::AnySuccess).await?;
        Ok(())
    }
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    common_ingredients: Vec<CatalogItem>,
    #[serde(default)]
    custom_ingredients: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
struct CatalogItem {
    name: String,
    #[serde(rename = "type")]
    category: Option<String>,
}

impl CatalogItem {
    fn into_ingredient(self, is_custom: bool) -> Ingredient {
        Ingredient::new(self.name, self.category.unwrap_or_default(), is_custom)
    }
}

#[derive(Debug, Deserialize)]
struct UnitItem {
    unit: String,
}

#[derive(Debug, Deserialize)]
struct ListIngredientItem {
    ingredient_name: String,
    ingredient_type: Option<String>,
    amount: Option<f64>,
    unit: Option<String>,
    is_custom_ingredient: Option<bool>,
}

impl ListIngredientItem {
    fn into_ingredient(self) -> Ingredient {
        Ingredient {
            name: self.ingredient_name,
            category: self.ingredient_type.unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            is_custom: self.is_custom_ingredient.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    list_name: Option<String>,
    #[serde(default)]
    ingredients: Option<Vec<ListIngredientItem>>,
}

impl ListResponse {
    fn into_list(self) -> NamedList {
        let name = normalize_name(self.list_name.as_deref());
        let ingredients = self
            .ingredients
            .unwrap_or_default()
            .into_iter()
            .map(ListIngredientItem::into_ingredient)
            .collect();
        NamedList::with_ingredients(&name, ingredients)
    }
}

#[derive(Debug, Deserialize)]
struct RecipeResponse {
    recipe_name: Option<String>,
    #[serde(default)]
    ingredients: Option<Vec<ListIngredientItem>>,
    #[serde(default)]
    steps: Option<Vec<String>>,
}

impl RecipeResponse {
    fn into_recipe(self) -> Recipe {
        let mut recipe = Recipe::new(self.recipe_name.as_deref().unwrap_or_default());
        for item in self.ingredients.unwrap_or_default() {
            recipe.add_ingredient(item.into_ingredient());
        }
        recipe.steps = self.steps.unwrap_or_default();
        recipe
    }
}
