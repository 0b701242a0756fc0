//! Core library for larder: the client-side data access and cache layer of a
//! recipe and grocery-list manager.
//!
//! - `api`: stateless client for the REST service
//! - `auth`: where bearer tokens come from
//! - `cache`: the four independently-aged collections
//! - `store`: reads gated by freshness, and mutations that patch the cache
//!   only after the server accepted them
//! - `models`: ingredients, lists and recipes
//! - `config`: on-disk configuration

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use auth::{CredentialStore, StaticToken, TokenProvider};
pub use cache::CacheManager;
pub use config::Config;
pub use models::{Ingredient, IngredientKey, NamedList, Recipe};
pub use store::{Snapshot, Store};
