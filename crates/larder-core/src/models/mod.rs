//! Data models for larder entities.
//!
//! - `Ingredient` and its identity `IngredientKey`
//! - `NamedList`: a user list or a recipe's ingredient section
//! - `Recipe`: name, ingredients and ordered steps
//! - catalog helpers for the merged common + custom ingredient set

pub mod catalog;
pub mod ingredient;
pub mod list;
pub mod recipe;

pub use catalog::{merge_catalog, remove_from_catalog, sort_catalog};
pub use ingredient::{Ingredient, IngredientKey};
pub use list::{find_list, find_list_mut, normalize_name, NamedList, UNNAMED};
pub use recipe::{find_recipe_mut, Recipe};
