//! Named, ordered ingredient collections.
//!
//! A `NamedList` is both a user's grocery/pantry list and the ingredient
//! section embedded in a recipe.

use serde::{Deserialize, Serialize};

use super::{Ingredient, IngredientKey};

/// Name given to lists and recipes that arrive without one.
pub const UNNAMED: &str = "No Name";

/// Normalize an optional or blank name to the `UNNAMED` sentinel.
pub fn normalize_name(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => UNNAMED.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedList {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl NamedList {
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_name(Some(name)),
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredients(name: &str, ingredients: Vec<Ingredient>) -> Self {
        let mut list = Self::new(name);
        for ingredient in ingredients {
            list.add_ingredient(ingredient);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn get(&self, key: &IngredientKey) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.matches(key))
    }

    pub fn contains(&self, key: &IngredientKey) -> bool {
        self.get(key).is_some()
    }

    /// Add an ingredient, summing amounts into an existing entry with the
    /// same identity instead of appending a duplicate.
    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        let key = ingredient.key();
        match self.ingredients.iter_mut().find(|i| i.matches(&key)) {
            Some(existing) => existing.amount += ingredient.amount,
            None => self.ingredients.push(ingredient),
        }
    }

    /// Remove the first ingredient with this identity.
    pub fn remove_ingredient(&mut self, key: &IngredientKey) -> Option<Ingredient> {
        let idx = self.ingredients.iter().position(|i| i.matches(key))?;
        Some(self.ingredients.remove(idx))
    }

    /// Remove every ingredient with this identity, returning how many went.
    pub fn remove_all(&mut self, key: &IngredientKey) -> usize {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| !i.matches(key));
        before - self.ingredients.len()
    }

    /// Replace the amount and unit of the ingredient with this identity.
    /// Returns false when no such ingredient is present.
    pub fn set_ingredient(&mut self, key: &IngredientKey, amount: f64, unit: &str) -> bool {
        match self.ingredients.iter_mut().find(|i| i.matches(key)) {
            Some(existing) => {
                existing.amount = amount;
                existing.unit = unit.to_string();
                true
            }
            None => false,
        }
    }
}

/// Find the first list with this name.
pub fn find_list<'a>(lists: &'a [NamedList], name: &str) -> Option<&'a NamedList> {
    lists.iter().find(|l| l.name == name)
}

pub fn find_list_mut<'a>(lists: &'a mut [NamedList], name: &str) -> Option<&'a mut NamedList> {
    lists.iter_mut().find(|l| l.name == name)
}
