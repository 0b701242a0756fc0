use serde::{Deserialize, Serialize};

use super::list::normalize_name;
use super::{Ingredient, IngredientKey, NamedList};

/// A recipe: a name, its ingredients, and 1-based ordered steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: NamedList,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl Recipe {
    pub fn new(name: &str) -> Self {
        let name = normalize_name(Some(name));
        Self {
            ingredients: NamedList::new(&name),
            name,
            steps: Vec::new(),
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step by 1-based position.
    pub fn step(&self, step_number: usize) -> Option<&str> {
        step_number
            .checked_sub(1)
            .and_then(|idx| self.steps.get(idx))
            .map(String::as_str)
    }

    pub fn add_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    /// Remove step `step_number` (1-based); later steps shift down by one.
    /// Out-of-range positions leave the recipe unchanged.
    pub fn remove_step(&mut self, step_number: usize) -> Option<String> {
        if step_number == 0 || step_number > self.steps.len() {
            return None;
        }
        Some(self.steps.remove(step_number - 1))
    }

    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.add_ingredient(ingredient);
    }

    pub fn remove_ingredient(&mut self, key: &IngredientKey) -> Option<Ingredient> {
        self.ingredients.remove_ingredient(key)
    }
}

pub fn find_recipe_mut<'a>(recipes: &'a mut [Recipe], name: &str) -> Option<&'a mut Recipe> {
    recipes.iter_mut().find(|r| r.name == name)
}
