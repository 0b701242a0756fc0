//! Ingredient model and its list-membership identity.

use serde::{Deserialize, Serialize};

/// An ingredient as it appears in the catalog, a user list, or a recipe.
///
/// `amount` and `unit` are payload; two ingredients are "the same" for list
/// membership when their [`IngredientKey`]s match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub is_custom: bool,
}

/// Identity of an ingredient: `(name, category, is_custom)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientKey {
    pub name: String,
    pub category: String,
    pub is_custom: bool,
}

impl IngredientKey {
    pub fn new(name: impl Into<String>, category: impl Into<String>, is_custom: bool) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            is_custom,
        }
    }
}

impl Ingredient {
    /// A catalog entry: no amount, no unit.
    pub fn new(name: impl Into<String>, category: impl Into<String>, is_custom: bool) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            amount: 0.0,
            unit: String::new(),
            is_custom,
        }
    }

    /// Builder-style setter for the amount/unit payload.
    pub fn with_amount(mut self, amount: f64, unit: impl Into<String>) -> Self {
        self.amount = amount;
        self.unit = unit.into();
        self
    }

    pub fn key(&self) -> IngredientKey {
        IngredientKey::new(self.name.clone(), self.category.clone(), self.is_custom)
    }

    pub fn matches(&self, key: &IngredientKey) -> bool {
        self.name == key.name && self.category == key.category && self.is_custom == key.is_custom
    }

    /// Amount and unit for display, e.g. "2 cup" or "1.5".
    pub fn amount_display(&self) -> String {
        let amount = if self.amount.fract() == 0.0 {
            format!("{}", self.amount as i64)
        } else {
            format!("{}", self.amount)
        };
        if self.unit.is_empty() {
            amount
        } else {
            format!("{} {}", amount, self.unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_payload() {
        let a = Ingredient::new("Flour", "Baking", false).with_amount(2.0, "cup");
        let b = Ingredient::new("Flour", "Baking", false).with_amount(500.0, "g");
        assert_eq!(a.key(), b.key());
        assert!(a.matches(&b.key()));
    }

    #[test]
    fn test_identity_includes_custom_flag() {
        let common = Ingredient::new("Flour", "Baking", false);
        let custom = Ingredient::new("Flour", "Baking", true);
        assert_ne!(common.key(), custom.key());
        assert!(!custom.matches(&common.key()));
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Ingredient::new("Egg", "Dairy", false).with_amount(3.0, "").amount_display(), "3");
        assert_eq!(
            Ingredient::new("Milk", "Dairy", false).with_amount(1.5, "cup").amount_display(),
            "1.5 cup"
        );
    }
}
