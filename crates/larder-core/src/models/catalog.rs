//! Helpers for the merged common + custom ingredient catalog.

use crate::utils::cmp_ignore_case;

use super::{Ingredient, IngredientKey};

/// Sort catalog entries by name, case-insensitively ascending.
pub fn sort_catalog(catalog: &mut [Ingredient]) {
    catalog.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
}

/// Merge the common and custom subsets into one sorted catalog.
pub fn merge_catalog(common: Vec<Ingredient>, custom: Vec<Ingredient>) -> Vec<Ingredient> {
    let mut catalog: Vec<Ingredient> = common
        .into_iter()
        .map(|mut i| {
            i.is_custom = false;
            i
        })
        .chain(custom.into_iter().map(|mut i| {
            i.is_custom = true;
            i
        }))
        .collect();
    sort_catalog(&mut catalog);
    catalog
}

/// Remove every catalog entry with this identity.
pub fn remove_from_catalog(catalog: &mut Vec<Ingredient>, key: &IngredientKey) -> usize {
    let before = catalog.len();
    catalog.retain(|i| !i.matches(key));
    before - catalog.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(catalog: &[Ingredient]) -> Vec<&str> {
        catalog.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_merge_flags_and_sorts() {
        let catalog = merge_catalog(
            vec![Ingredient::new("Milk", "Dairy", false), Ingredient::new("apple", "Fruit", true)],
            vec![Ingredient::new("Almond Milk", "Dairy", false)],
        );
        assert_eq!(names(&catalog), vec!["Almond Milk", "apple", "Milk"]);
        assert!(catalog[0].is_custom);
        assert!(!catalog[1].is_custom);
        assert!(!catalog[2].is_custom);
    }

    #[test]
    fn test_remove_from_catalog_removes_every_match() {
        let mut catalog = vec![
            Ingredient::new("Tofu", "Protein", true),
            Ingredient::new("Tofu", "Protein", false),
            Ingredient::new("Tofu", "Protein", true),
        ];
        let removed = remove_from_catalog(&mut catalog, &IngredientKey::new("Tofu", "Protein", true));
        assert_eq!(removed, 2);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog[0].is_custom);
    }
}
