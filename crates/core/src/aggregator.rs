//! Allergen aggregation for a composed dish.
//!
//! Aggregation is the union of the allergen sets of every distinct ingredient in the dish.
//! The result depends only on the catalog and the *set* of ingredient codes: input order and
//! repeated codes never change it.

use crate::catalog::{Allergen, Catalog};
use crate::error::{DishError, DishResult};
use dishcheck_types::Code;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Allergens present in a dish, with per-ingredient traceability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Distinct allergens, ordered by code.
    pub allergens: Vec<Allergen>,
    /// Allergen codes contributed by each distinct ingredient.
    pub per_ingredient: BTreeMap<Code, BTreeSet<Code>>,
}

impl AggregationResult {
    pub fn allergen_codes(&self) -> BTreeSet<Code> {
        self.allergens.iter().map(|a| a.code.clone()).collect()
    }

    pub fn contains(&self, allergen: &str) -> bool {
        self.allergens.iter().any(|a| a.code.as_str() == allergen)
    }

    /// Ingredient codes that contribute `allergen`, ordered by code.
    pub fn sources(&self, allergen: &str) -> Vec<&Code> {
        self.per_ingredient
            .iter()
            .filter(|(_, codes)| codes.contains(allergen))
            .map(|(ingredient, _)| ingredient)
            .collect()
    }

    pub fn is_allergen_free(&self) -> bool {
        self.allergens.is_empty()
    }
}

/// Computes the allergens present in a dish made of `ingredient_codes`.
///
/// # Errors
///
/// Returns [`DishError::UnknownIngredient`] naming the first code, in input order, that is not
/// in the catalog. Unknown codes are never skipped.
///
/// Codes are trimmed before lookup.
pub fn aggregate<S: AsRef<str>>(
    ingredient_codes: &[S],
    catalog: &Catalog,
) -> DishResult<AggregationResult> {
    let mut per_ingredient: BTreeMap<Code, BTreeSet<Code>> = BTreeMap::new();

    for code in ingredient_codes {
        let code = code.as_ref().trim();
        let ingredient = catalog
            .ingredient(code)
            .ok_or_else(|| DishError::UnknownIngredient(code.to_string()))?;
        per_ingredient
            .entry(ingredient.code.clone())
            .or_insert_with(|| ingredient.allergen_codes.clone());
    }

    let union: BTreeSet<&Code> = per_ingredient.values().flatten().collect();
    // Referential integrity is checked at catalog load, so every code resolves.
    let allergens = union
        .into_iter()
        .filter_map(|code| catalog.allergen(code.as_str()).cloned())
        .collect();

    Ok(AggregationResult {
        allergens,
        per_ingredient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_catalog;

    fn codes(result: &AggregationResult) -> Vec<String> {
        result
            .allergens
            .iter()
            .map(|a| a.code.to_string())
            .collect()
    }

    #[test]
    fn test_bread_milk_butter_example() {
        let catalog = sample_catalog();
        let result = aggregate(&["bread", "milk", "butter"], &catalog).unwrap();

        assert_eq!(codes(&result), vec!["gluten", "lactose", "milk_protein"]);

        let per: BTreeMap<&str, Vec<&str>> = result
            .per_ingredient
            .iter()
            .map(|(k, v)| (k.as_str(), v.iter().map(Code::as_str).collect()))
            .collect();
        assert_eq!(per["bread"], vec!["gluten"]);
        assert_eq!(per["milk"], vec!["lactose"]);
        assert_eq!(per["butter"], vec!["lactose", "milk_protein"]);
        assert_eq!(per.len(), 3);
    }

    #[test]
    fn test_empty_list_yields_empty_result() {
        let catalog = sample_catalog();
        let result = aggregate::<&str>(&[], &catalog).unwrap();

        assert!(result.allergens.is_empty());
        assert!(result.per_ingredient.is_empty());
        assert!(result.is_allergen_free());
        assert_eq!(result, AggregationResult::default());
    }

    #[test]
    fn test_order_independent() {
        let catalog = sample_catalog();
        let forward = aggregate(&["bread", "milk", "butter", "tomato"], &catalog).unwrap();

        for permutation in [
            ["butter", "bread", "tomato", "milk"],
            ["tomato", "butter", "milk", "bread"],
            ["milk", "tomato", "bread", "butter"],
        ] {
            assert_eq!(aggregate(&permutation, &catalog).unwrap(), forward);
        }
    }

    #[test]
    fn test_duplicates_match_deduplicated_list() {
        let catalog = sample_catalog();
        let deduplicated = aggregate(&["bread", "butter"], &catalog).unwrap();
        let repeated =
            aggregate(&["bread", "butter", "bread", "bread", "butter"], &catalog).unwrap();

        assert_eq!(repeated, deduplicated);
    }

    #[test]
    fn test_shared_allergen_listed_once() {
        let catalog = sample_catalog();
        let result = aggregate(&["milk", "butter"], &catalog).unwrap();

        let lactose_entries = result
            .allergens
            .iter()
            .filter(|a| a.code.as_str() == "lactose")
            .count();
        assert_eq!(lactose_entries, 1);
    }

    #[test]
    fn test_ingredient_without_allergens_is_traced() {
        let catalog = sample_catalog();
        let result = aggregate(&["tomato"], &catalog).unwrap();

        assert!(result.is_allergen_free());
        assert!(result.per_ingredient["tomato"].is_empty());
    }

    #[test]
    fn test_unknown_ingredient_is_an_error() {
        let catalog = sample_catalog();
        let err = aggregate(&["bread", "unknown_code", "caviar"], &catalog).expect_err("should fail");
        assert_eq!(err, DishError::UnknownIngredient("unknown_code".into()));
    }

    #[test]
    fn test_codes_are_trimmed() {
        let catalog = sample_catalog();
        let padded = aggregate(&[" bread", "butter "], &catalog).unwrap();
        assert_eq!(padded, aggregate(&["bread", "butter"], &catalog).unwrap());

        let err = aggregate(&["\tcaviar "], &catalog).expect_err("should fail");
        assert_eq!(err, DishError::UnknownIngredient("caviar".into()));
    }

    #[test]
    fn test_sources_lists_contributing_ingredients() {
        let catalog = sample_catalog();
        let result = aggregate(&["pasta", "tomato", "bread", "milk"], &catalog).unwrap();

        let sources: Vec<&str> = result.sources("gluten").into_iter().map(Code::as_str).collect();
        assert_eq!(sources, vec!["bread", "pasta"]);
        assert!(result.sources("milk_protein").is_empty());
        assert!(result.contains("lactose"));
        assert!(!result.contains("milk_protein"));
    }

    #[test]
    fn test_serialises_with_camel_case_fields() {
        let catalog = sample_catalog();
        let result = aggregate(&["bread"], &catalog).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["allergens"][0]["code"], "gluten");
        assert_eq!(json["perIngredient"]["bread"][0], "gluten");
    }
}
