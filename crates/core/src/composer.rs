//! The dish currently being built.
//!
//! A [`DishComposer`] owns exactly one [`DishDraft`] and validates every ingredient it accepts
//! against the catalog, so a draft never holds a code the catalog does not know.

use crate::aggregator::{aggregate, AggregationResult};
use crate::catalog::Catalog;
use crate::error::{DishError, DishResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// In-progress, uncommitted dish.
///
/// `ingredient_codes` keeps selection order and may repeat a code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chef: String,
    #[serde(default)]
    pub ingredient_codes: Vec<String>,
}

impl DishDraft {
    pub fn new(name: impl Into<String>, chef: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chef: chef.into(),
            ingredient_codes: Vec::new(),
        }
    }

    pub fn with_ingredients<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredient_codes.extend(codes.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone)]
pub struct DishComposer {
    catalog: Arc<Catalog>,
    draft: DishDraft,
}

impl DishComposer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            draft: DishDraft::default(),
        }
    }

    pub fn draft(&self) -> &DishDraft {
        &self.draft
    }

    /// Appends `code` to the draft.
    ///
    /// # Errors
    ///
    /// Returns [`DishError::UnknownIngredient`] if the catalog has no such ingredient. The draft
    /// is left unchanged.
    pub fn add_ingredient(&mut self, code: &str) -> DishResult<()> {
        let code = code.trim();
        let ingredient = self
            .catalog
            .ingredient(code)
            .ok_or_else(|| DishError::UnknownIngredient(code.to_string()))?;
        self.draft
            .ingredient_codes
            .push(ingredient.code.as_str().to_string());
        Ok(())
    }

    /// Removes every occurrence of `code`. Returns whether anything was removed.
    ///
    /// Absent codes are a no-op so repeated clicks in the client are harmless.
    pub fn remove_ingredient(&mut self, code: &str) -> bool {
        let code = code.trim();
        let before = self.draft.ingredient_codes.len();
        self.draft.ingredient_codes.retain(|c| c != code);
        before != self.draft.ingredient_codes.len()
    }

    /// Resets name, chef and ingredients.
    pub fn clear(&mut self) {
        self.draft = DishDraft::default();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_chef(&mut self, chef: impl Into<String>) {
        self.draft.chef = chef.into();
    }

    /// Aggregates the current draft against the composer's catalog.
    pub fn aggregate(&self) -> DishResult<AggregationResult> {
        aggregate(&self.draft.ingredient_codes, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_catalog;

    fn composer() -> DishComposer {
        DishComposer::new(Arc::new(sample_catalog()))
    }

    #[test]
    fn test_add_ingredient_keeps_order_and_duplicates() {
        let mut composer = composer();
        composer.add_ingredient("milk").unwrap();
        composer.add_ingredient("bread").unwrap();
        composer.add_ingredient("milk").unwrap();

        assert_eq!(composer.draft().ingredient_codes, vec!["milk", "bread", "milk"]);
    }

    #[test]
    fn test_add_unknown_ingredient_leaves_draft_unchanged() {
        let mut composer = composer();
        composer.set_name("Toast");
        composer.add_ingredient("bread").unwrap();
        let before = composer.draft().clone();

        let err = composer.add_ingredient("unknown_code").expect_err("should fail");

        assert_eq!(err, DishError::UnknownIngredient("unknown_code".into()));
        assert_eq!(composer.draft(), &before);
    }

    #[test]
    fn test_add_ingredient_trims_code() {
        let mut composer = composer();
        composer.add_ingredient("  milk ").unwrap();
        assert_eq!(composer.draft().ingredient_codes, vec!["milk"]);

        let err = composer.add_ingredient(" caviar ").expect_err("should fail");
        assert_eq!(err, DishError::UnknownIngredient("caviar".into()));
        assert!(composer.remove_ingredient(" milk"));
    }

    #[test]
    fn test_remove_ingredient_removes_all_occurrences() {
        let mut composer = composer();
        for code in ["bread", "butter", "bread"] {
            composer.add_ingredient(code).unwrap();
        }

        assert!(composer.remove_ingredient("bread"));
        assert_eq!(composer.draft().ingredient_codes, vec!["butter"]);
    }

    #[test]
    fn test_remove_absent_ingredient_is_noop() {
        let mut composer = composer();
        composer.add_ingredient("milk").unwrap();

        assert!(!composer.remove_ingredient("bread"));
        assert!(!composer.remove_ingredient("not_in_catalog"));
        assert_eq!(composer.draft().ingredient_codes, vec!["milk"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut composer = composer();
        composer.set_name("Carbonara");
        composer.set_chef("Ana");
        composer.add_ingredient("pasta").unwrap();

        composer.clear();

        assert_eq!(composer.draft(), &DishDraft::default());
    }

    #[test]
    fn test_aggregate_follows_draft_changes() {
        let mut composer = composer();
        composer.add_ingredient("bread").unwrap();
        composer.add_ingredient("butter").unwrap();
        assert!(composer.aggregate().unwrap().contains("milk_protein"));

        composer.remove_ingredient("butter");
        let result = composer.aggregate().unwrap();
        assert!(!result.contains("milk_protein"));
        assert!(result.contains("gluten"));
    }

    #[test]
    fn test_draft_deserialises_with_defaults() {
        let draft: DishDraft = serde_json::from_str(r#"{"ingredientCodes":["bread"]}"#).unwrap();
        assert_eq!(draft, DishDraft::default().with_ingredients(["bread"]));
    }
}
