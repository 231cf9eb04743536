//! Allergen and ingredient catalog.
//!
//! The catalog is two static JSON documents (an array of allergens and an array of
//! ingredients) loaded once at startup. Loading validates everything eagerly:
//!
//! - both documents parse, every code is non-blank and free of whitespace
//! - codes are unique within their document
//! - every `allergenCodes` entry of an ingredient names a known allergen
//!
//! After loading the catalog is never mutated; services share it behind an `Arc`.

use crate::config::CoreConfig;
use crate::error::{CatalogError, CatalogResult};
use dishcheck_types::{Code, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// A regulated substance category tracked for disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergen {
    pub code: Code,
    pub name: NonEmptyText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A catalog item and the allergens it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub code: Code,
    pub name: NonEmptyText,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub allergen_codes: BTreeSet<Code>,
    #[serde(default)]
    pub is_common: bool,
}

/// Validated, read-only catalog with code indexes.
#[derive(Debug, Clone)]
pub struct Catalog {
    allergens: Vec<Allergen>,
    ingredients: Vec<Ingredient>,
    allergen_index: HashMap<Code, usize>,
    ingredient_index: HashMap<Code, usize>,
}

impl Catalog {
    /// Loads the catalog files named by `cfg`.
    pub fn load(cfg: &CoreConfig) -> CatalogResult<Self> {
        Self::load_files(&cfg.allergens_path(), &cfg.ingredients_path())
    }

    /// Reads and validates the two catalog documents.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if either file cannot be read, is not a JSON array of the expected
    /// records, or the combined catalog breaks uniqueness or referential integrity.
    pub fn load_files(allergens_path: &Path, ingredients_path: &Path) -> CatalogResult<Self> {
        let allergens = read_file(allergens_path)?;
        let ingredients = read_file(ingredients_path)?;
        let catalog = Self::from_json(&allergens, &ingredients)?;

        tracing::debug!(
            allergens = catalog.allergens.len(),
            ingredients = catalog.ingredients.len(),
            "loaded catalog from {}",
            allergens_path.parent().unwrap_or(allergens_path).display()
        );

        Ok(catalog)
    }

    /// Parses and validates catalog documents held in memory.
    pub fn from_json(allergens_json: &str, ingredients_json: &str) -> CatalogResult<Self> {
        let allergens: Vec<Allergen> =
            serde_json::from_str(allergens_json).map_err(|source| CatalogError::Malformed {
                document: "allergen",
                source,
            })?;
        let ingredients: Vec<Ingredient> =
            serde_json::from_str(ingredients_json).map_err(|source| CatalogError::Malformed {
                document: "ingredient",
                source,
            })?;

        Self::from_records(allergens, ingredients)
    }

    /// Builds the indexes and enforces uniqueness and referential integrity.
    pub fn from_records(
        allergens: Vec<Allergen>,
        ingredients: Vec<Ingredient>,
    ) -> CatalogResult<Self> {
        let mut allergen_index = HashMap::with_capacity(allergens.len());
        for (position, allergen) in allergens.iter().enumerate() {
            if allergen_index.insert(allergen.code.clone(), position).is_some() {
                return Err(CatalogError::DuplicateAllergen(allergen.code.clone()));
            }
        }

        let mut ingredient_index = HashMap::with_capacity(ingredients.len());
        for (position, ingredient) in ingredients.iter().enumerate() {
            if ingredient_index.insert(ingredient.code.clone(), position).is_some() {
                return Err(CatalogError::DuplicateIngredient(ingredient.code.clone()));
            }
            if let Some(unknown) = ingredient
                .allergen_codes
                .iter()
                .find(|code| !allergen_index.contains_key(*code))
            {
                return Err(CatalogError::UnknownAllergen {
                    ingredient: ingredient.code.clone(),
                    allergen: unknown.clone(),
                });
            }
        }

        Ok(Self {
            allergens,
            ingredients,
            allergen_index,
            ingredient_index,
        })
    }

    /// Allergens in file order.
    pub fn allergens(&self) -> &[Allergen] {
        &self.allergens
    }

    /// Ingredients in file order.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn allergen(&self, code: &str) -> Option<&Allergen> {
        self.allergen_index.get(code).map(|&i| &self.allergens[i])
    }

    pub fn ingredient(&self, code: &str) -> Option<&Ingredient> {
        self.ingredient_index.get(code).map(|&i| &self.ingredients[i])
    }

    pub fn contains_ingredient(&self, code: &str) -> bool {
        self.ingredient_index.contains_key(code)
    }

    /// Ingredients flagged as commonly used, in file order.
    pub fn common_ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter().filter(|i| i.is_common)
    }

    /// Ingredients grouped by category, categories in first-seen order.
    pub fn categories(&self) -> Vec<(&str, Vec<&Ingredient>)> {
        let mut groups: Vec<(&str, Vec<&Ingredient>)> = Vec::new();
        for ingredient in &self.ingredients {
            match groups
                .iter_mut()
                .find(|(name, _)| *name == ingredient.category)
            {
                Some((_, members)) => members.push(ingredient),
                None => groups.push((ingredient.category.as_str(), vec![ingredient])),
            }
        }
        groups
    }

    /// Ingredients whose allergen set contains `allergen`.
    pub fn ingredients_containing(&self, allergen: &str) -> impl Iterator<Item = &Ingredient> + '_ {
        let allergen = allergen.trim().to_owned();
        self.ingredients
            .iter()
            .filter(move |i| i.allergen_codes.contains(allergen.as_str()))
    }

    /// Ingredients matching every criterion of `filter`, in file order.
    pub fn select(&self, filter: &IngredientFilter) -> Vec<&Ingredient> {
        let candidates: Box<dyn Iterator<Item = &Ingredient> + '_> = match &filter.allergen {
            Some(allergen) => Box::new(self.ingredients_containing(allergen)),
            None if filter.common_only => Box::new(self.common_ingredients()),
            None => Box::new(self.ingredients.iter()),
        };
        candidates
            .filter(|i| !filter.common_only || i.is_common)
            .filter(|i| filter.category.as_deref().map_or(true, |c| i.category == c))
            .collect()
    }
}

/// Criteria for [`Catalog::select`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    pub common_only: bool,
    /// Exact category name.
    pub category: Option<String>,
    /// Allergen code the ingredient must contain.
    pub allergen: Option<String>,
}

impl IngredientFilter {
    pub fn common_only(mut self, common_only: bool) -> Self {
        self.common_only = common_only;
        self
    }

    /// Blank values are ignored.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.trim().is_empty());
        self
    }

    /// Blank values are ignored.
    pub fn allergen(mut self, allergen: Option<String>) -> Self {
        self.allergen = allergen.filter(|a| !a.trim().is_empty());
        self
    }
}

fn read_file(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
