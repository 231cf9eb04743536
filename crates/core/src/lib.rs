//! # dishcheck core
//!
//! Core business logic for composing dishes and disclosing their allergens:
//! - the allergen/ingredient catalog, validated once at load
//! - allergen aggregation over a dish's ingredients
//! - the active dish draft and the append-only dish ledger
//! - `KitchenService`, the injectable session object that owns all of the above
//!
//! **No API concerns**: HTTP servers, DTOs and CLI parsing belong in `api-rest`, `api-shared`
//! and `cli`.

pub mod aggregator;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod service;

pub use aggregator::{aggregate, AggregationResult};
pub use catalog::{Allergen, Catalog, Ingredient, IngredientFilter};
pub use composer::{DishComposer, DishDraft};
pub use config::CoreConfig;
pub use error::{CatalogError, CoreError, CoreResult, DishError, DishResult};
pub use ledger::{
    parse_date_bound, CommittedDish, DateBound, DishLedger, LedgerExport, LedgerFilter,
};
pub use service::{DraftView, KitchenService};

pub use dishcheck_types::{Code, NonEmptyText, TextError};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::catalog::Catalog;

    pub(crate) const ALLERGENS_JSON: &str = r#"[
        {"code": "gluten", "name": "Gluten", "description": "Wheat, rye, barley, oats"},
        {"code": "lactose", "name": "Lactose"},
        {"code": "milk_protein", "name": "Milk protein"}
    ]"#;

    pub(crate) const INGREDIENTS_JSON: &str = r#"[
        {"code": "bread", "name": "Bread", "category": "bakery", "allergenCodes": ["gluten"], "isCommon": true},
        {"code": "milk", "name": "Milk", "category": "dairy", "allergenCodes": ["lactose"], "isCommon": true},
        {"code": "butter", "name": "Butter", "category": "dairy", "allergenCodes": ["lactose", "milk_protein"]},
        {"code": "pasta", "name": "Pasta", "category": "bakery", "allergenCodes": ["gluten"]},
        {"code": "tomato", "name": "Tomato", "category": "produce", "allergenCodes": []}
    ]"#;

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::from_json(ALLERGENS_JSON, INGREDIENTS_JSON).expect("fixture catalog is valid")
    }
}
