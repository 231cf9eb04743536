//! Constants used throughout the dishcheck core crate.

/// Directory searched for the catalog when no explicit directory is configured.
pub const DEFAULT_CATALOG_DIR: &str = "data";

/// Default filename of the allergen catalog inside the catalog directory.
pub const DEFAULT_ALLERGENS_FILENAME: &str = "allergens.json";

/// Default filename of the ingredient catalog inside the catalog directory.
pub const DEFAULT_INGREDIENTS_FILENAME: &str = "ingredients.json";

/// First id handed out by a fresh dish ledger.
pub const FIRST_DISH_ID: u64 = 1;
