use dishcheck_types::Code;
use std::path::PathBuf;

/// A catalog that cannot be loaded or fails its consistency checks.
///
/// Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {document} catalog: {source}")]
    Malformed {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate allergen code: {0}")]
    DuplicateAllergen(Code),
    #[error("duplicate ingredient code: {0}")]
    DuplicateIngredient(Code),
    #[error("ingredient {ingredient} references unknown allergen code {allergen}")]
    UnknownAllergen { ingredient: Code, allergen: Code },
    #[error("catalog directory not found: {0}")]
    DirectoryNotFound(String),
}

/// Rejections raised while composing, aggregating or committing a dish.
///
/// All of these are recoverable and surface to the caller as a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DishError {
    #[error("unknown ingredient code: {0}")]
    UnknownIngredient(String),
    #[error("dish has no ingredients")]
    EmptyDish,
    #[error("dish name is required")]
    MissingName,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Dish(#[from] DishError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type DishResult<T> = std::result::Result<T, DishError>;
pub type CoreResult<T> = std::result::Result<T, CoreError>;
