//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the core services, so
//! nothing reads process-wide environment variables while requests are being handled.

use crate::constants::{DEFAULT_ALLERGENS_FILENAME, DEFAULT_CATALOG_DIR, DEFAULT_INGREDIENTS_FILENAME};
use crate::error::{CatalogError, CatalogResult, CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    catalog_dir: PathBuf,
    allergens_file: String,
    ingredients_file: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// File names are relative to `catalog_dir` and must be plain names, not paths.
    pub fn new(
        catalog_dir: PathBuf,
        allergens_file: String,
        ingredients_file: String,
    ) -> CoreResult<Self> {
        for (label, name) in [("allergens", &allergens_file), ("ingredients", &ingredients_file)] {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "{label} file name cannot be empty"
                )));
            }
            if name.contains('/') || name.contains('\\') || name.contains("..") {
                return Err(CoreError::InvalidInput(format!(
                    "{label} file name must be a plain file name: {name}"
                )));
            }
        }

        Ok(Self {
            catalog_dir,
            allergens_file,
            ingredients_file,
        })
    }

    /// Configuration for a catalog directory holding the default file names.
    pub fn with_defaults(catalog_dir: PathBuf) -> Self {
        Self {
            catalog_dir,
            allergens_file: DEFAULT_ALLERGENS_FILENAME.into(),
            ingredients_file: DEFAULT_INGREDIENTS_FILENAME.into(),
        }
    }

    pub fn catalog_dir(&self) -> &Path {
        &self.catalog_dir
    }

    pub fn allergens_path(&self) -> PathBuf {
        self.catalog_dir.join(&self.allergens_file)
    }

    pub fn ingredients_path(&self) -> PathBuf {
        self.catalog_dir.join(&self.ingredients_file)
    }
}

/// Resolve the catalog directory without reading environment variables.
///
/// If `override_dir` is provided it must be a directory containing `allergens_file`.
/// Otherwise this searches for `data/` relative to the current working directory and then walks
/// up from `CARGO_MANIFEST_DIR`.
pub fn resolve_catalog_dir(
    override_dir: Option<PathBuf>,
    allergens_file: &str,
) -> CatalogResult<PathBuf> {
    let looks_like_catalog_dir = |path: &Path| path.join(allergens_file).is_file();

    if let Some(catalog_dir) = override_dir {
        if catalog_dir.is_dir() && looks_like_catalog_dir(&catalog_dir) {
            return Ok(catalog_dir);
        }
        return Err(CatalogError::DirectoryNotFound(format!(
            "{} (must be a directory containing {allergens_file})",
            catalog_dir.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_CATALOG_DIR);
    if cwd_relative.is_dir() && looks_like_catalog_dir(&cwd_relative) {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_CATALOG_DIR);
        if candidate.is_dir() && looks_like_catalog_dir(&candidate) {
            return Ok(candidate);
        }
    }

    Err(CatalogError::DirectoryNotFound(format!(
        "could not locate {DEFAULT_CATALOG_DIR}/ directory containing {allergens_file}"
    )))
}

/// Pick a catalog file name from an optional string value.
///
/// `None` or blank values fall back to `default`.
pub fn file_name_from_env_value(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_rejects_path_like_file_names() {
        let err = CoreConfig::new(
            PathBuf::from("data"),
            "../allergens.json".into(),
            DEFAULT_INGREDIENTS_FILENAME.into(),
        )
        .expect_err("should reject traversal");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("plain file name")));
    }

    #[test]
    fn test_new_rejects_blank_file_names() {
        let err = CoreConfig::new(PathBuf::from("data"), "a.json".into(), "  ".into())
            .expect_err("should reject blank");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("ingredients")));
    }

    #[test]
    fn test_paths_join_catalog_dir() {
        let cfg = CoreConfig::with_defaults(PathBuf::from("/srv/catalog"));
        assert_eq!(cfg.allergens_path(), PathBuf::from("/srv/catalog/allergens.json"));
        assert_eq!(cfg.ingredients_path(), PathBuf::from("/srv/catalog/ingredients.json"));
    }

    #[test]
    fn test_resolve_catalog_dir_accepts_valid_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("allergens.json"), "[]").unwrap();

        let resolved =
            resolve_catalog_dir(Some(dir.path().to_path_buf()), "allergens.json").unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn test_resolve_catalog_dir_rejects_override_without_catalog() {
        let dir = TempDir::new().unwrap();
        let err = resolve_catalog_dir(Some(dir.path().to_path_buf()), "allergens.json")
            .expect_err("should reject");
        assert!(matches!(err, CatalogError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_resolve_catalog_dir_finds_workspace_data_dir() {
        let resolved = resolve_catalog_dir(None, DEFAULT_ALLERGENS_FILENAME).unwrap();
        assert!(resolved.join(DEFAULT_ALLERGENS_FILENAME).is_file());
    }

    #[test]
    fn test_file_name_from_env_value_falls_back_on_blank() {
        assert_eq!(file_name_from_env_value(None, "a.json"), "a.json");
        assert_eq!(file_name_from_env_value(Some("  ".into()), "a.json"), "a.json");
        assert_eq!(
            file_name_from_env_value(Some(" b.json ".into()), "a.json"),
            "b.json"
        );
    }
}
