use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use dishcheck_core::config::{file_name_from_env_value, resolve_catalog_dir};
use dishcheck_core::constants::{DEFAULT_ALLERGENS_FILENAME, DEFAULT_INGREDIENTS_FILENAME};
use dishcheck_core::{CoreConfig, KitchenService};

/// Main entry point for the dishcheck server
///
/// Loads and validates the catalog once, then serves the REST API. Any catalog problem aborts
/// startup with a non-zero exit before the listener is bound.
///
/// # Environment Variables
/// - `DISHCHECK_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DISHCHECK_CATALOG_DIR`: directory holding the catalog files (default: nearest `data/`)
/// - `DISHCHECK_ALLERGENS_FILE`: allergen catalog file name (default: "allergens.json")
/// - `DISHCHECK_INGREDIENTS_FILE`: ingredient catalog file name (default: "ingredients.json")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dishcheck_run=info".parse()?)
                .add_directive("dishcheck_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("DISHCHECK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let allergens_file = file_name_from_env_value(
        std::env::var("DISHCHECK_ALLERGENS_FILE").ok(),
        DEFAULT_ALLERGENS_FILENAME,
    );
    let ingredients_file = file_name_from_env_value(
        std::env::var("DISHCHECK_INGREDIENTS_FILE").ok(),
        DEFAULT_INGREDIENTS_FILENAME,
    );
    let catalog_override = std::env::var("DISHCHECK_CATALOG_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let catalog_dir = resolve_catalog_dir(catalog_override, &allergens_file)?;

    let cfg = CoreConfig::new(catalog_dir, allergens_file, ingredients_file)?;
    let service = KitchenService::from_config(&cfg).inspect_err(|e| {
        tracing::error!("catalog at {} is invalid: {}", cfg.catalog_dir().display(), e);
    })?;

    tracing::info!(
        allergens = service.catalog().allergens().len(),
        ingredients = service.catalog().ingredients().len(),
        "++ Loaded catalog from {}",
        cfg.catalog_dir().display()
    );

    let state = AppState {
        service: Arc::new(service),
    };
    let app = router(state);

    tracing::info!("++ Starting dishcheck REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
