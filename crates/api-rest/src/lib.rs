//! # API REST
//!
//! REST API for dishcheck.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! All domain behaviour lives in `dishcheck-core`; handlers only translate requests into
//! `KitchenService` calls and domain errors into status codes.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AddIngredientReq, AggregateReq, AggregationRes, AllergenRes, CatalogRes, CommitDishReq,
    CommittedDishRes, DraftRes, ErrorRes, HealthRes, HealthService, IngredientRes,
    IngredientsQuery, LedgerExportRes, ListDishesQuery, ListDishesRes, UpdateDraftReq,
};
use dishcheck_core::{
    parse_date_bound, CoreError, DateBound, DishDraft, DishError, IngredientFilter,
    KitchenService, LedgerFilter,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<KitchenService>,
}

type ApiError = (StatusCode, Json<ErrorRes>);
type ApiResult<T> = Result<T, ApiError>;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_catalog,
        list_allergens,
        list_ingredients,
        aggregate_dish,
        get_draft,
        update_draft,
        clear_draft,
        add_draft_ingredient,
        remove_draft_ingredient,
        commit_draft,
        commit_dish,
        list_dishes,
        get_dish,
        export_dishes,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        AllergenRes,
        IngredientRes,
        CatalogRes,
        AggregateReq,
        AggregationRes,
        DraftRes,
        UpdateDraftReq,
        AddIngredientReq,
        CommitDishReq,
        CommittedDishRes,
        ListDishesRes,
        LedgerExportRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and a permissive CORS layer for the browser client.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(get_catalog))
        .route("/catalog/allergens", get(list_allergens))
        .route("/catalog/ingredients", get(list_ingredients))
        .route("/aggregate", post(aggregate_dish))
        .route(
            "/draft",
            get(get_draft).put(update_draft).delete(clear_draft),
        )
        .route("/draft/ingredients", post(add_draft_ingredient))
        .route("/draft/ingredients/:code", delete(remove_draft_ingredient))
        .route("/draft/commit", post(commit_draft))
        .route("/dishes", get(list_dishes).post(commit_dish))
        .route("/dishes/export", get(export_dishes))
        .route("/dishes/:id", get(get_dish))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn reject(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorRes {
            error: error.into(),
            message: message.into(),
        }),
    )
}

fn dish_rejection(err: DishError) -> ApiError {
    tracing::warn!("rejected dish request: {}", err);
    match err {
        DishError::UnknownIngredient(_) => {
            reject(StatusCode::BAD_REQUEST, "unknown_ingredient", err.to_string())
        }
        DishError::EmptyDish => {
            reject(StatusCode::UNPROCESSABLE_ENTITY, "empty_dish", err.to_string())
        }
        DishError::MissingName => {
            reject(StatusCode::UNPROCESSABLE_ENTITY, "missing_name", err.to_string())
        }
    }
}

fn filter_from_query(query: ListDishesQuery) -> ApiResult<LedgerFilter> {
    let bound = |value: Option<String>, which: DateBound| {
        value
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_date_bound(&v, which))
            .transpose()
            .map_err(|err: CoreError| {
                tracing::warn!("rejected dish filter: {}", err);
                reject(StatusCode::BAD_REQUEST, "invalid_filter", err.to_string())
            })
    };

    let mut filter = LedgerFilter::default().between(
        bound(query.from, DateBound::Start)?,
        bound(query.to, DateBound::End)?,
    );
    if let Some(chef) = query.chef.filter(|c| !c.trim().is_empty()) {
        filter = filter.chef(chef);
    }
    if let Some(name) = query.name.filter(|n| !n.trim().is_empty()) {
        filter = filter.name_contains(name);
    }
    Ok(filter)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, also reporting the loaded catalog size.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let catalog = state.service.catalog();
    Json(HealthService::check_health(
        catalog.allergens().len(),
        catalog.ingredients().len(),
    ))
}

#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Full allergen and ingredient catalog", body = CatalogRes)
    )
)]
#[axum::debug_handler]
async fn get_catalog(State(state): State<AppState>) -> Json<CatalogRes> {
    let catalog = state.service.catalog();
    Json(CatalogRes {
        allergens: catalog.allergens().iter().map(AllergenRes::from).collect(),
        ingredients: catalog.ingredients().iter().map(IngredientRes::from).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/catalog/allergens",
    responses(
        (status = 200, description = "Allergens in catalog order", body = [AllergenRes])
    )
)]
#[axum::debug_handler]
async fn list_allergens(State(state): State<AppState>) -> Json<Vec<AllergenRes>> {
    Json(
        state
            .service
            .catalog()
            .allergens()
            .iter()
            .map(AllergenRes::from)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/catalog/ingredients",
    params(IngredientsQuery),
    responses(
        (status = 200, description = "Ingredients in catalog order", body = [IngredientRes])
    )
)]
/// Lists ingredients, optionally narrowed to common ones, one category and/or one allergen.
#[axum::debug_handler]
async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientsQuery>,
) -> Json<Vec<IngredientRes>> {
    let filter = IngredientFilter::default()
        .common_only(query.common.unwrap_or(false))
        .category(query.category)
        .allergen(query.allergen);
    Json(
        state
            .service
            .catalog()
            .select(&filter)
            .into_iter()
            .map(IngredientRes::from)
            .collect(),
    )
}

#[utoipa::path(
    post,
    path = "/aggregate",
    request_body = AggregateReq,
    responses(
        (status = 200, description = "Allergens present in the ingredient list", body = AggregationRes),
        (status = 400, description = "Unknown ingredient code", body = ErrorRes)
    )
)]
/// Aggregates allergens for an ingredient list without committing anything.
#[axum::debug_handler]
async fn aggregate_dish(
    State(state): State<AppState>,
    Json(req): Json<AggregateReq>,
) -> ApiResult<Json<AggregationRes>> {
    let result = state
        .service
        .aggregate(&req.ingredient_codes)
        .map_err(dish_rejection)?;
    Ok(Json(AggregationRes::from(&result)))
}

#[utoipa::path(
    get,
    path = "/draft",
    responses(
        (status = 200, description = "Active draft and its allergens", body = DraftRes)
    )
)]
#[axum::debug_handler]
async fn get_draft(State(state): State<AppState>) -> ApiResult<Json<DraftRes>> {
    let view = state.service.draft().map_err(dish_rejection)?;
    Ok(Json(DraftRes::from(&view)))
}

#[utoipa::path(
    put,
    path = "/draft",
    request_body = UpdateDraftReq,
    responses(
        (status = 200, description = "Draft updated", body = DraftRes)
    )
)]
/// Sets the draft name and/or chef. Omitted fields keep their value.
#[axum::debug_handler]
async fn update_draft(
    State(state): State<AppState>,
    Json(req): Json<UpdateDraftReq>,
) -> ApiResult<Json<DraftRes>> {
    let view = state
        .service
        .update_draft(req.name, req.chef)
        .map_err(dish_rejection)?;
    Ok(Json(DraftRes::from(&view)))
}

#[utoipa::path(
    delete,
    path = "/draft",
    responses(
        (status = 204, description = "Draft cleared")
    )
)]
#[axum::debug_handler]
async fn clear_draft(State(state): State<AppState>) -> StatusCode {
    state.service.clear_draft();
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/draft/ingredients",
    request_body = AddIngredientReq,
    responses(
        (status = 200, description = "Ingredient added", body = DraftRes),
        (status = 400, description = "Unknown ingredient code", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn add_draft_ingredient(
    State(state): State<AppState>,
    Json(req): Json<AddIngredientReq>,
) -> ApiResult<Json<DraftRes>> {
    let view = state
        .service
        .add_ingredient(&req.code)
        .map_err(dish_rejection)?;
    Ok(Json(DraftRes::from(&view)))
}

#[utoipa::path(
    delete,
    path = "/draft/ingredients/{code}",
    params(("code" = String, Path, description = "Ingredient code")),
    responses(
        (status = 200, description = "Ingredient removed, or was not present", body = DraftRes)
    )
)]
#[axum::debug_handler]
async fn remove_draft_ingredient(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<DraftRes>> {
    let view = state
        .service
        .remove_ingredient(&code)
        .map_err(dish_rejection)?;
    Ok(Json(DraftRes::from(&view)))
}

#[utoipa::path(
    post,
    path = "/draft/commit",
    responses(
        (status = 201, description = "Draft committed to the ledger", body = CommittedDishRes),
        (status = 422, description = "Draft has no name or no ingredients", body = ErrorRes)
    )
)]
/// Commits the active draft and clears it.
#[axum::debug_handler]
async fn commit_draft(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<CommittedDishRes>)> {
    let dish = state.service.commit_draft().map_err(dish_rejection)?;
    Ok((StatusCode::CREATED, Json(CommittedDishRes::from(&dish))))
}

#[utoipa::path(
    post,
    path = "/dishes",
    request_body = CommitDishReq,
    responses(
        (status = 201, description = "Dish committed to the ledger", body = CommittedDishRes),
        (status = 400, description = "Unknown ingredient code", body = ErrorRes),
        (status = 422, description = "Dish has no name or no ingredients", body = ErrorRes)
    )
)]
/// Commits a complete draft supplied in the request body.
#[axum::debug_handler]
async fn commit_dish(
    State(state): State<AppState>,
    Json(req): Json<CommitDishReq>,
) -> ApiResult<(StatusCode, Json<CommittedDishRes>)> {
    let draft = DishDraft::from(req);
    let dish = state.service.commit(&draft).map_err(dish_rejection)?;
    Ok((StatusCode::CREATED, Json(CommittedDishRes::from(&dish))))
}

#[utoipa::path(
    get,
    path = "/dishes",
    params(ListDishesQuery),
    responses(
        (status = 200, description = "Committed dishes in commit order", body = ListDishesRes),
        (status = 400, description = "Malformed date bound", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn list_dishes(
    State(state): State<AppState>,
    Query(query): Query<ListDishesQuery>,
) -> ApiResult<Json<ListDishesRes>> {
    let filter = filter_from_query(query)?;
    let dishes = state.service.dishes(&filter);
    Ok(Json(ListDishesRes {
        dishes: dishes.iter().map(CommittedDishRes::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/dishes/{id}",
    params(("id" = u64, Path, description = "Ledger id")),
    responses(
        (status = 200, description = "Committed dish", body = CommittedDishRes),
        (status = 400, description = "Id is not a positive integer", body = ErrorRes),
        (status = 404, description = "No dish with that id", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CommittedDishRes>> {
    let id: u64 = id.trim().parse().map_err(|_| {
        tracing::warn!("rejected dish id {:?}", id);
        reject(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("dish id must be a positive integer, got {id:?}"),
        )
    })?;
    match state.service.dish(id) {
        Some(dish) => Ok(Json(CommittedDishRes::from(&dish))),
        None => Err(reject(
            StatusCode::NOT_FOUND,
            "dish_not_found",
            format!("no committed dish with id {id}"),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/dishes/export",
    responses(
        (status = 200, description = "Compliance export of every committed dish", body = LedgerExportRes)
    )
)]
#[axum::debug_handler]
async fn export_dishes(State(state): State<AppState>) -> Json<LedgerExportRes> {
    Json(LedgerExportRes::from(&state.service.export()))
}
