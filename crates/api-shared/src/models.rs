//! JSON request and response bodies.
//!
//! Field names are camelCase to match the catalog files and the browser client.

use dishcheck_core::{
    AggregationResult, Allergen, CommittedDish, DishDraft, DraftView, Ingredient, LedgerExport,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRes {
    /// Machine-readable error kind, e.g. `unknown_ingredient`.
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllergenRes {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Allergen> for AllergenRes {
    fn from(allergen: &Allergen) -> Self {
        Self {
            code: allergen.code.to_string(),
            name: allergen.name.to_string(),
            description: allergen.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRes {
    pub code: String,
    pub name: String,
    pub category: String,
    pub allergen_codes: Vec<String>,
    pub is_common: bool,
}

impl From<&Ingredient> for IngredientRes {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            code: ingredient.code.to_string(),
            name: ingredient.name.to_string(),
            category: ingredient.category.clone(),
            allergen_codes: ingredient
                .allergen_codes
                .iter()
                .map(ToString::to_string)
                .collect(),
            is_common: ingredient.is_common,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRes {
    pub allergens: Vec<AllergenRes>,
    pub ingredients: Vec<IngredientRes>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientsQuery {
    /// Only ingredients flagged as commonly used
    pub common: Option<bool>,
    /// Exact category name
    pub category: Option<String>,
    /// Only ingredients containing this allergen code
    pub allergen: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReq {
    pub ingredient_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRes {
    pub allergens: Vec<AllergenRes>,
    pub per_ingredient: BTreeMap<String, Vec<String>>,
}

impl From<&AggregationResult> for AggregationRes {
    fn from(result: &AggregationResult) -> Self {
        Self {
            allergens: result.allergens.iter().map(AllergenRes::from).collect(),
            per_ingredient: result
                .per_ingredient
                .iter()
                .map(|(ingredient, allergens)| {
                    (
                        ingredient.to_string(),
                        allergens.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftRes {
    pub name: String,
    pub chef: String,
    pub ingredient_codes: Vec<String>,
    pub aggregation: AggregationRes,
}

impl From<&DraftView> for DraftRes {
    fn from(view: &DraftView) -> Self {
        Self {
            name: view.draft.name.clone(),
            chef: view.draft.chef.clone(),
            ingredient_codes: view.draft.ingredient_codes.clone(),
            aggregation: AggregationRes::from(&view.aggregation),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftReq {
    pub name: Option<String>,
    pub chef: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddIngredientReq {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitDishReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chef: String,
    #[serde(default)]
    pub ingredient_codes: Vec<String>,
}

impl From<CommitDishReq> for DishDraft {
    fn from(req: CommitDishReq) -> Self {
        DishDraft::new(req.name, req.chef).with_ingredients(req.ingredient_codes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommittedDishRes {
    pub id: u64,
    pub name: String,
    pub chef: String,
    pub ingredient_codes: Vec<String>,
    pub allergens: Vec<String>,
    /// RFC 3339 commit time (UTC)
    pub timestamp: String,
}

impl From<&CommittedDish> for CommittedDishRes {
    fn from(dish: &CommittedDish) -> Self {
        Self {
            id: dish.id,
            name: dish.name.to_string(),
            chef: dish.chef.clone(),
            ingredient_codes: dish.ingredient_codes.clone(),
            allergens: dish.allergens.iter().map(ToString::to_string).collect(),
            timestamp: dish.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDishesQuery {
    /// Chef name, case-insensitive exact match
    pub chef: Option<String>,
    /// Substring of the dish name, case-insensitive
    pub name: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD` or RFC 3339
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD` or RFC 3339
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListDishesRes {
    pub dishes: Vec<CommittedDishRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerExportRes {
    pub exported_at: String,
    pub dish_count: usize,
    pub dishes: Vec<CommittedDishRes>,
}

impl From<&LedgerExport> for LedgerExportRes {
    fn from(export: &LedgerExport) -> Self {
        Self {
            exported_at: export.exported_at.to_rfc3339(),
            dish_count: export.dish_count,
            dishes: export.dishes.iter().map(CommittedDishRes::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishcheck_core::{aggregate, Catalog};

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[{"code":"gluten","name":"Gluten"},{"code":"milk","name":"Milk","description":"Including lactose"}]"#,
            r#"[{"code":"bread","name":"Bread","category":"Cereals","allergenCodes":["gluten"],"isCommon":true},
                {"code":"butter","name":"Butter","category":"Dairy","allergenCodes":["milk"]}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_aggregation_res_uses_camel_case() {
        let catalog = catalog();
        let result = aggregate(&["butter", "bread"], &catalog).unwrap();
        let json = serde_json::to_value(AggregationRes::from(&result)).unwrap();

        assert_eq!(json["allergens"][0]["code"], "gluten");
        assert!(json["allergens"][0].get("description").is_none());
        assert_eq!(json["allergens"][1]["description"], "Including lactose");
        assert_eq!(json["perIngredient"]["butter"][0], "milk");
    }

    #[test]
    fn test_ingredient_res_round_trips_catalog_fields() {
        let catalog = catalog();
        let res = IngredientRes::from(catalog.ingredient("bread").unwrap());
        let json = serde_json::to_value(&res).unwrap();

        assert_eq!(json["allergenCodes"][0], "gluten");
        assert_eq!(json["isCommon"], true);
    }

    #[test]
    fn test_commit_req_defaults_missing_fields() {
        let req: CommitDishReq = serde_json::from_str(r#"{"name":"Toast"}"#).unwrap();
        let draft = DishDraft::from(req);
        assert_eq!(draft.name, "Toast");
        assert!(draft.chef.is_empty());
        assert!(draft.ingredient_codes.is_empty());
    }
}
