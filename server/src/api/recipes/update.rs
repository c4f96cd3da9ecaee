use crate::api::error::{parse_id, ApiError};
use crate::api::recipes::read_payload;
use crate::api::recipes::responses::{RecipeResponse, UPDATED};
use crate::api::ErrorResponse;
use crate::validation::{validate_update, Shape};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use utoipa::ToSchema;

/// Documented body for `PATCH /recipes/{id}`. Absent fields keep their stored value.
///
/// Like the create body, the payload is validated from raw JSON by
/// [`validate_update`]; this type only describes the schema.
#[derive(Debug, Clone, ToSchema)]
pub struct UpdateRecipeRequest {
    #[schema(example = "Updated Recipe", max_length = 100)]
    pub title: Option<String>,
    #[schema(max_length = 100)]
    pub making_time: Option<String>,
    #[schema(max_length = 100)]
    pub serves: Option<String>,
    #[schema(max_length = 300)]
    pub ingredients: Option<String>,
    #[schema(example = 600, minimum = 1)]
    pub cost: Option<i32>,
}

#[utoipa::path(
    patch,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated. Invalid fields are also answered with \
            200, as a ValidationFailureResponse.", body = RecipeResponse),
        (status = 400, description = "Malformed recipe ID", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(store): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let id = parse_id(&id)?;
    let patch = validate_update(&read_payload(payload, Shape::Update))?;

    let recipe = store.update(id, patch)?;
    tracing::info!(recipe_id = recipe.id, "recipe updated");

    Ok(Json(RecipeResponse::new(UPDATED, recipe)))
}
