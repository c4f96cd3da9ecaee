use crate::api::recipes::read_payload;
use crate::api::recipes::responses::{RecipeResponse, CREATED};
use crate::api::{error::ApiError, ErrorResponse};
use crate::validation::{validate_create, Shape};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use utoipa::ToSchema;

/// Documented body for `POST /recipes`.
///
/// The handler reads the body as a raw `serde_json::Value` and hands it to
/// [`validate_create`], so a wrong type in one field is reported next to the
/// missing ones. This type is never deserialized; it only feeds the OpenAPI schema.
#[derive(Debug, Clone, ToSchema)]
pub struct CreateRecipeRequest {
    #[schema(example = "Tomato Soup", max_length = 100)]
    pub title: String,
    #[schema(example = "15 min", max_length = 100)]
    pub making_time: String,
    #[schema(example = "5 people", max_length = 100)]
    pub serves: String,
    #[schema(example = "onion, tomato, seasoning, water", max_length = 300)]
    pub ingredients: String,
    #[schema(example = 450, minimum = 1)]
    pub cost: i32,
}

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 200, description = "Recipe created. A body missing or breaking field \
            constraints is also answered with 200, as a ValidationFailureResponse.", body = RecipeResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(store): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let input = validate_create(&read_payload(payload, Shape::Create))?;

    let recipe = store.create(input)?;
    tracing::info!(recipe_id = recipe.id, "recipe created");

    Ok(Json(RecipeResponse::new(CREATED, recipe)))
}
