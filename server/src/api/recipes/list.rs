use crate::api::recipes::responses::RecipesResponse;
use crate::api::{error::ApiError, ErrorResponse};
use crate::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipes in creation order", body = RecipesResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(State(store): State<AppState>) -> Result<Json<RecipesResponse>, ApiError> {
    let recipes = store.list_all()?;
    Ok(Json(RecipesResponse { recipes }))
}
