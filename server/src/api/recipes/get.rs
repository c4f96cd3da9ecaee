use crate::api::error::{parse_id, ApiError};
use crate::api::recipes::responses::{RecipeResponse, DETAILS};
use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 400, description = "Malformed recipe ID", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let id = parse_id(&id)?;
    let recipe = store.find_by_id(id)?;
    Ok(Json(RecipeResponse::new(DETAILS, recipe)))
}
