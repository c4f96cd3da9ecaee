use crate::api::error::{parse_id, ApiError};
use crate::api::recipes::responses::{MessageResponse, DELETED};
use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 400, description = "Malformed recipe ID", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    // Hard delete; the id is gone for good
    let removed = store.remove(id)?;
    tracing::info!(recipe_id = removed.id, title = %removed.title, "recipe removed");

    Ok(Json(MessageResponse::new(DELETED)))
}
