use crate::api::recipes::responses::{MessageResponse, API_WORKING};
use axum::Json;

pub const PATH: &str = "/recipes/admin/test";

#[utoipa::path(
    get,
    path = "/recipes/admin/test",
    tag = "recipes",
    responses(
        (status = 200, description = "Smoke-test response", body = MessageResponse)
    )
)]
pub async fn admin_test() -> Json<MessageResponse> {
    Json(MessageResponse::new(API_WORKING))
}
