pub mod error;
pub mod recipes;

use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::models::Recipe;

/// Shared error response for 400, 404 and 5xx answers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Recipe API",
            description = "The Recipe API provides endpoints for managing recipes"
        ),
        tags((name = "recipes", description = "Recipe CRUD")),
        components(schemas(ErrorResponse, Recipe))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();
    spec.merge(recipes::ApiDoc::openapi());
    spec
}
