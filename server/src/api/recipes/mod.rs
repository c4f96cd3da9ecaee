pub mod admin;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod responses;
pub mod update;

use crate::validation::Shape;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};
use utoipa::OpenApi;

/// Returns the router for /recipes endpoints (mounted at /recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/admin/test", get(admin::admin_test))
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

/// Body to validate when the request carries no readable JSON.
///
/// A create without a body fails every field (`null`); an update without one
/// changes nothing (`{}`).
pub(crate) fn read_payload(payload: Result<Json<Value>, JsonRejection>, shape: Shape) -> Value {
    match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(%rejection, ?shape, "unreadable recipe payload");
            match shape {
                Shape::Create => Value::Null,
                Shape::Update => Value::Object(Map::new()),
            }
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        admin::admin_test,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        update::UpdateRecipeRequest,
        responses::RecipeResponse,
        responses::RecipesResponse,
        responses::MessageResponse,
        responses::ValidationFailureResponse,
    ))
)]
pub struct ApiDoc;
