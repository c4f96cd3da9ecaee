use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use recipes_server::api::recipes::responses::{
    MessageResponse, RecipeResponse, RecipesResponse, ValidationFailureResponse,
};
use recipes_server::api::ErrorResponse;
use recipes_server::store::MemoryRecipeStore;
use recipes_server::telemetry::{StoreSpanCounter, QUERY_COUNT_HEADER};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    recipes_server::app(Arc::new(MemoryRecipeStore::new()), false)
}

fn tomato_soup() -> Value {
    json!({
        "title": "Tomato Soup",
        "making_time": "15 min",
        "serves": "5 people",
        "ingredients": "onion, tomato, seasoning, water",
        "cost": 450
    })
}

fn curry() -> Value {
    json!({
        "title": "Chicken Curry",
        "making_time": "45 min",
        "serves": "4 people",
        "ingredients": "onion, chicken, seasoning",
        "cost": 1000
    })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn create(app: &Router, payload: &Value) -> RecipeResponse {
    let (status, body) = send(app, json_request("POST", "/recipes", payload)).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

// --- smoke ---

#[tokio::test]
async fn admin_test_reports_working() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/recipes/admin/test")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Recipes API is working!"}));
}

#[tokio::test]
async fn root_is_not_found() {
    let app = test_app();
    let (status, _) = send(&app, empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_recipe_wraps_record_in_list() {
    let app = test_app();
    let (status, body) = send(&app, json_request("POST", "/recipes", &tomato_soup())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe successfully created!");
    let recipes = body["recipe"].as_array().unwrap();
    assert_eq!(recipes.len(), 1);

    let recipe = &recipes[0];
    assert_eq!(recipe["id"], 1);
    assert_eq!(recipe["title"], "Tomato Soup");
    assert_eq!(recipe["making_time"], "15 min");
    assert_eq!(recipe["serves"], "5 people");
    assert_eq!(recipe["ingredients"], "onion, tomato, seasoning, water");
    assert_eq!(recipe["cost"], 450);
    assert!(recipe["created_at"].is_string());
    assert_eq!(recipe["created_at"], recipe["updated_at"]);
}

#[tokio::test]
async fn create_with_empty_object_lists_every_field() {
    let app = test_app();
    let (status, body) = send(&app, json_request("POST", "/recipes", &json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Recipe creation failed!",
            "required": "title, making_time, serves, ingredients, cost"
        })
    );
}

#[tokio::test]
async fn create_with_negative_cost_reports_cost() {
    let app = test_app();
    let mut payload = tomato_soup();
    payload["cost"] = json!(-5);

    let (status, body) = send(&app, json_request("POST", "/recipes", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    let failure: ValidationFailureResponse = serde_json::from_value(body).unwrap();
    assert_eq!(failure.message, "Recipe creation failed!");
    assert_eq!(failure.required, "cost");
}

#[tokio::test]
async fn create_reports_missing_before_invalid() {
    let app = test_app();
    let payload = json!({"title": "Soup", "serves": "2", "cost": "free"});

    let (_, body) = send(&app, json_request("POST", "/recipes", &payload)).await;

    assert_eq!(body["required"], "making_time, ingredients");
}

#[tokio::test]
async fn create_without_json_body_fails_every_field() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("POST", "/recipes")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["required"],
        "title, making_time, serves, ingredients, cost"
    );
}

#[tokio::test]
async fn create_accepts_whitespace_only_text() {
    let app = test_app();
    let mut payload = tomato_soup();
    payload["title"] = json!("  ");

    let response = create(&app, &payload).await;

    assert_eq!(response.message, "Recipe successfully created!");
    assert_eq!(response.recipe[0].title, "  ");
}

#[tokio::test]
async fn rejected_create_stores_nothing() {
    let app = test_app();
    send(&app, json_request("POST", "/recipes", &json!({"title": "x"}))).await;

    let (_, body) = send(&app, empty_request("GET", "/recipes")).await;
    assert_eq!(body, json!({"recipes": []}));
}

// --- list ---

#[tokio::test]
async fn list_returns_every_recipe_in_creation_order() {
    let app = test_app();
    let first = create(&app, &tomato_soup()).await.recipe.remove(0);
    let second = create(&app, &curry()).await.recipe.remove(0);

    let (status, body) = send(&app, empty_request("GET", "/recipes")).await;

    assert_eq!(status, StatusCode::OK);
    let list: RecipesResponse = serde_json::from_value(body).unwrap();
    assert_eq!(list.recipes, vec![first, second]);
}

// --- get ---

#[tokio::test]
async fn get_recipe_by_id() {
    let app = test_app();
    create(&app, &tomato_soup()).await;
    let created = create(&app, &curry()).await.recipe.remove(0);

    let (status, body) = send(&app, empty_request("GET", "/recipes/2")).await;

    assert_eq!(status, StatusCode::OK);
    let response: RecipeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.message, "Recipe details by id");
    assert_eq!(response.recipe, vec![created]);
}

#[tokio::test]
async fn get_recipe_not_found() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/recipes/999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.error, "No recipe found");
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = test_app();
    create(&app, &tomato_soup()).await;

    let requests = [
        empty_request("GET", "/recipes/abc"),
        json_request("PATCH", "/recipes/abc", &json!({"title": "x"})),
        empty_request("DELETE", "/recipes/1.5"),
    ];
    for request in requests {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid recipe id"));
    }
}

// --- update ---

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = test_app();
    let original = create(&app, &tomato_soup()).await.recipe.remove(0);

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/recipes/1",
            &json!({"title": "Updated Recipe", "cost": 600}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: RecipeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.message, "Recipe successfully updated!");
    assert_eq!(response.recipe.len(), 1);

    let updated = &response.recipe[0];
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, "Updated Recipe");
    assert_eq!(updated.cost, 600);
    assert_eq!(updated.making_time, original.making_time);
    assert_eq!(updated.serves, original.serves);
    assert_eq!(updated.ingredients, original.ingredients);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);

    let (_, body) = send(&app, empty_request("GET", "/recipes/1")).await;
    let fetched: RecipeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(&fetched.recipe[0], updated);
}

#[tokio::test]
async fn update_with_invalid_field_is_rejected_with_ok_status() {
    let app = test_app();
    let original = create(&app, &tomato_soup()).await.recipe.remove(0);

    let (status, body) = send(
        &app,
        json_request("PATCH", "/recipes/1", &json!({"serves": "", "cost": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe creation failed!");
    assert_eq!(body["required"], "serves");

    let (_, body) = send(&app, empty_request("GET", "/recipes/1")).await;
    let fetched: RecipeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(fetched.recipe[0], original);
}

#[tokio::test]
async fn update_without_body_changes_nothing() {
    let app = test_app();
    let original = create(&app, &tomato_soup()).await.recipe.remove(0);

    let (status, body) = send(&app, empty_request("PATCH", "/recipes/1")).await;

    assert_eq!(status, StatusCode::OK);
    let response: RecipeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.message, "Recipe successfully updated!");

    let updated = &response.recipe[0];
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.making_time, original.making_time);
    assert_eq!(updated.serves, original.serves);
    assert_eq!(updated.ingredients, original.ingredients);
    assert_eq!(updated.cost, original.cost);
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn update_not_found() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request("PATCH", "/recipes/999", &json!({"title": "Nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = test_app();
    create(&app, &tomato_soup()).await;

    let (status, body) = send(&app, empty_request("DELETE", "/recipes/1")).await;
    assert_eq!(status, StatusCode::OK);
    let response: MessageResponse = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(response.message, "Recipe successfully removed!");
    assert_eq!(body, json!({"message": "Recipe successfully removed!"}));

    let (status, _) = send(&app, empty_request("GET", "/recipes/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeated_delete_is_always_not_found() {
    let app = test_app();
    create(&app, &tomato_soup()).await;
    send(&app, empty_request("DELETE", "/recipes/1")).await;

    for _ in 0..3 {
        let (status, _) = send(&app, empty_request("DELETE", "/recipes/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn delete_not_found() {
    let app = test_app();
    let (status, _) = send(&app, empty_request("DELETE", "/recipes/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- docs & telemetry ---

#[tokio::test]
async fn openapi_document_lists_recipe_routes() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/recipes"));
    assert!(paths.contains_key("/recipes/{id}"));
    assert!(paths.contains_key("/recipes/admin/test"));
    assert!(paths["/recipes/{id}"].get("patch").is_some());

    let schemas = body["components"]["schemas"].as_object().unwrap();
    assert!(schemas.contains_key("CreateRecipeRequest"));
    assert!(schemas.contains_key("UpdateRecipeRequest"));
}

#[tokio::test]
async fn query_count_header_reports_store_calls() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _guard = tracing_subscriber::registry()
        .with(StoreSpanCounter)
        .set_default();

    let app = recipes_server::app(Arc::new(MemoryRecipeStore::new()), true);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/recipes", &tomato_soup()))
        .await
        .unwrap();
    assert_eq!(response.headers()[QUERY_COUNT_HEADER], "1");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/recipes/admin/test"))
        .await
        .unwrap();
    assert_eq!(response.headers()[QUERY_COUNT_HEADER], "0");
}

#[tokio::test]
async fn query_count_header_is_off_by_default() {
    let app = test_app();
    let response = app
        .oneshot(empty_request("GET", "/recipes"))
        .await
        .unwrap();
    assert!(response.headers().get(QUERY_COUNT_HEADER).is_none());
}
