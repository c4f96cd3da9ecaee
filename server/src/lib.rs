pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod schema;
pub mod store;
pub mod telemetry;
pub mod validation;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use store::RecipeStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
pub type AppState = Arc<dyn RecipeStore>;

/// Build the full application: recipe routes, Swagger UI, and the HTTP layers.
///
/// With `track_query_count` every response carries an `X-DB-Query-Count` header.
pub fn app(store: AppState, track_query_count: bool) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let mut router: Router = Router::new()
        .nest("/recipes", api::recipes::router())
        .merge(swagger_ui)
        .with_state(store);

    if track_query_count {
        router = router.layer(middleware::from_fn(telemetry::expose_query_count));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    // Smoke checks get polled constantly; keep them out of the logs
                    if matched_path == api::recipes::admin::PATH {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
        // Outermost, so the counter scope covers the whole request
        .layer(middleware::from_fn(telemetry::count_queries))
}
