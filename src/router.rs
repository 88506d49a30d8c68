//! HTTP router assembly

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::services::llm::LLMStatus;
use crate::{AppState, handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::system::root,
        handlers::system::health_check,
        handlers::system::list_databases,
        handlers::sql::generate_sql,
        handlers::llm::get_status,
    ),
    components(schemas(
        models::SqlRequest,
        models::SqlResponse,
        models::DatabaseInfo,
        models::DatabasesResponse,
        models::HealthResponse,
        models::RootResponse,
        LLMStatus,
    )),
    tags(
        (name = "SQL Generation", description = "Natural language to SQL"),
        (name = "System", description = "Service information"),
        (name = "LLM", description = "Model availability"),
    )
)]
pub struct ApiDoc;

/// Build the application router with tracing and CORS layers applied
pub fn build_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    let api_routes = Router::new()
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health_check))
        .route("/databases", get(handlers::system::list_databases))
        .route("/generate-sql", post(handlers::sql::generate_sql))
        .route("/api/llm/status", get(handlers::llm::get_status))
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_layer(cors))
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.is_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
