use axum::Json;

use crate::models::{DatabaseInfo, DatabasesResponse, HealthResponse, RootResponse};
use crate::services::sql_generator::Dialect;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootResponse)),
    tag = "System"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: "SQL Generator API is running!".to_string() })
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Liveness check", body = HealthResponse)),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "sql-generator-api".to_string(),
    })
}

/// List the SQL dialects offered to clients
#[utoipa::path(
    get,
    path = "/databases",
    responses((status = 200, description = "Supported database types", body = DatabasesResponse)),
    tag = "System"
)]
pub async fn list_databases() -> Json<DatabasesResponse> {
    let databases = Dialect::supported().iter().map(DatabaseInfo::from).collect();
    Json(DatabasesResponse { databases })
}
