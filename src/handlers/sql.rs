//! SQL generation endpoint

use axum::{Json, extract::State};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::models::{SqlRequest, SqlResponse};
use crate::services::sql_generator::GenerationRequest;
use crate::utils::ApiResult;

/// Generate SQL from a natural-language query
///
/// Always answers 200 for a non-blank query: when no model is available or the
/// model call fails, the heuristic generator produces the result.
#[utoipa::path(
    post,
    path = "/generate-sql",
    request_body = SqlRequest,
    responses(
        (status = 200, description = "Generated SQL and explanation", body = SqlResponse),
        (status = 400, description = "Blank query")
    ),
    tag = "SQL Generation"
)]
pub async fn generate_sql(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SqlRequest>,
) -> ApiResult<Json<SqlResponse>> {
    req.validate()?;

    let request = GenerationRequest::from(&req);
    let result = state.generator.generate(&request).await;

    Ok(Json(SqlResponse::from(result)))
}
