//! LLM status API

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::AppState;
use crate::services::llm::LLMStatus;

/// Get LLM status
/// GET /api/llm/status
#[utoipa::path(
    get,
    path = "/api/llm/status",
    responses((status = 200, description = "Model availability", body = LLMStatus)),
    tag = "LLM"
)]
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<LLMStatus> {
    Json(state.generator.status())
}
