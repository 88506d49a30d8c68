// Common test utilities and helpers

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::CorsConfig;
use crate::services::llm::{LLMClient, LLMError, LLMProviderKind};
use crate::services::sql_generator::SqlGeneratorService;
use crate::{AppState, build_router};

/// Model client that always answers with the same text
pub struct FixedReplyClient(pub &'static str);

#[async_trait]
impl LLMClient for FixedReplyClient {
    fn provider(&self) -> LLMProviderKind {
        LLMProviderKind::OpenAI
    }

    fn model(&self) -> &str {
        "fixed-reply"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, LLMError> {
        Ok(self.0.to_string())
    }
}

/// Model client whose calls always time out
pub struct TimeoutClient;

#[async_trait]
impl LLMClient for TimeoutClient {
    fn provider(&self) -> LLMProviderKind {
        LLMProviderKind::Gemini
    }

    fn model(&self) -> &str {
        "gemini-1.5-flash"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, LLMError> {
        Err(LLMError::Timeout(60))
    }
}

/// Create a router backed by the given model client (or none)
pub fn create_test_app(client: Option<Arc<dyn LLMClient>>) -> Router {
    let state = Arc::new(AppState::new(SqlGeneratorService::new(client)));
    build_router(state, &CorsConfig::default())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
