//! SQL generation entry point
//!
//! Tries the model first and falls back to the heuristic generator when the
//! model is not configured or its call fails. A model that replied but could
//! not be parsed yields the sentinel pair instead of the heuristic result.

use std::sync::Arc;

use super::heuristic::HeuristicGenerator;
use super::model_generator::{ModelGenerator, ModelOutcome};
use super::models::{GenerationRequest, GenerationResult};
use crate::services::llm::{LLMClient, LLMStatus};

#[derive(Clone, Default)]
pub struct SqlGeneratorService {
    model: ModelGenerator,
    heuristic: HeuristicGenerator,
}

impl SqlGeneratorService {
    pub fn new(client: Option<Arc<dyn LLMClient>>) -> Self {
        Self { model: ModelGenerator::new(client), heuristic: HeuristicGenerator::new() }
    }

    pub fn is_model_available(&self) -> bool {
        self.model.is_available()
    }

    pub fn status(&self) -> LLMStatus {
        match self.model.client() {
            Some(client) => LLMStatus {
                enabled: true,
                provider: Some(client.provider().as_str().to_string()),
                model: Some(client.model().to_string()),
            },
            None => LLMStatus::default(),
        }
    }

    /// Generate SQL for a request. Never fails.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        tracing::info!(
            "Generating SQL for query '{}' (dialect: {}, model available: {})",
            request.query,
            request.dialect,
            self.is_model_available()
        );

        match self.model.generate(request).await {
            ModelOutcome::Success(result) | ModelOutcome::ParseFailed(result) => result,
            ModelOutcome::Unavailable(reason) => {
                if self.is_model_available() {
                    tracing::warn!("Falling back to heuristic generation: {}", reason);
                } else {
                    tracing::debug!("Using heuristic generation: {}", reason);
                }
                self.heuristic.generate(request)
            },
        }
    }
}
