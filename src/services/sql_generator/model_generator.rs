//! Model-backed SQL generation

use std::fmt;
use std::sync::Arc;

use super::models::{GenerationRequest, GenerationResult};
use super::prompt::build_prompt;
use super::response_parser::parse_model_response;
use crate::services::llm::{LLMClient, LLMError};

/// Longest prefix of prompt/response text written to debug logs
const TRACE_PREVIEW_CHARS: usize = 200;

/// Why the model path produced nothing
#[derive(Debug)]
pub enum UnavailableReason {
    /// No client was configured (no credential)
    NotConfigured,
    /// The client was called and failed
    InvocationFailed(LLMError),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("model not configured"),
            Self::InvocationFailed(e) => write!(f, "model invocation failed: {}", e),
        }
    }
}

/// Outcome of one model attempt
#[derive(Debug)]
pub enum ModelOutcome {
    Success(GenerationResult),
    /// The model replied but nothing could be parsed; carries the sentinel pair
    ParseFailed(GenerationResult),
    /// The caller must fall back to the heuristic generator
    Unavailable(UnavailableReason),
}

/// Generates SQL through an injected model client.
///
/// A single attempt is made per request; there is no retry.
#[derive(Clone, Default)]
pub struct ModelGenerator {
    client: Option<Arc<dyn LLMClient>>,
}

impl ModelGenerator {
    pub fn new(client: Option<Arc<dyn LLMClient>>) -> Self {
        Self { client }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&Arc<dyn LLMClient>> {
        self.client.as_ref()
    }

    pub async fn generate(&self, request: &GenerationRequest) -> ModelOutcome {
        let Some(client) = &self.client else {
            return ModelOutcome::Unavailable(UnavailableReason::NotConfigured);
        };

        let prompt = build_prompt(request);
        tracing::debug!("Generated prompt: {}...", preview(&prompt));

        let raw = match client.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => return ModelOutcome::Unavailable(UnavailableReason::InvocationFailed(e)),
        };
        tracing::debug!("Model response: {}...", preview(&raw));

        match parse_model_response(&raw) {
            Ok((result, strategy)) => {
                tracing::debug!("Parsed model response via {}", strategy.as_str());
                ModelOutcome::Success(result)
            },
            Err(e) => {
                tracing::warn!("Failed to parse model response: {}", e);
                ModelOutcome::ParseFailed(GenerationResult::unparsed())
            },
        }
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(TRACE_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
