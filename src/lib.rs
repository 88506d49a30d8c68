//! SQL Generator Library
//!
//! Natural-language to SQL generation with a model-backed path and a
//! deterministic heuristic fallback, plus the HTTP API around it.

use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod utils;

pub use config::Config;
pub use router::build_router;
pub use services::llm::{LLMClient, LLMError};
pub use services::sql_generator::{GenerationRequest, GenerationResult, SqlGeneratorService};

/// Application shared state
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<SqlGeneratorService>,
}

impl AppState {
    pub fn new(generator: SqlGeneratorService) -> Self {
        Self { generator: Arc::new(generator) }
    }
}

#[cfg(test)]
mod tests;
