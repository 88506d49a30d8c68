//! SQL Generator Module
//!
//! Converts a natural-language request into a SQL statement plus explanation.
//!
//! # Architecture
//! ```text
//!                ┌─────────────────────┐
//!                │ SqlGeneratorService │
//!                └──────────┬──────────┘
//!                           │
//!          ┌────────────────┴────────────────┐
//!          ▼                                 ▼
//! ┌─────────────────┐  not configured / ┌────────────────────┐
//! │ ModelGenerator  │ ───── failed ───► │ HeuristicGenerator │
//! │ prompt + parser │                   │ intent/table/where │
//! └─────────────────┘                   └────────────────────┘
//! ```

pub mod heuristic;
mod model_generator;
mod models;
mod prompt;
mod response_parser;
mod service;

pub use heuristic::HeuristicGenerator;
pub use model_generator::{ModelGenerator, ModelOutcome, UnavailableReason};
pub use models::*;
pub use prompt::build_prompt;
pub use response_parser::{ParseStrategy, ResponseParseError, parse_model_response};
pub use service::SqlGeneratorService;

#[cfg(test)]
mod tests;
