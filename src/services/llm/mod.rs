//! LLM Module
//!
//! Provides the model invocation capability used by SQL generation.
//!
//! # Architecture
//! ```text
//! ┌─────────────────┐
//! │    LLMClient    │  ← Trait (prompt in, raw text out)
//! └────────┬────────┘
//!          │
//!    ┌─────┴─────┐
//!    ▼           ▼
//! ┌──────┐  ┌──────────┐
//! │Gemini│  │  OpenAI  │
//! │Client│  │Compatible│
//! └──────┘  └──────────┘
//! ```

mod client;
mod models;

pub use client::{GeminiClient, LLMClient, OpenAIClient, build_client};
pub use models::*;
