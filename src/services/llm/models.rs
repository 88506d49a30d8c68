//! LLM Data Models
//!
//! Provider kinds, provider status and the error model shared by all clients.

use serde::{Deserialize, Serialize};

// ============================================================================
// LLM Provider
// ============================================================================

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LLMProviderKind {
    /// Google Gemini `generateContent` API
    #[default]
    Gemini,
    /// Any OpenAI-compatible chat completions API (OpenAI, DeepSeek, Azure, ...)
    #[serde(alias = "openai_compatible")]
    OpenAI,
}

impl LLMProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
        }
    }

    pub fn parse_kind(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" | "openai_compatible" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Model used when the configuration leaves `llm.model` empty
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAI => "gpt-4o-mini",
        }
    }

    /// API base used when the configuration leaves `llm.api_base` empty
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAI => "https://api.openai.com/v1",
        }
    }
}

/// Provider status for external display (without sensitive data)
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LLMStatus {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

// ============================================================================
// LLM Error Types
// ============================================================================

/// LLM client errors
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("LLM response parsing error: {0}")]
    ParseError(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("LLM timeout after {0}s")]
    Timeout(u64),

    #[error("LLM rate limited, retry after {0}s")]
    RateLimited(u64),
}
