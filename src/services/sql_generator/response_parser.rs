//! Model response parsing
//!
//! Models do not reliably honour "return ONLY JSON", so the reply is read with a
//! layered strategy: a bare JSON object, then the first flat JSON object that
//! carries both keys, then `SQL:` / `EXPLANATION:` prefixed lines.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::models::{DEFAULT_EXPLANATION, GenerationResult, UNPARSED_EXPLANATION, UNPARSED_SQL};

/// Flat (non-nested) object mentioning "sql" before "explanation"
static EMBEDDED_JSON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{[^{}]*"sql"[^{}]*"explanation"[^{}]*\}"#).unwrap());

const SQL_PREFIX: &str = "SQL:";
const EXPLANATION_PREFIX: &str = "EXPLANATION:";

/// Which layer produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    BareJson,
    EmbeddedJson,
    LinePrefixed,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BareJson => "bare_json",
            Self::EmbeddedJson => "embedded_json",
            Self::LinePrefixed => "line_prefixed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("invalid JSON in model response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model JSON has no usable \"sql\" value")]
    MissingSql,

    #[error("no JSON object or SQL:/EXPLANATION: line found in model response")]
    Unrecognized,
}

/// Parse a raw model reply into a generation result.
///
/// A JSON layer that matches but fails to decode ends the attempt; the later
/// layers are not tried.
pub fn parse_model_response(
    raw: &str,
) -> Result<(GenerationResult, ParseStrategy), ResponseParseError> {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return parse_json_object(trimmed).map(|r| (r, ParseStrategy::BareJson));
    }

    if let Some(m) = EMBEDDED_JSON_REGEX.find(raw) {
        return parse_json_object(m.as_str()).map(|r| (r, ParseStrategy::EmbeddedJson));
    }

    parse_prefixed_lines(trimmed).map(|r| (r, ParseStrategy::LinePrefixed))
}

fn parse_json_object(text: &str) -> Result<GenerationResult, ResponseParseError> {
    let Value::Object(object) = serde_json::from_str::<Value>(text)? else {
        return Err(ResponseParseError::MissingSql);
    };

    let sql = string_field(&object, "sql").ok_or(ResponseParseError::MissingSql)?;
    let explanation =
        string_field(&object, "explanation").unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    Ok(GenerationResult { sql, explanation })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_prefixed_lines(text: &str) -> Result<GenerationResult, ResponseParseError> {
    let mut sql = None;
    let mut explanation = None;

    // Later lines overwrite earlier ones
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(SQL_PREFIX) {
            sql = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(EXPLANATION_PREFIX) {
            explanation = Some(rest.trim().to_string());
        }
    }

    let sql = sql.filter(|s| !s.is_empty());
    let explanation = explanation.filter(|e| !e.is_empty());
    if sql.is_none() && explanation.is_none() {
        return Err(ResponseParseError::Unrecognized);
    }

    // Either half may be missing; it gets its own placeholder
    Ok(GenerationResult {
        sql: sql.unwrap_or_else(|| UNPARSED_SQL.to_string()),
        explanation: explanation.unwrap_or_else(|| UNPARSED_EXPLANATION.to_string()),
    })
}
