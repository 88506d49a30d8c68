//! SQL generation data model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::StringExt;

pub const UNPARSED_SQL: &str = "-- Unable to parse SQL from response";
pub const UNPARSED_EXPLANATION: &str = "Unable to parse explanation from response.";
pub const DEFAULT_EXPLANATION: &str = "No explanation provided.";

// ============================================================================
// Dialect
// ============================================================================

/// Target SQL dialect.
///
/// Unrecognized names are carried through unchanged; the dialect only ever
/// reaches the model prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    PostgreSql,
    MySql,
    Sqlite,
    MsSql,
    Oracle,
    Other(String),
}

static KNOWN_DIALECTS: [Dialect; 5] =
    [Dialect::PostgreSql, Dialect::MySql, Dialect::Sqlite, Dialect::MsSql, Dialect::Oracle];

impl Dialect {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "postgresql" => Self::PostgreSql,
            "mysql" => Self::MySql,
            "sqlite" => Self::Sqlite,
            "mssql" => Self::MsSql,
            "oracle" => Self::Oracle,
            _ => Self::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::MsSql => "mssql",
            Self::Oracle => "oracle",
            Self::Other(name) => name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::PostgreSql => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
            Self::MsSql => "Microsoft SQL Server",
            Self::Oracle => "Oracle",
            Self::Other(name) => name,
        }
    }

    /// The dialects offered to clients, in display order
    pub fn supported() -> &'static [Dialect] {
        &KNOWN_DIALECTS
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request / Result
// ============================================================================

/// One generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub query: String,
    pub dialect: Dialect,
    /// Optional DDL context for the model prompt
    pub schema: Option<String>,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>, dialect: &str) -> Self {
        Self { query: query.into(), dialect: Dialect::from_name(dialect), schema: None }
    }

    pub fn with_schema(mut self, schema: Option<&str>) -> Self {
        self.schema = schema.clean();
        self
    }
}

/// Generated SQL and its explanation; both fields are always non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub sql: String,
    pub explanation: String,
}

impl GenerationResult {
    pub fn new(sql: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self { sql: sql.into(), explanation: explanation.into() }
    }

    /// Sentinel pair for a model reply nothing could be extracted from
    pub fn unparsed() -> Self {
        Self::new(UNPARSED_SQL, UNPARSED_EXPLANATION)
    }
}
