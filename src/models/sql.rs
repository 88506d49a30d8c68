use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::services::sql_generator::{Dialect, GenerationRequest, GenerationResult};

fn default_database_type() -> String {
    Dialect::default().as_str().to_string()
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("query must not be blank".into()));
    }
    Ok(())
}

// Request body for POST /generate-sql
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct SqlRequest {
    /// Natural-language description of the desired query
    #[validate(custom(function = "validate_not_blank"))]
    pub query: String,
    /// postgresql, mysql, sqlite, mssql or oracle; other values are passed through
    #[serde(default = "default_database_type")]
    pub database_type: String,
    /// Optional DDL used as model context
    #[serde(default)]
    pub schema: Option<String>,
}

impl From<&SqlRequest> for GenerationRequest {
    fn from(req: &SqlRequest) -> Self {
        GenerationRequest::new(req.query.trim(), &req.database_type)
            .with_schema(req.schema.as_deref())
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct SqlResponse {
    pub sql: String,
    pub explanation: String,
}

impl From<GenerationResult> for SqlResponse {
    fn from(result: GenerationResult) -> Self {
        Self { sql: result.sql, explanation: result.explanation }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct DatabaseInfo {
    pub id: String,
    pub name: String,
}

impl From<&Dialect> for DatabaseInfo {
    fn from(dialect: &Dialect) -> Self {
        Self { id: dialect.as_str().to_string(), name: dialect.display_name().to_string() }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct DatabasesResponse {
    pub databases: Vec<DatabaseInfo>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct RootResponse {
    pub message: String,
}
