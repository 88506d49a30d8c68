//! Deterministic keyword/regex SQL generator
//!
//! Used whenever no model client is available or the model call fails.
//!
//! ```text
//! query ─► classify_intent ─► table (schema DDL, then query words) ─► extract_where_conditions ─► render
//! ```
//!
//! Every step degrades to a default instead of failing, so `generate` is total.
//! The dialect is not consulted; the schema only supplies the table name.

mod conditions;
mod intent;
mod table;

pub use conditions::{
    ConditionFragment, ConditionRule, extract_conditions, extract_where_conditions, get_all_rules,
};
pub use intent::{Intent, classify_intent};
pub use table::{FALLBACK_TABLE, extract_table_name, table_from_schema};

use super::models::{GenerationRequest, GenerationResult};

/// Aggregate sub-shapes, first keyword hit wins
const AGGREGATE_RULES: &[(&[&str], &str)] = &[
    (&["sum"], "SELECT SUM(amount) FROM {table} GROUP BY category;"),
    (&["average", "avg"], "SELECT AVG(value) FROM {table} GROUP BY category;"),
    (&["max"], "SELECT MAX(value) FROM {table};"),
    (&["min"], "SELECT MIN(value) FROM {table};"),
];

const AGGREGATE_FALLBACK: &str = "SELECT category, COUNT(*) FROM {table} GROUP BY category;";

const JOIN_SQL: &str = "SELECT t1.*, t2.* FROM table1 t1 JOIN table2 t2 ON t1.id = t2.table1_id;";

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicGenerator;

impl HeuristicGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Render SQL for a query. Pure: the same request always yields the same result.
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let query_lower = request.query.to_lowercase();
        let intent = classify_intent(&query_lower);
        let table = request
            .schema
            .as_deref()
            .and_then(table_from_schema)
            .unwrap_or_else(|| extract_table_name(&query_lower));

        tracing::debug!(
            "Heuristic generation for '{}' (intent: {}, table: {})",
            query_lower,
            intent.as_str(),
            table
        );

        match intent {
            Intent::Read => render_read(&query_lower, &table),
            Intent::Default => {
                let mut result = render_read(&query_lower, &table);
                result.explanation.push_str(&format!(
                    " Based on your query '{}', please provide more specific details about what you want to retrieve, insert, update, or delete.",
                    request.query
                ));
                result
            },
            Intent::Insert => {
                GenerationResult::new(
                    format!("INSERT INTO {} (column1, column2) VALUES ('value1', 'value2');", table),
                    format!(
                        "This query inserts a new record into the {} table. Replace column names and values as needed.",
                        table
                    ),
                )
            },
            Intent::Update => {
                GenerationResult::new(
                    format!("UPDATE {} SET column_name = 'new_value' WHERE id = 1;", table),
                    format!(
                        "This query updates records in the {} table. Specify the columns to update and the conditions.",
                        table
                    ),
                )
            },
            Intent::Delete => {
                GenerationResult::new(
                    format!("DELETE FROM {} WHERE condition = 'value';", table),
                    format!(
                        "This query deletes records from the {} table based on a condition. Be careful with DELETE operations.",
                        table
                    ),
                )
            },
            Intent::Join => GenerationResult::new(
                JOIN_SQL,
                "This query joins two tables together. Replace table names and join conditions as needed.",
            ),
            Intent::Aggregate => {
                let template = AGGREGATE_RULES
                    .iter()
                    .find(|(keywords, _)| keywords.iter().any(|k| query_lower.contains(k)))
                    .map_or(AGGREGATE_FALLBACK, |(_, template)| *template);
                GenerationResult::new(
                    template.replace("{table}", &table),
                    format!(
                        "This query performs aggregation on the {} table. Adjust column names and grouping as needed.",
                        table
                    ),
                )
            },
        }
    }
}

fn render_read(query_lower: &str, table: &str) -> GenerationResult {
    let where_clause = extract_where_conditions(query_lower);

    tracing::debug!("Extracted where clause '{}'", where_clause);

    let counting = query_lower.contains("count") || query_lower.contains("how many");

    if counting && !where_clause.is_empty() {
        GenerationResult::new(
            format!("SELECT COUNT(*) FROM {} WHERE {};", table, where_clause),
            format!(
                "This query counts the number of records in the {} table that match the condition: {}.",
                table, where_clause
            ),
        )
    } else if counting {
        GenerationResult::new(
            format!("SELECT COUNT(*) FROM {};", table),
            format!("This query counts the total number of records in the {} table.", table),
        )
    } else if !where_clause.is_empty() {
        GenerationResult::new(
            format!("SELECT * FROM {} WHERE {};", table, where_clause),
            format!("This query retrieves all records from the {} table where {}.", table, where_clause),
        )
    } else if query_lower.contains("all") {
        GenerationResult::new(
            format!("SELECT * FROM {};", table),
            format!("This query retrieves all columns and rows from the {} table.", table),
        )
    } else {
        GenerationResult::new(
            format!("SELECT * FROM {} LIMIT 10;", table),
            format!("This query retrieves the first 10 records from the {} table.", table),
        )
    }
}
