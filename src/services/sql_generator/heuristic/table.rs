//! Table name inference

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::strip_punctuation;

pub const FALLBACK_TABLE: &str = "your_table";

/// Words that usually precede a table name
const TABLE_MARKERS: &[&str] = &["from", "table", "into"];

const KNOWN_TABLES: &[&str] = &[
    "users",
    "products",
    "orders",
    "customers",
    "employees",
    "sales",
    "inventory",
    "items",
    "data",
];

/// Short words ending in "s" that are never table names
const PLURAL_STOPLIST: &[&str] = &["this", "that", "was", "has", "is"];

/// First `CREATE TABLE <name>` in supplied DDL; quoting and IF NOT EXISTS allowed
static CREATE_TABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)create\s+table\s+(?:if\s+not\s+exists\s+)?[`"\[]?(\w+(?:\.\w+)?)"#).unwrap()
});

type TableRule = for<'a> fn(&[&'a str]) -> Option<&'a str>;

/// Tiers, most specific first
const TABLE_RULES: &[TableRule] = &[token_after_marker, known_table, plural_noun];

/// Table declared in a schema, if the DDL names one
pub fn table_from_schema(schema: &str) -> Option<String> {
    CREATE_TABLE_REGEX.captures(schema).map(|c| c[1].to_string())
}

/// Infer a table name from a natural-language query, falling back to `your_table`.
pub fn extract_table_name(query: &str) -> String {
    let query_lower = query.to_lowercase();
    let words: Vec<&str> = query_lower.split_whitespace().collect();

    TABLE_RULES
        .iter()
        .find_map(|rule| rule(&words))
        .unwrap_or(FALLBACK_TABLE)
        .to_string()
}

fn token_after_marker<'a>(words: &[&'a str]) -> Option<&'a str> {
    words.windows(2).find_map(|pair| {
        let next = strip_punctuation(pair[1]);
        (TABLE_MARKERS.contains(&pair[0]) && next.chars().count() > 2).then_some(next)
    })
}

fn known_table<'a>(words: &[&'a str]) -> Option<&'a str> {
    words
        .iter()
        .map(|w| strip_punctuation(*w))
        .find(|w| KNOWN_TABLES.contains(w))
}

fn plural_noun<'a>(words: &[&'a str]) -> Option<&'a str> {
    words.iter().map(|w| strip_punctuation(*w)).find(|w| {
        w.chars().count() > 3 && w.ends_with('s') && !PLURAL_STOPLIST.contains(w)
    })
}
