//! WHERE-clause extraction rules
//!
//! Each rule covers one condition vocabulary and contributes at most one
//! fragment. Rules run in a fixed order and every rule is evaluated, so a query
//! may produce several fragments joined with `AND`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// ============================================================================
// Fragment
// ============================================================================

/// A single `column operator value` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionFragment {
    pub column: String,
    pub operator: &'static str,
    /// Rendered SQL literal (numbers bare, text single-quoted)
    pub value: String,
}

impl ConditionFragment {
    fn number(column: &str, operator: &'static str, value: &str) -> Self {
        Self { column: column.to_string(), operator, value: value.to_string() }
    }

    fn text(column: &str, operator: &'static str, value: &str) -> Self {
        Self { column: column.to_string(), operator, value: format!("'{}'", value) }
    }
}

impl fmt::Display for ConditionFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

// ============================================================================
// Rule Trait
// ============================================================================

pub trait ConditionRule: Send + Sync {
    /// Column family this rule covers (e.g. "salary")
    fn name(&self) -> &str;

    /// Whether the query mentions this rule's vocabulary at all
    fn triggered_by(&self, query: &str) -> bool;

    /// Extract the fragment; `None` when the wording does not fit the pattern
    fn evaluate(&self, query: &str) -> Option<ConditionFragment>;
}

/// Start of any trigger word; a numeric clause stops where another one begins.
/// Anchored at a word start so "wages" or "managers" never end a clause.
static CLAUSE_BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:salary|age|department|name|status|date|created|updated)").unwrap()
});

/// All rules in evaluation order
pub fn get_all_rules() -> Vec<Box<dyn ConditionRule>> {
    vec![
        Box::new(NumericComparisonRule::new(
            "salary",
            vec![
                Comparison::new(&["greater than", "more than", "above"], ">"),
                Comparison::new(&["less than", "below", "under"], "<"),
                Comparison::new(&["equal", "exactly"], "="),
            ],
        )),
        Box::new(NumericComparisonRule::new(
            "age",
            vec![
                Comparison::new(&["older than", "above"], ">"),
                Comparison::new(&["younger than", "under"], "<"),
            ],
        )),
        Box::new(EqualityRule::new("department", &DEPARTMENT_REGEX)),
        Box::new(NamePatternRule),
        Box::new(EqualityRule::new("status", &STATUS_REGEX)),
        Box::new(DateRule),
    ]
}

static CONDITION_RULES: Lazy<Vec<Box<dyn ConditionRule>>> = Lazy::new(get_all_rules);

/// Extract all condition fragments from a query, in rule order
pub fn extract_conditions(query: &str) -> Vec<ConditionFragment> {
    let query_lower = query.to_lowercase();
    CONDITION_RULES
        .iter()
        .filter(|rule| rule.triggered_by(&query_lower))
        .filter_map(|rule| {
            let fragment = rule.evaluate(&query_lower);
            if fragment.is_none() {
                tracing::debug!("Condition rule '{}' triggered without a match", rule.name());
            }
            fragment
        })
        .collect()
}

/// WHERE clause body for a query; empty when nothing matched
pub fn extract_where_conditions(query: &str) -> String {
    extract_conditions(query)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}

// ============================================================================
// Numeric comparisons (salary, age)
// ============================================================================

/// Comparison phrases mapped to one operator, e.g. "more than" → `>`
pub struct Comparison {
    phrases: &'static [&'static str],
    operator: &'static str,
    regex: Regex,
}

impl Comparison {
    fn new(phrases: &'static [&'static str], operator: &'static str) -> Self {
        let alternatives: Vec<String> = phrases.iter().map(|p| regex::escape(p)).collect();
        let regex = Regex::new(&format!(r"(?:{})\s+(\d+)", alternatives.join("|"))).unwrap();
        Self { phrases, operator, regex }
    }

    fn mentioned_in(&self, clause: &str) -> bool {
        self.phrases.iter().any(|p| clause.contains(p))
    }
}

/// `<column> <op> N` from the clause following the column word.
///
/// The first comparison whose phrase appears decides; if its number is missing
/// no fragment is produced and later comparisons are not consulted.
pub struct NumericComparisonRule {
    column: &'static str,
    /// Column word at a word start ("age" in "aged", not in "managers")
    anchor: Regex,
    comparisons: Vec<Comparison>,
}

impl NumericComparisonRule {
    fn new(column: &'static str, comparisons: Vec<Comparison>) -> Self {
        let anchor = Regex::new(&format!(r"\b{}", regex::escape(column))).unwrap();
        Self { column, anchor, comparisons }
    }
}

impl ConditionRule for NumericComparisonRule {
    fn name(&self) -> &str {
        self.column
    }

    fn triggered_by(&self, query: &str) -> bool {
        query.contains(self.column)
    }

    fn evaluate(&self, query: &str) -> Option<ConditionFragment> {
        let clause = clause_after(query, &self.anchor, self.column);
        let comparison = self.comparisons.iter().find(|c| c.mentioned_in(clause))?;
        let number = comparison.regex.captures(clause)?.get(1)?.as_str();
        Some(ConditionFragment::number(self.column, comparison.operator, number))
    }
}

/// Text after the first anchored `trigger`, up to the next other trigger word
fn clause_after<'a>(query: &'a str, anchor: &Regex, trigger: &str) -> &'a str {
    let Some(start) = anchor.find(query) else {
        return "";
    };
    let rest = &query[start.end()..];
    let end = CLAUSE_BOUNDARY_REGEX
        .find_iter(rest)
        .find(|m| m.as_str() != trigger)
        .map_or(rest.len(), |m| m.start());
    &rest[..end]
}

// ============================================================================
// Text equality (department, status)
// ============================================================================

static DEPARTMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"department\s+(?:is\s+)?["']?([a-zA-Z\s]+)["']?"#).unwrap());

static STATUS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"status\s+(?:is\s+)?["']?([a-zA-Z\s]+)["']?"#).unwrap());

/// `<column> = '<text>'` from "<column> [is] [']text[']"
pub struct EqualityRule {
    column: &'static str,
    regex: &'static Lazy<Regex>,
}

impl EqualityRule {
    fn new(column: &'static str, regex: &'static Lazy<Regex>) -> Self {
        Self { column, regex }
    }
}

impl ConditionRule for EqualityRule {
    fn name(&self) -> &str {
        self.column
    }

    fn triggered_by(&self, query: &str) -> bool {
        query.contains(self.column)
    }

    fn evaluate(&self, query: &str) -> Option<ConditionFragment> {
        let captured = self.regex.captures(query)?.get(1)?.as_str().trim();
        if captured.is_empty() {
            return None;
        }
        Some(ConditionFragment::text(self.column, "=", captured))
    }
}

// ============================================================================
// Name patterns
// ============================================================================

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"name\s+(?:like|contains|starts with)\s+["']([^"']+)["']"#).unwrap()
});

const NAME_VERBS: &[&str] = &["like", "contains", "starts with"];

/// `name LIKE` from a quoted pattern after like / contains / starts with
pub struct NamePatternRule;

impl ConditionRule for NamePatternRule {
    fn name(&self) -> &str {
        "name"
    }

    fn triggered_by(&self, query: &str) -> bool {
        query.contains("name") && NAME_VERBS.iter().any(|v| query.contains(v))
    }

    fn evaluate(&self, query: &str) -> Option<ConditionFragment> {
        let text = NAME_REGEX.captures(query)?.get(1)?.as_str();
        let pattern = if query.contains("starts with") {
            format!("{}%", text)
        } else {
            format!("%{}%", text)
        };
        Some(ConditionFragment::text("name", "LIKE", &pattern))
    }
}

// ============================================================================
// Dates
// ============================================================================

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:after|since)\s+(\d{4}-\d{2}-\d{2})").unwrap());

/// `<date column> > 'YYYY-MM-DD'` for "after"/"since" phrasing
pub struct DateRule;

impl ConditionRule for DateRule {
    fn name(&self) -> &str {
        "date"
    }

    fn triggered_by(&self, query: &str) -> bool {
        ["date", "created", "updated"].iter().any(|w| query.contains(w))
            && ["after", "since"].iter().any(|w| query.contains(w))
    }

    fn evaluate(&self, query: &str) -> Option<ConditionFragment> {
        let date = DATE_REGEX.captures(query)?.get(1)?.as_str();
        let column = if query.contains("created") {
            "created_at"
        } else if query.contains("updated") {
            "updated_at"
        } else {
            "date"
        };
        Some(ConditionFragment::text(column, ">", date))
    }
}
