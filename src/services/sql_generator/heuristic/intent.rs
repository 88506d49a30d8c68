//! Query intent classification

/// Statement shape inferred from the request wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Insert,
    Update,
    Delete,
    Join,
    Aggregate,
    /// Nothing matched; rendered with the read shape
    Default,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Join => "join",
            Self::Aggregate => "aggregate",
            Self::Default => "default",
        }
    }
}

struct IntentRule {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Evaluated top to bottom, first hit wins
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Read,
        keywords: &["select", "find", "get", "show", "list", "display", "retrieve", "fetch"],
    },
    IntentRule { intent: Intent::Insert, keywords: &["insert", "add", "create", "new"] },
    IntentRule { intent: Intent::Update, keywords: &["update", "modify", "change", "edit"] },
    IntentRule { intent: Intent::Delete, keywords: &["delete", "remove", "drop"] },
    IntentRule { intent: Intent::Join, keywords: &["join", "combine", "merge"] },
    IntentRule {
        intent: Intent::Aggregate,
        keywords: &["group", "aggregate", "sum", "average", "max", "min"],
    },
];

/// Classify a lower-cased query. Keywords match as substrings.
pub fn classify_intent(query_lower: &str) -> Intent {
    INTENT_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| query_lower.contains(k)))
        .map_or(Intent::Default, |rule| rule.intent)
}
