//! String helpers
//!
//! Small trimming/cleaning helpers shared by request handling and the
//! heuristic engine.

/// Punctuation stripped from both ends of a query token
const TOKEN_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';'];

/// Strip sentence punctuation from both ends of a whitespace token
///
/// # Example
/// ```ignore
/// assert_eq!(strip_punctuation("orders?"), "orders");
/// ```
#[inline]
pub fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(TOKEN_PUNCTUATION)
}

/// String cleaning extension trait
pub trait StringExt {
    /// Trim the string; blank strings become None
    fn clean(&self) -> Option<String>;
}

impl StringExt for str {
    #[inline]
    fn clean(&self) -> Option<String> {
        let trimmed = self.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }
}

impl StringExt for String {
    #[inline]
    fn clean(&self) -> Option<String> {
        self.as_str().clean()
    }
}

impl<T: AsRef<str>> StringExt for Option<T> {
    #[inline]
    fn clean(&self) -> Option<String> {
        self.as_ref().and_then(|s| s.as_ref().clean())
    }
}
