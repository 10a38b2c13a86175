//! List-valued input fields.
//!
//! Skills, preferred job types and preferred locations are stored as ordered
//! lists. Clients may submit them either as a JSON array or as a single
//! comma-separated string; both forms normalize to the same trimmed list.

use serde::{Deserialize, Serialize};

/// A list field as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    /// `"rust, sql ,  docker"`
    Text(String),
    /// `["rust", "sql", "docker"]`
    Items(Vec<String>),
}

impl ListInput {
    /// Normalize into a trimmed list without empty entries.
    pub fn into_list(self) -> Vec<String> {
        match self {
            ListInput::Text(text) => normalize_list(&text),
            ListInput::Items(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Normalize for a partial update. Blank text (an untouched form field)
    /// yields `None`; an explicit array, even an empty one, replaces.
    pub fn into_update(self) -> Option<Vec<String>> {
        match self {
            ListInput::Text(text) if text.trim().is_empty() => None,
            other => Some(other.into_list()),
        }
    }
}

impl From<&str> for ListInput {
    fn from(text: &str) -> Self {
        ListInput::Text(text.to_string())
    }
}

impl From<Vec<String>> for ListInput {
    fn from(items: Vec<String>) -> Self {
        ListInput::Items(items)
    }
}

/// Split comma-separated text into a trimmed, ordered list.
///
/// Empty segments (`"a,,b"`, trailing commas) are dropped, so joining the
/// result with `", "` and normalizing again yields the same list.
pub fn normalize_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_keeps_order() {
        assert_eq!(
            normalize_list(" Rust ,SQL,  Docker "),
            vec!["Rust", "SQL", "Docker"]
        );
    }

    #[test]
    fn test_normalize_drops_empty_segments() {
        assert_eq!(normalize_list("a,, b ,"), vec!["a", "b"]);
        assert!(normalize_list("").is_empty());
        assert!(normalize_list(" , ").is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent_through_text() {
        let first = normalize_list("React,  TypeScript , CSS");
        let second = normalize_list(&first.join(", "));
        assert_eq!(first, second);
        let third = normalize_list(&second.join(","));
        assert_eq!(second, third);
    }

    #[test]
    fn test_list_input_accepts_text_or_array() {
        let text: ListInput = serde_json::from_str(r#""a, b""#).unwrap();
        let items: ListInput = serde_json::from_str(r#"[" a ", "b", ""]"#).unwrap();
        assert_eq!(text.into_list(), vec!["a", "b"]);
        assert_eq!(items.into_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_into_update_ignores_blank_text() {
        assert_eq!(ListInput::from("  ").into_update(), None);
        assert_eq!(ListInput::Items(vec![]).into_update(), Some(vec![]));
        assert_eq!(ListInput::from("x, y").into_update(), Some(vec!["x".to_string(), "y".to_string()]));
    }
}
