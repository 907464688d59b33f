use serde::{Deserialize, Serialize};

/// One path rule: a regular expression applied to file paths.
///
/// `id` is an opaque caller-chosen label echoed on every result it produces.
/// Ids are not validated and need not be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatchExp {
    pub id: String,
    pub pattern: String,
}

/// One content rule: a regular expression applied line by line to file
/// contents, optionally gated by a path filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMatchExp {
    pub id: String,
    /// When false the path filter is ignored entirely, even if malformed.
    #[serde(default)]
    pub file_filter_enabled: bool,
    /// Path filter pattern; diagnostics for it carry the rule's `id`.
    #[serde(default)]
    pub file_filter: String,
    pub pattern: String,
}

/// The rule batch handed to [`Scanner::new`](crate::Scanner::new).
///
/// Either sequence may be empty; either being non-empty is enough to run a
/// scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expressions {
    #[serde(default)]
    pub file_exps: Vec<FileMatchExp>,
    #[serde(default)]
    pub content_exps: Vec<ContentMatchExp>,
}

impl Expressions {
    pub fn is_empty(&self) -> bool {
        self.file_exps.is_empty() && self.content_exps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let exp: ContentMatchExp =
            serde_json::from_str(r#"{ "id": "todo", "pattern": "TODO" }"#).unwrap();
        assert!(!exp.file_filter_enabled);
        assert!(exp.file_filter.is_empty());
        assert_eq!(exp.pattern, "TODO");
    }

    #[test]
    fn test_expressions_is_empty() {
        let mut exps = Expressions::default();
        assert!(exps.is_empty());
        exps.file_exps.push(FileMatchExp {
            id: "f".to_string(),
            pattern: r"\.rs$".to_string(),
        });
        assert!(!exps.is_empty());
    }
}
