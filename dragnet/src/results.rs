use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A path rule that accepted a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatch {
    pub exp_id: String,
    pub file_path: PathBuf,
}

/// One occurrence of a content rule on one line.
///
/// A line holding several occurrences of the same rule produces several
/// records, in left to right order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMatch {
    pub exp_id: String,
    pub file_path: PathBuf,
    /// 1-based line within the file.
    pub line_number: u64,
    pub match_string: String,
}

/// Everything a collecting scan produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub file_matches: Vec<FileMatch>,
    pub content_matches: Vec<ContentMatch>,
}

impl MatchResult {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn total(&self) -> usize {
        self.file_matches.len() + self.content_matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_matches.is_empty() && self.content_matches.is_empty()
    }
}
