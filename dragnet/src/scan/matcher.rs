use std::path::Path;

use regex::bytes::Regex;

use crate::error::{PatternKind, ScanError};
use crate::expression::{ContentMatchExp, FileMatchExp};
use crate::results::FileMatch;

fn compile(id: &str, kind: PatternKind, pattern: &str) -> Result<Regex, ScanError> {
    Regex::new(pattern).map_err(|e| ScanError::compile(id, kind, e))
}

/// Compiled form of a [`FileMatchExp`].
///
/// Patterns see raw path bytes, so byte regexes are used throughout; case
/// folding and anchoring are the caller's business (`(?i)`, `^`, `$` inline).
#[derive(Debug, Clone)]
pub struct FileMatcher {
    id: String,
    exp: Regex,
}

impl FileMatcher {
    pub fn new(exp: &FileMatchExp) -> Result<Self, ScanError> {
        Ok(Self {
            id: exp.id.clone(),
            exp: compile(&exp.id, PatternKind::FilePath, &exp.pattern)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Substring test against the raw bytes of `path`. No normalization.
    pub fn is_match(&self, path: &Path) -> bool {
        self.exp.is_match(path.as_os_str().as_encoded_bytes())
    }
}

/// File matchers in input order.
#[derive(Debug, Clone, Default)]
pub struct FileMatcherSet {
    matchers: Vec<FileMatcher>,
}

impl FileMatcherSet {
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// One record per matcher that accepts `path`, mirroring matcher order.
    pub fn match_all(&self, path: &Path) -> Vec<FileMatch> {
        let mut results = Vec::new();
        for m in &self.matchers {
            if m.is_match(path) {
                results.push(FileMatch {
                    exp_id: m.id.clone(),
                    file_path: path.to_path_buf(),
                });
            }
        }
        results
    }
}

/// Compiled form of a [`ContentMatchExp`].
#[derive(Debug, Clone)]
pub struct ContentMatcher {
    id: String,
    file_filter: Option<FileMatcher>,
    exp: Regex,
}

impl ContentMatcher {
    /// Compiles the content pattern and, when enabled, the path filter.
    ///
    /// The two compilations are independent so a batch reports every broken
    /// pattern in one pass. A matcher comes back only when the content
    /// pattern compiled and the filter, if enabled, compiled too; a disabled
    /// filter is never even looked at.
    pub fn new(exp: &ContentMatchExp) -> (Option<Self>, Vec<ScanError>) {
        let mut errs = Vec::new();

        let mut file_filter = None;
        if exp.file_filter_enabled {
            match compile(&exp.id, PatternKind::FileFilter, &exp.file_filter) {
                Ok(re) => {
                    file_filter = Some(FileMatcher {
                        id: exp.id.clone(),
                        exp: re,
                    })
                }
                Err(e) => errs.push(e),
            }
        }

        let content = match compile(&exp.id, PatternKind::Content, &exp.pattern) {
            Ok(re) => re,
            Err(e) => {
                errs.push(e);
                return (None, errs);
            }
        };
        if !errs.is_empty() {
            return (None, errs);
        }

        (
            Some(Self {
                id: exp.id.clone(),
                file_filter,
                exp: content,
            }),
            errs,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when the matcher has no path filter or the filter accepts `path`.
    pub fn applies_to(&self, path: &Path) -> bool {
        self.file_filter.as_ref().map_or(true, |f| f.is_match(path))
    }

    /// Non-overlapping occurrences of the content pattern on one line, left
    /// to right.
    pub fn occurrences<'a>(&'a self, line: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.exp.find_iter(line).map(|m| m.as_bytes())
    }
}

/// Content matchers in input order.
#[derive(Debug, Clone, Default)]
pub struct ContentMatcherSet {
    matchers: Vec<ContentMatcher>,
}

impl ContentMatcherSet {
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// The matchers whose path filter is absent or accepts `path`.
    pub fn filter_applicable(&self, path: &Path) -> Vec<&ContentMatcher> {
        self.matchers.iter().filter(|m| m.applies_to(path)).collect()
    }
}

/// Compiles a batch of path expressions, collecting every matcher that
/// compiled and every error. A broken pattern never aborts the batch; empty
/// input yields empty outputs.
pub fn build_file_matchers(exps: &[FileMatchExp]) -> (FileMatcherSet, Vec<ScanError>) {
    let mut matchers = Vec::with_capacity(exps.len());
    let mut errs = Vec::new();
    for exp in exps {
        match FileMatcher::new(exp) {
            Ok(m) => matchers.push(m),
            Err(e) => errs.push(e),
        }
    }
    (FileMatcherSet { matchers }, errs)
}

/// Batch counterpart of [`ContentMatcher::new`], same collect-everything
/// policy as [`build_file_matchers`].
pub fn build_content_matchers(exps: &[ContentMatchExp]) -> (ContentMatcherSet, Vec<ScanError>) {
    let mut matchers = Vec::with_capacity(exps.len());
    let mut errs = Vec::new();
    for exp in exps {
        let (matcher, mut exp_errs) = ContentMatcher::new(exp);
        errs.append(&mut exp_errs);
        if let Some(m) = matcher {
            matchers.push(m);
        }
    }
    (ContentMatcherSet { matchers }, errs)
}
