use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Which of an expression's patterns a compile error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// A file match expression, applied to paths.
    FilePath,
    /// The path filter gating a content expression.
    FileFilter,
    /// A content expression, applied to lines.
    Content,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::FilePath => write!(f, "file match"),
            PatternKind::FileFilter => write!(f, "file filter"),
            PatternKind::Content => write!(f, "content match"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("error compiling {kind} expression for id {id}: {source}")]
    Compile {
        id: String,
        kind: PatternKind,
        source: regex::Error,
    },
    #[error("invalid argument: at least one root directory is required")]
    InvalidArgument,
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScanError {
    pub fn compile(id: impl Into<String>, kind: PatternKind, source: regex::Error) -> Self {
        ScanError::Compile {
            id: id.into(),
            kind,
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        ScanError::Config(msg.into())
    }

    /// The expression id a compile error was reported for, if any.
    pub fn exp_id(&self) -> Option<&str> {
        match self {
            ScanError::Compile { id, .. } => Some(id),
            _ => None,
        }
    }

    pub(crate) fn line_too_long(path: &Path, capacity: usize) -> Self {
        ScanError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds the {} byte scan buffer", capacity),
            ),
        )
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
