//! dragnet: a concurrent scanner that applies identifier-tagged regular
//! expressions to file paths and file contents across directory trees.
//!
//! Compile a batch of expressions into a [`Scanner`], then stream matches
//! through [`Scanner::scan_with_callback`] or collect them with
//! [`Scanner::scan`]. Every record carries the id of the expression that
//! produced it.

pub mod cancel;
pub mod config;
pub mod error;
pub mod expression;
pub mod logger;
pub mod results;
pub mod scan;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use config::ScanConfig;
pub use error::{PatternKind, ScanError, ScanResult};
pub use expression::{ContentMatchExp, Expressions, FileMatchExp};
pub use logger::{NoopLogger, ScanLogger, TracingLogger};
pub use results::{ContentMatch, FileMatch, MatchResult};
pub use scan::Scanner;
