//! The scanning pipeline.
//!
//! A scan wires four pieces together: a walker thread that enumerates files
//! under the roots, a pool of worker threads that pull paths from a bounded
//! job channel and run both matcher collections over them, and the calling
//! thread, which multiplexes the bounded result and error channels into the
//! caller's callbacks. Channel disconnection is the only completion signal:
//! the walker closes the job channel by dropping its sender, the workers'
//! exit closes the output channels the same way, and the fan-in loop drains
//! whatever is buffered before returning.

mod engine;
pub mod matcher;
mod processor;
mod walker;

pub use engine::Scanner;
pub use matcher::{
    build_content_matchers, build_file_matchers, ContentMatcher, ContentMatcherSet, FileMatcher,
    FileMatcherSet,
};
