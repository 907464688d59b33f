use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::ScanError;
use crate::results::{ContentMatch, FileMatch};

use super::matcher::{ContentMatcherSet, FileMatcherSet};

const READ_BUFFER_CAPACITY: usize = 64 * 1024;

/// Scratch line buffer preallocation; also the longest scannable line.
pub(crate) const LINE_BUFFER_CAPACITY: usize = 10 * 1024 * 1024;

/// Per-worker file processor.
///
/// Owns the scratch line buffer so a worker reuses one allocation across all
/// of its jobs. Never shared between workers.
pub(crate) struct FileProcessor<'a> {
    file_matchers: &'a FileMatcherSet,
    content_matchers: &'a ContentMatcherSet,
    line_buf: Vec<u8>,
    line_cap: usize,
}

impl<'a> FileProcessor<'a> {
    pub fn new(file_matchers: &'a FileMatcherSet, content_matchers: &'a ContentMatcherSet) -> Self {
        Self {
            file_matchers,
            content_matchers,
            line_buf: Vec::with_capacity(if content_matchers.is_empty() {
                0
            } else {
                LINE_BUFFER_CAPACITY
            }),
            line_cap: LINE_BUFFER_CAPACITY,
        }
    }

    #[cfg(test)]
    fn with_line_cap(mut self, cap: usize) -> Self {
        self.line_cap = cap;
        self
    }

    /// Applies every file matcher to `path`.
    pub fn match_paths(&self, path: &Path) -> Vec<FileMatch> {
        self.file_matchers.match_all(path)
    }

    /// Scans `path` line by line with every applicable content matcher.
    ///
    /// No I/O happens when no matcher is applicable. Matches collected before
    /// a read error are kept and returned next to it; the file handle is
    /// released on every exit path before the worker takes its next job.
    pub fn match_contents(&mut self, path: &Path) -> (Vec<ContentMatch>, Option<ScanError>) {
        let mut results = Vec::new();
        if self.content_matchers.is_empty() {
            return (results, None);
        }
        let applicable = self.content_matchers.filter_applicable(path);
        if applicable.is_empty() {
            return (results, None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => return (results, Some(ScanError::io(path, e))),
        };
        let mut reader = BufReader::with_capacity(READ_BUFFER_CAPACITY, file);

        let mut line_no: u64 = 0;
        loop {
            match read_line(&mut reader, &mut self.line_buf, self.line_cap) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return (results, Some(ScanError::line_too_long(path, self.line_cap)));
                }
                Err(e) => return (results, Some(ScanError::io(path, e))),
            }
            line_no += 1;
            let line = trim_line_ending(&self.line_buf);
            for m in &applicable {
                for occurrence in m.occurrences(line) {
                    results.push(ContentMatch {
                        exp_id: m.id().to_string(),
                        file_path: path.to_path_buf(),
                        line_number: line_no,
                        match_string: String::from_utf8_lossy(occurrence).into_owned(),
                    });
                }
            }
        }
        (results, None)
    }
}

/// Reads one line, delimiter included, into `buf`, reusing its capacity.
///
/// Returns the number of bytes read; 0 means end of input. A line longer
/// than `max` is an `InvalidData` error.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
    buf.clear();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(buf.len());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                buf.extend_from_slice(&available[..=i]);
                reader.consume(i + 1);
                if buf.len() > max {
                    return Err(io::Error::from(io::ErrorKind::InvalidData));
                }
                return Ok(buf.len());
            }
            None => {
                let n = available.len();
                buf.extend_from_slice(available);
                reader.consume(n);
                if buf.len() > max {
                    return Err(io::Error::from(io::ErrorKind::InvalidData));
                }
            }
        }
    }
}

/// Strips the trailing LF and an immediately preceding CR.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
