//! JSON-lines decoding of classification results.

use crate::error::{Error, Result};
use crate::inference::ClassificationResult;
use std::io::BufRead;

/// Iterator over one JSON-encoded [`ClassificationResult`] per line.
///
/// Blank lines are skipped. A read or parse failure is yielded as an error;
/// the caller decides whether to continue.
pub struct JsonLines<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLines<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = Result<ClassificationResult>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let trimmed = self.buf.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(trimmed).map_err(|e| {
                        Error::InferenceParse {
                            line: self.line,
                            source: e,
                        }
                    }));
                }
                Err(e) => return Some(Err(Error::InferenceRead { source: e })),
            }
        }
    }
}
