//! Recorded classification results.

use crate::error::{Error, Result};
use crate::inference::{ClassificationResult, JsonLines};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Replays classification results from a JSON-lines file.
///
/// Uses the same line format as the inference program. Useful for checking
/// a boring list or threshold against a recorded session without hardware.
pub struct ReplayInference {
    lines: JsonLines<BufReader<File>>,
}

impl ReplayInference {
    /// Open a replay file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::ReplayRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Replaying inference results from {}", path.display());
        Ok(Self {
            lines: JsonLines::new(BufReader::new(file)),
        })
    }
}

impl Iterator for ReplayInference {
    type Item = Result<ClassificationResult>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}
