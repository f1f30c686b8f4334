//! Append-only observation log.

use crate::error::{Error, Result};
use crate::output::Observation;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Text log with one line per accepted detection.
///
/// The file is opened for each append so every line is on disk before the
/// debounce pause starts.
#[derive(Debug, Clone)]
pub struct ObservationLog {
    path: PathBuf,
}

impl ObservationLog {
    /// Log at `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one observation.
    pub fn append(&self, observation: &Observation) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.write_all(observation.log_line().as_bytes())
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::LogWrite {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn observation(label: &str, score: f32) -> Observation {
        Observation {
            timestamp: NaiveDateTime::default(),
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = TempDir::new().unwrap();
        let log = ObservationLog::new(dir.path().join("birdlist.txt"));
        std::fs::write(log.path(), "earlier line\n").unwrap();

        log.append(&observation("Sitta carolinensis (White-breasted Nuthatch)", 0.5))
            .unwrap();
        log.append(&observation("Cardinalis cardinalis (Northern Cardinal)", 0.7))
            .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier line");
        assert!(lines[2].contains("Cardinalis cardinalis (Northern Cardinal) (prob=0.700000)"));
    }

    #[test]
    fn test_append_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let log = ObservationLog::new(dir.path().join("missing").join("birdlist.txt"));
        let result = log.append(&observation("x", 0.5));
        assert!(matches!(result, Err(Error::LogWrite { .. })));
    }
}
