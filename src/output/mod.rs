//! Observation log, image naming and timestamps.

mod clock;
mod log;
mod naming;
mod types;

pub use clock::{Clock, LocalClock};
pub use log::ObservationLog;
pub use naming::{detection_image_name, manual_image_name, unique_path};
pub use types::{Observation, SpeciesName};

use crate::error::{Error, Result};
use std::path::Path;

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| Error::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}
