//! Camera control.

mod command;

pub use command::CommandCamera;

use crate::error::Result;
use std::path::Path;

/// Still camera used by the detection loop and manual capture.
pub trait Camera {
    /// Start the live preview.
    fn start_preview(&mut self) -> Result<()>;

    /// Stop the live preview. Stopping a stopped preview is a no-op.
    fn stop_preview(&mut self) -> Result<()>;

    /// Text embedded in subsequent captures, or `None` to clear it.
    fn set_annotation(&mut self, text: Option<String>);

    /// Capture a still image to `path`.
    fn capture(&mut self, path: &Path) -> Result<()>;
}
