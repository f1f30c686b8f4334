//! Detection and capture pipelines.

mod detector;
mod manual;
mod select;
mod session;

pub use detector::{DetectionLoop, DetectionSettings, LoopSummary, run_detection};
pub use manual::{ManualSettings, run_manual};
pub use select::{BoringSet, select_top};
pub use session::Session;
