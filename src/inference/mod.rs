//! Inference results from the vision accelerator.
//!
//! The model runs out of process. Backends produce an iterator of
//! [`ClassificationResult`]s, one per classified frame, blocking until the
//! next frame is ready.

mod command;
mod lines;
mod replay;

pub use command::{CommandInference, KillHandle};
pub use lines::JsonLines;
pub use replay::ReplayInference;

use serde::{Deserialize, Serialize};

/// A single label with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Label as reported by the model, e.g. `Turdus migratorius (American Robin)`.
    pub label: String,
    /// Score in `[0, 1]`.
    pub score: f32,
}

impl Classification {
    /// Create a classification.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Classes reported for one frame, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Reported classes.
    #[serde(default)]
    pub classes: Vec<Classification>,
}

impl From<Vec<Classification>> for ClassificationResult {
    fn from(classes: Vec<Classification>) -> Self {
        Self { classes }
    }
}
