//! Output type definitions.

use crate::constants::{LOG_SCORE_DECIMALS, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;

/// One accepted detection, as written to the observation log.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Local wall-clock time of the detection.
    pub timestamp: NaiveDateTime,
    /// Full label reported by the model.
    pub label: String,
    /// Classification score (0.0 - 1.0).
    pub score: f32,
}

impl Observation {
    /// Format as a log line: `YY-MM-DD_HH-MM-SS <label> (prob=<score>) ` plus newline.
    pub fn log_line(&self) -> String {
        format!(
            "{} {} (prob={:.decimals$}) \n",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.label,
            self.score,
            decimals = LOG_SCORE_DECIMALS,
        )
    }
}

/// Genus and species parsed from a model label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesName {
    /// First word of the label.
    pub genus: String,
    /// Second word, absent for genus-level or single-word labels.
    pub species: Option<String>,
}

impl SpeciesName {
    /// Parse a label in `Genus species (Common Name)` form.
    ///
    /// Only the binomial is kept; the parenthesised common name is dropped.
    pub fn from_label(label: &str) -> Self {
        let mut words = label.split_whitespace();
        let genus = words
            .next()
            .filter(|w| !w.starts_with('('))
            .unwrap_or("unknown")
            .to_string();
        let species = words
            .next()
            .filter(|w| !w.starts_with('('))
            .map(ToString::to_string);
        Self { genus, species }
    }

    /// Binomial as displayed on captures.
    pub fn binomial(&self) -> String {
        self.species.as_ref().map_or_else(
            || self.genus.clone(),
            |species| format!("{} {species}", self.genus),
        )
    }

    /// Annotation embedded in the image, e.g. `Turdus migratorius (prob= 0.82)`.
    pub fn annotation(&self, score: f32) -> String {
        format!("{} (prob= {score:.2})", self.binomial())
    }
}
