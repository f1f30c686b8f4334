//! Image file naming.

use crate::constants::{IMAGE_EXTENSION, TIMESTAMP_FORMAT};
use crate::output::SpeciesName;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// File name for a detection capture: `YY-MM-DD_HH-MM-SS_<genus>_<species>.jpg`.
pub fn detection_image_name(timestamp: NaiveDateTime, name: &SpeciesName) -> String {
    let mut stem = format!(
        "{}_{}",
        timestamp.format(TIMESTAMP_FORMAT),
        sanitize(&name.genus)
    );
    if let Some(species) = &name.species {
        stem.push('_');
        stem.push_str(&sanitize(species));
    }
    format!("{stem}.{IMAGE_EXTENSION}")
}

/// File name for a button-triggered capture: `YY-MM-DD_HH-MM-SS.jpg`.
pub fn manual_image_name(timestamp: NaiveDateTime) -> String {
    format!("{}.{IMAGE_EXTENSION}", timestamp.format(TIMESTAMP_FORMAT))
}

/// `dir/name`, or `dir/<stem>-N.<ext>` with the smallest free `N` when taken.
///
/// Detections in the same second share a timestamp, so each capture gets a
/// path of its own.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if !path.exists() {
        return path;
    }
    let (stem, extension) = name.rsplit_once('.').unwrap_or((name, ""));
    (1..u32::MAX)
        .map(|n| {
            if extension.is_empty() {
                dir.join(format!("{stem}-{n}"))
            } else {
                dir.join(format!("{stem}-{n}.{extension}"))
            }
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Keep ASCII alphanumerics, `-` and `_`; replace everything else with `_`.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
