//! Choosing which classes of a result trigger a capture.

use crate::inference::Classification;
use std::collections::HashSet;

/// Labels that never trigger a capture.
#[derive(Debug, Clone, Default)]
pub struct BoringSet {
    labels: HashSet<String>,
}

impl BoringSet {
    /// Whether `label` is boring. Matching is exact.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Number of boring labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BoringSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Classes scoring at least `threshold`, highest first, at most `top_k` of them.
///
/// Ties keep their reported order. NaN scores never qualify.
pub fn select_top(classes: &[Classification], threshold: f32, top_k: usize) -> Vec<&Classification> {
    let mut selected: Vec<&Classification> =
        classes.iter().filter(|c| c.score >= threshold).collect();
    selected.sort_by(|a, b| b.score.total_cmp(&a.score));
    selected.truncate(top_k);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(pairs: &[(&str, f32)]) -> Vec<Classification> {
        pairs
            .iter()
            .map(|&(label, score)| Classification::new(label, score))
            .collect()
    }

    fn labels<'a>(selected: &[&'a Classification]) -> Vec<&'a str> {
        selected.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_below_threshold_dropped() {
        let input = classes(&[("a", 0.05), ("b", 0.2)]);
        assert_eq!(labels(&select_top(&input, 0.1, 5)), vec!["b"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let input = classes(&[("a", 0.25)]);
        assert_eq!(labels(&select_top(&input, 0.25, 1)), vec!["a"]);
    }

    #[test]
    fn test_top_k_keeps_highest_scores() {
        let input = classes(&[("low", 0.3), ("high", 0.9), ("mid", 0.5), ("tiny", 0.31)]);
        assert_eq!(labels(&select_top(&input, 0.1, 2)), vec!["high", "mid"]);
    }

    #[test]
    fn test_ties_keep_reported_order() {
        let input = classes(&[("first", 0.5), ("second", 0.5)]);
        assert_eq!(labels(&select_top(&input, 0.1, 2)), vec!["first", "second"]);
    }

    #[test]
    fn test_nan_never_selected() {
        let input = classes(&[("nan", f32::NAN), ("ok", 0.4)]);
        assert_eq!(labels(&select_top(&input, 0.1, 3)), vec!["ok"]);
    }

    #[test]
    fn test_boring_set_exact_match() {
        let boring: BoringSet = ["Meleagris gallopavo (Wild Turkey)", "background"]
            .into_iter()
            .collect();
        assert!(boring.contains("background"));
        assert!(!boring.contains("Background"));
        assert_eq!(boring.len(), 2);
    }
}
