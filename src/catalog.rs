// ABOUTME: Ordered catalog of supported physical activity types
// ABOUTME: Maps 1-based user input indices to the labels the model was trained on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Activity catalog
//!
//! Users pick activities by 1-based index; rows and the model artifact carry
//! the label text. The ordering here is part of the trained model contract
//! and is checked against the artifact at startup.

/// Supported activity labels, index 1 first
const LABELS: [&str; 19] = [
    "Walk",
    "Run",
    "Dancing",
    "Bike",
    "Outdoor Bike",
    "Swim",
    "Aerobic Workout",
    "Yoga",
    "Zumba",
    "Tennis",
    "Weights",
    "Strength training",
    "Workout",
    "HIIT",
    "Hike",
    "Indoor climbing",
    "Stairclimber",
    "Spinning",
    "Sport",
];

/// Lookup table from user-facing activity indices to model labels
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityCatalog;

impl ActivityCatalog {
    /// Number of supported activities
    pub const LEN: usize = LABELS.len();

    /// Label for a 1-based index, `None` when the index is outside the catalog
    #[must_use]
    pub fn label_at(self, index: usize) -> Option<&'static str> {
        if index == 0 {
            return None;
        }
        LABELS.get(index - 1).copied()
    }

    /// All labels in index order
    #[must_use]
    pub fn labels(self) -> &'static [&'static str] {
        &LABELS
    }

    /// Whether the given label belongs to the catalog
    #[must_use]
    pub fn contains(self, label: &str) -> bool {
        LABELS.contains(&label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_one_based() {
        let catalog = ActivityCatalog;
        assert_eq!(catalog.label_at(1), Some("Walk"));
        assert_eq!(catalog.label_at(19), Some("Sport"));
        assert_eq!(catalog.label_at(0), None);
        assert_eq!(catalog.label_at(20), None);
    }

    #[test]
    fn test_contains_known_labels() {
        let catalog = ActivityCatalog;
        assert!(catalog.contains("Strength training"));
        assert!(!catalog.contains("Napping"));
    }
}
