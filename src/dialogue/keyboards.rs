// ABOUTME: Reply keyboard layouts shown alongside bot messages
// ABOUTME: Transport-agnostic rows of button labels, one layout per screen
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

use super::templates::labels;
use crate::models::FeatureKind;

/// Rows of button labels for one reply keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    rows: Vec<Vec<String>>,
}

impl KeyboardLayout {
    fn from_labels(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|label| (*label).to_owned()).collect())
                .collect(),
        }
    }

    /// Button rows in display order
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Single rules button shown with the greeting
    #[must_use]
    pub fn start() -> Self {
        Self::from_labels(&[&[labels::RULES]])
    }

    /// Main menu actions
    #[must_use]
    pub fn main_menu() -> Self {
        Self::from_labels(&[
            &[labels::ADD_ENTRY, labels::VIEW_HISTORY],
            &[labels::RULES],
        ])
    }

    /// Feature choice grid plus navigation and submit
    #[must_use]
    pub fn features() -> Self {
        use super::templates::feature_label;
        Self::from_labels(&[
            &[
                feature_label(FeatureKind::Glucose),
                feature_label(FeatureKind::Insulin),
                feature_label(FeatureKind::Carbs),
            ],
            &[
                feature_label(FeatureKind::HeartRate),
                feature_label(FeatureKind::Steps),
                feature_label(FeatureKind::Calories),
            ],
            &[feature_label(FeatureKind::Activity)],
            &[labels::MAIN_MENU, labels::SUBMIT],
        ])
    }

    /// Actions offered under the history view
    #[must_use]
    pub fn history() -> Self {
        Self::from_labels(&[&[labels::DELETE_HISTORY, labels::MAIN_MENU]])
    }

    /// Navigation shown while a series is being entered
    #[must_use]
    pub fn input() -> Self {
        Self::from_labels(&[&[labels::BACK_TO_FEATURES, labels::MAIN_MENU]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_layout_covers_every_feature() {
        let layout = KeyboardLayout::features();
        let buttons: Vec<&str> = layout
            .rows()
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        for kind in FeatureKind::ALL {
            assert!(buttons.contains(&super::super::templates::feature_label(kind)));
        }
        assert!(buttons.contains(&labels::SUBMIT));
        assert_eq!(layout.rows().len(), 4);
    }

    #[test]
    fn test_main_menu_rows() {
        let layout = KeyboardLayout::main_menu();
        assert_eq!(layout.rows()[0], vec!["Add entry", "View history"]);
        assert_eq!(layout.rows()[1], vec!["Rules"]);
    }
}
