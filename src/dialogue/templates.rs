// ABOUTME: Every user-facing message text and menu label of the bot
// ABOUTME: Keeps wording in one place so handlers stay free of string literals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Message templates
//!
//! Prompts embed the per-feature example line so users see exactly what a
//! valid series looks like, sentinel spellings included. Labels double as
//! match keys for incoming button presses, compared case-insensitively.

use crate::catalog::ActivityCatalog;
use crate::constants::readings;
use crate::formatters;
use crate::models::FeatureKind;

/// Greeting sent for the `/start` command
pub const GREETING: &str =
    "Hi!\nI can forecast your blood glucose level.\nBefore you start, please read the <b>rules</b>";

/// Usage rules shown on request
pub const RULES: &str = "Rules:\n 1. -------\n 2. -------\n 3. -------";

/// Main menu prompt
pub const CHOOSE_OPTION: &str = "Choose an option:";

/// Feature menu prompt
pub const CHOOSE_FEATURE: &str =
    "For more accurate forecasts it is recommended to fill in every feature.\nChoose a feature to enter:";

/// Reminder of the accepted unknown-value spellings
pub const SENTINEL_HINT: &str = "For unknown values use: \"n\", \"н\", \"nan\", \"нан\".";

/// Fallback for text that matches no command, label or expected input
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Response to submitting before confirming any series
pub const EMPTY_SUBMIT: &str = "Please enter feature data.";

/// Confirmation after a history purge
pub const HISTORY_DELETED: &str = "History deleted.";

/// Generic response when persistence or prediction fails
pub const REQUEST_FAILED: &str =
    "Something went wrong while processing your request. Please try again.";

/// Button labels for menu actions
pub mod labels {
    /// Shows the rules text
    pub const RULES: &str = "Rules";
    /// Returns to the main menu, dropping the session
    pub const MAIN_MENU: &str = "Main menu";
    /// Shows the user's stored history
    pub const VIEW_HISTORY: &str = "View history";
    /// Deletes every stored row of the user
    pub const DELETE_HISTORY: &str = "Delete all entries";
    /// Starts a new entry from the main menu
    pub const ADD_ENTRY: &str = "Add entry";
    /// Returns to the feature menu while entering values
    pub const BACK_TO_FEATURES: &str = "Back to feature choice";
    /// Submits the confirmed series for a forecast
    pub const SUBMIT: &str = "Submit";
}

const DECIMAL_EXAMPLE: &str = "20.4 3.0 n 56.11 0.54 .3 0.0 20.4 4 наН .3 0";
const WHOLE_EXAMPLE: &str = "20 3 n 56 0 5 0 20 4 наН 1 0";
const ACTIVITY_EXAMPLE: &str = "7 16 n 4 2 1 1 8 4 наН 15 9";

/// Feature menu button label
#[must_use]
pub const fn feature_label(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Glucose => "Glucose",
        FeatureKind::Insulin => "Insulin",
        FeatureKind::Carbs => "Carbs",
        FeatureKind::HeartRate => "Heart rate",
        FeatureKind::Steps => "Steps",
        FeatureKind::Calories => "Calories",
        FeatureKind::Activity => "Activity",
    }
}

/// Feature whose menu label matches `text`, compared case-insensitively
#[must_use]
pub fn feature_for_label(text: &str) -> Option<FeatureKind> {
    FeatureKind::ALL
        .into_iter()
        .find(|kind| text.eq_ignore_ascii_case(feature_label(*kind)))
}

/// Example series shown for `kind`
///
/// Heart rate shares the whole-number example with steps even though it
/// accepts decimals, matching how users usually report it.
#[must_use]
pub const fn example_line(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Glucose
        | FeatureKind::Insulin
        | FeatureKind::Carbs
        | FeatureKind::Calories => DECIMAL_EXAMPLE,
        FeatureKind::HeartRate | FeatureKind::Steps => WHOLE_EXAMPLE,
        FeatureKind::Activity => ACTIVITY_EXAMPLE,
    }
}

/// Prompt asking for the series of `kind`
#[must_use]
pub fn input_prompt(kind: FeatureKind) -> String {
    let unit = if kind == FeatureKind::Glucose {
        " (mmol/L)"
    } else {
        ""
    };
    format!(
        "Enter {} values{unit} for the last hour at {}-minute intervals ({} values), following the template:\n{}",
        kind.display_name(),
        readings::SAMPLE_INTERVAL_MINUTES,
        readings::SERIES_LEN,
        example_line(kind)
    )
}

/// Retry prompt after a rejected series
#[must_use]
pub fn retry_prompt(kind: FeatureKind) -> String {
    if kind == FeatureKind::Activity {
        format!(
            "Please enter values following the template and the activity list:\n{}",
            example_line(kind)
        )
    } else {
        format!(
            "Please enter values following the template:\n{}",
            example_line(kind)
        )
    }
}

/// Confirmation after a series is accepted
#[must_use]
pub fn saved(kind: FeatureKind) -> String {
    format!("{} values saved.", feature_label(kind))
}

/// Numbered listing of the supported activity types
#[must_use]
pub fn activity_listing(catalog: ActivityCatalog) -> String {
    let lines: Vec<String> = catalog
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| format!("{} - {label}", index + 1))
        .collect();
    format!("Supported activity types:\n{}", lines.join("\n"))
}

/// Forecast announcement with the wall-clock time it refers to
#[must_use]
pub fn forecast(clock: &str, value: f64) -> String {
    format!(
        "Predicted glucose value in one hour (at {clock}): {}",
        formatters::format_glucose(value)
    )
}

/// History message wrapping the monospace table
#[must_use]
pub fn history_message(table: &str) -> String {
    format!("History:\n<code>{table}</code>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_labels_are_unique_and_reversible() {
        for kind in FeatureKind::ALL {
            assert_eq!(feature_for_label(feature_label(kind)), Some(kind));
        }
        assert_eq!(feature_for_label("heart RATE"), Some(FeatureKind::HeartRate));
        assert_eq!(feature_for_label("Heart rate "), None);
        assert_eq!(feature_for_label("pulse"), None);
    }

    #[test]
    fn test_glucose_prompt_carries_unit_and_example() {
        let prompt = input_prompt(FeatureKind::Glucose);
        assert!(prompt.contains("(mmol/L)"));
        assert!(prompt.contains("12 values"));
        assert!(prompt.ends_with(DECIMAL_EXAMPLE));

        let prompt = input_prompt(FeatureKind::Steps);
        assert!(!prompt.contains("mmol"));
        assert!(prompt.ends_with(WHOLE_EXAMPLE));
    }

    #[test]
    fn test_activity_retry_mentions_the_list() {
        assert!(retry_prompt(FeatureKind::Activity).contains("activity list"));
        assert!(!retry_prompt(FeatureKind::Carbs).contains("activity list"));
    }

    #[test]
    fn test_activity_listing_is_numbered() {
        let listing = activity_listing(ActivityCatalog);
        assert!(listing.starts_with("Supported activity types:\n1 - Walk\n2 - Run"));
        assert!(listing.ends_with("19 - Sport"));
    }

    #[test]
    fn test_forecast_rounds_to_two_decimals() {
        assert_eq!(
            forecast("14:03", 5.6),
            "Predicted glucose value in one hour (at 14:03): 5.60"
        );
    }
}
