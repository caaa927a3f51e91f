// ABOUTME: Core data models for tracked features, reading series and dialogue state
// ABOUTME: Defines FeatureKind, Reading, ReadingSeries, ChatState, FeatureRow and HistoryEntry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! # Data Models
//!
//! This module contains the core data structures shared by the dialogue,
//! storage and prediction layers.
//!
//! ## Design Principles
//!
//! - **Shape Safe**: A `ReadingSeries` always holds exactly one reading per
//!   five-minute slot of the observation window
//! - **Kind Aware**: Each tracked feature declares how its raw tokens are cast
//! - **Storage Aligned**: Feature ordering here is the column ordering of the
//!   persisted table
//!
//! ## Core Models
//!
//! - `FeatureKind`: Enumeration of the seven tracked features
//! - `Reading`: A single five-minute observation, possibly unknown
//! - `ReadingSeries`: A full hour of readings for one feature
//! - `ChatState`: Position of a user inside the guided dialogue
//! - `FeatureRow`: One assembled table row ready for prediction and storage
//! - `HistoryEntry`: Projection of a stored row for history display

use crate::constants::{formats, readings};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, Timelike};
use std::collections::HashMap;
use std::fmt;

/// Enumeration of the tracked health features
///
/// The declaration order is load-bearing: it matches the column layout of the
/// persisted feature table and the input layout of the regression model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Blood glucose level in mmol/L
    Glucose,
    /// Administered insulin
    Insulin,
    /// Consumed carbohydrates
    Carbs,
    /// Heart rate
    HeartRate,
    /// Step count
    Steps,
    /// Burned calories
    Calories,
    /// Physical activity type
    Activity,
}

impl FeatureKind {
    /// All features in storage column order
    pub const ALL: [Self; 7] = [
        Self::Glucose,
        Self::Insulin,
        Self::Carbs,
        Self::HeartRate,
        Self::Steps,
        Self::Calories,
        Self::Activity,
    ];

    /// Position of this feature inside [`Self::ALL`]
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Glucose => 0,
            Self::Insulin => 1,
            Self::Carbs => 2,
            Self::HeartRate => 3,
            Self::Steps => 4,
            Self::Calories => 5,
            Self::Activity => 6,
        }
    }

    /// Column name prefix used by the feature table and the model artifact
    #[must_use]
    pub const fn column_prefix(self) -> &'static str {
        match self {
            Self::Glucose => "bg",
            Self::Insulin => "insulin",
            Self::Carbs => "carbs",
            Self::HeartRate => "hr",
            Self::Steps => "steps",
            Self::Calories => "cals",
            Self::Activity => "activity",
        }
    }

    /// How raw input tokens for this feature are cast
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Glucose | Self::Insulin | Self::Carbs | Self::HeartRate | Self::Calories => {
                ValueKind::Decimal
            }
            Self::Steps => ValueKind::Integer,
            Self::Activity => ValueKind::Label,
        }
    }

    /// Lowercase name used inside prompt sentences
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Glucose => "glucose",
            Self::Insulin => "insulin",
            Self::Carbs => "carbohydrate",
            Self::HeartRate => "heart rate",
            Self::Steps => "step",
            Self::Calories => "calorie",
            Self::Activity => "activity",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How raw tokens of a feature are cast during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Decimal number (accepts `.3`, `0.0`, `4`)
    Decimal,
    /// Whole number
    Integer,
    /// 1-based index into the activity catalog, stored as its label
    Label,
}

/// A single five-minute observation
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Known decimal measurement
    Value(f64),
    /// Known whole-number measurement
    Count(i64),
    /// Known activity label
    Label(String),
    /// Explicitly unknown measurement
    Unknown,
}

impl Reading {
    /// Whether this reading carries no known value
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// One hour of readings for a single feature, oldest first
///
/// The first slot is the reading taken 55 minutes ago, the last slot the
/// reading taken at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSeries(Vec<Reading>);

impl ReadingSeries {
    /// Build a series from individual readings
    ///
    /// # Errors
    ///
    /// Returns an error when the number of readings differs from the
    /// observation window length.
    pub fn new(values: Vec<Reading>) -> AppResult<Self> {
        if values.len() == readings::SERIES_LEN {
            Ok(Self(values))
        } else {
            Err(AppError::invalid_input(format!(
                "expected {} readings, got {}",
                readings::SERIES_LEN,
                values.len()
            )))
        }
    }

    /// A series with every slot unknown
    #[must_use]
    pub fn unknown() -> Self {
        Self(vec![Reading::Unknown; readings::SERIES_LEN])
    }

    /// Reading at the given slot, slot 0 being the oldest
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Reading> {
        self.0.get(slot)
    }

    /// Iterate over readings, oldest first
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.0.iter()
    }

    /// Number of readings in the series
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series holds no readings
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReadingSeries {
    fn default() -> Self {
        Self::unknown()
    }
}

impl<'a> IntoIterator for &'a ReadingSeries {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Position of a user inside the guided dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    /// No entry in progress
    #[default]
    Idle,
    /// Picking which feature to enter next
    ChoosingFeature,
    /// Entering a reading series for one feature
    Inputting(FeatureKind),
}

/// One assembled feature table row
///
/// Holds a complete set of series: features the user never confirmed are
/// filled with unknown readings during assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Telegram user the row belongs to
    pub user_id: i64,
    /// Entry date formatted as day.month.year
    pub date: String,
    /// Hour of submission
    pub hour: u32,
    /// Minute of submission
    pub minute: u32,
    /// One series per tracked feature, in column order
    series: [ReadingSeries; 7],
    /// Forecast produced for this row, once available
    pub predicted: Option<f64>,
    /// Later-reported actual glucose value, once available
    pub actual: Option<f64>,
}

impl FeatureRow {
    /// Assemble a row from the series a user confirmed during one entry
    ///
    /// Features without a confirmed series get a fully unknown one.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn assemble(
        user_id: i64,
        moment: &DateTime<Local>,
        mut confirmed: HashMap<FeatureKind, ReadingSeries>,
    ) -> Self {
        let series = FeatureKind::ALL.map(|kind| confirmed.remove(&kind).unwrap_or_default());
        Self {
            user_id,
            date: moment.format(formats::DATE_FORMAT).to_string(),
            hour: moment.hour(),
            minute: moment.minute(),
            series,
            predicted: None,
            actual: None,
        }
    }

    /// The series stored for one feature
    #[must_use]
    pub fn series(&self, kind: FeatureKind) -> &ReadingSeries {
        &self.series[kind.position()]
    }
}

/// Projection of one stored row for history display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Entry date as stored, day.month.year
    pub date: String,
    /// Entry time rendered as hour:minute
    pub time: String,
    /// Stored forecast cell, verbatim
    pub predicted: String,
    /// Stored actual-value cell, when present
    pub actual: Option<String>,
}
