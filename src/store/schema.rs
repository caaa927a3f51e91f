// ABOUTME: Column layout of the persisted feature table
// ABOUTME: Builds the 90-column header and encodes assembled rows into CSV fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Feature table schema
//!
//! The table starts with identity and timestamp columns, then carries twelve
//! reading columns per feature named `<prefix>-0:55` down to `<prefix>-0:00`,
//! and ends with the forecast column `bg+1:00` and the later-reported
//! `real_bg+1:00`. Unknown readings are stored as empty cells. The model
//! consumes every column except the date and the two trailing glucose
//! columns.

use crate::constants::readings;
use crate::errors::{AppError, AppResult};
use crate::formatters;
use crate::models::{FeatureKind, FeatureRow, Reading};

/// Name of the forecast column
pub const PREDICTED_COLUMN: &str = "bg+1:00";
/// Name of the later-reported actual glucose column
pub const ACTUAL_COLUMN: &str = "real_bg+1:00";

/// Column layout of the feature table
#[derive(Debug, Clone)]
pub struct TableSchema {
    columns: Vec<String>,
}

impl TableSchema {
    /// Index of the user id column
    pub const USER_ID_INDEX: usize = 0;
    /// Index of the date column
    pub const DATE_INDEX: usize = 1;
    /// Index of the hour column
    pub const HOUR_INDEX: usize = 2;
    /// Index of the minute column
    pub const MINUTE_INDEX: usize = 3;
    /// Index of the first reading column
    pub const FIRST_READING_INDEX: usize = 4;

    /// Build the canonical column layout
    #[must_use]
    pub fn new() -> Self {
        let mut columns = Vec::with_capacity(
            Self::FIRST_READING_INDEX + FeatureKind::ALL.len() * readings::SERIES_LEN + 2,
        );
        columns.push("user_id".to_owned());
        columns.push("date".to_owned());
        columns.push("hour".to_owned());
        columns.push("minute".to_owned());
        for kind in FeatureKind::ALL {
            for slot in 0..readings::SERIES_LEN {
                columns.push(format!("{}-{}", kind.column_prefix(), offset_label(slot)));
            }
        }
        columns.push(PREDICTED_COLUMN.to_owned());
        columns.push(ACTUAL_COLUMN.to_owned());
        Self { columns }
    }

    /// All column names in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Total number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the forecast column
    #[must_use]
    pub fn predicted_index(&self) -> usize {
        self.columns.len() - 2
    }

    /// Index of the actual-value column
    #[must_use]
    pub fn actual_index(&self) -> usize {
        self.columns.len() - 1
    }

    /// Column names the model consumes, in order
    ///
    /// Everything except the date and the two trailing glucose columns; the
    /// user id, hour and minute are model inputs.
    #[must_use]
    pub fn model_columns(&self) -> Vec<String> {
        let predicted = self.predicted_index();
        self.columns
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != Self::DATE_INDEX && *index < predicted)
            .map(|(_, column)| column.clone())
            .collect()
    }

    /// Check a stored header against this layout
    ///
    /// # Errors
    ///
    /// Returns a schema mismatch error naming the first offending column.
    pub fn validate_header<'a, I>(&self, fields: I) -> AppResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() != self.columns.len() {
            return Err(AppError::schema_mismatch(format!(
                "expected {} columns, found {}",
                self.columns.len(),
                fields.len()
            )));
        }
        for (expected, found) in self.columns.iter().zip(&fields) {
            if expected.as_str() != *found {
                return Err(AppError::schema_mismatch(format!(
                    "expected column {expected:?}, found {found:?}"
                )));
            }
        }
        Ok(())
    }

    /// Encode one assembled row into CSV fields in column order
    #[must_use]
    pub fn encode_row(&self, row: &FeatureRow) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.columns.len());
        fields.push(row.user_id.to_string());
        fields.push(row.date.clone());
        fields.push(row.hour.to_string());
        fields.push(row.minute.to_string());
        for kind in FeatureKind::ALL {
            for reading in row.series(kind).iter() {
                fields.push(encode_reading(reading));
            }
        }
        fields.push(
            row.predicted
                .map_or_else(String::new, formatters::format_glucose),
        );
        fields.push(
            row.actual
                .map_or_else(String::new, formatters::format_glucose),
        );
        fields
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Minute-offset suffix for a reading slot, slot 0 being the oldest
///
/// Slot 0 maps to `0:55`, the final slot to `0:00`.
#[must_use]
pub fn offset_label(slot: usize) -> String {
    let step = readings::SAMPLE_INTERVAL_MINUTES as usize;
    let minutes = (readings::SERIES_LEN - 1 - slot) * step;
    format!("0:{minutes:02}")
}

fn encode_reading(reading: &Reading) -> String {
    match reading {
        Reading::Value(value) => value.to_string(),
        Reading::Count(count) => count.to_string(),
        Reading::Label(label) => label.clone(),
        Reading::Unknown => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::collections::HashMap;

    #[test]
    fn test_layout_shape() {
        let schema = TableSchema::new();
        assert_eq!(schema.column_count(), 90);
        assert_eq!(schema.columns()[0], "user_id");
        assert_eq!(schema.columns()[TableSchema::FIRST_READING_INDEX], "bg-0:55");
        assert_eq!(schema.columns()[15], "bg-0:00");
        assert_eq!(schema.columns()[16], "insulin-0:55");
        assert_eq!(schema.columns()[87], "activity-0:00");
        assert_eq!(schema.columns()[schema.predicted_index()], "bg+1:00");
        assert_eq!(schema.columns()[schema.actual_index()], "real_bg+1:00");
    }

    #[test]
    fn test_offset_labels_are_zero_padded() {
        assert_eq!(offset_label(0), "0:55");
        assert_eq!(offset_label(10), "0:05");
        assert_eq!(offset_label(11), "0:00");
    }

    #[test]
    fn test_model_columns_drop_date_and_targets() {
        let schema = TableSchema::new();
        let model_columns = schema.model_columns();
        assert_eq!(model_columns.len(), 87);
        assert_eq!(model_columns[0], "user_id");
        assert_eq!(model_columns[1], "hour");
        assert_eq!(model_columns[2], "minute");
        assert!(!model_columns.contains(&"date".to_owned()));
        assert!(!model_columns.contains(&PREDICTED_COLUMN.to_owned()));
        assert!(!model_columns.contains(&ACTUAL_COLUMN.to_owned()));
    }

    #[test]
    fn test_unknowns_encode_as_empty_cells() {
        let schema = TableSchema::new();
        let row = FeatureRow::assemble(1, &Local::now(), HashMap::new());
        let fields = schema.encode_row(&row);

        assert_eq!(fields.len(), 90);
        assert_eq!(fields[0], "1");
        for field in &fields[TableSchema::FIRST_READING_INDEX..schema.predicted_index()] {
            assert!(field.is_empty());
        }
        assert!(fields[schema.predicted_index()].is_empty());
    }

    #[test]
    fn test_validate_header_catches_drift() {
        let schema = TableSchema::new();
        let mut header: Vec<String> = schema.columns().to_vec();
        assert!(schema
            .validate_header(header.iter().map(String::as_str))
            .is_ok());

        header[4] = "bg-0:5".to_owned();
        assert!(schema
            .validate_header(header.iter().map(String::as_str))
            .is_err());
    }
}
