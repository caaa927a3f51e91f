// ABOUTME: Plain-text formatting helpers for chat display
// ABOUTME: Renders glucose values, forecast clock times and the aligned history table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Output formatting
//!
//! Everything the bot prints beyond template text lives here: the two-decimal
//! glucose rendering shared by storage and chat, the forecast clock time, and
//! the monospace history table.

use crate::constants::{formats, readings};
use crate::models::HistoryEntry;
use chrono::{DateTime, Duration, Local};

/// Column headers of the history table
pub const HISTORY_HEADERS: [&str; 4] = ["Date", "Time", "Pred", "Real"];

/// Cell shown when a row has no later-reported actual value
const MISSING_ACTUAL: &str = "-";

/// Render a glucose value with two decimal places
///
/// Used both for the stored forecast cell and for chat display, so the two
/// never drift apart.
#[must_use]
pub fn format_glucose(value: f64) -> String {
    format!("{value:.2}")
}

/// Clock time the forecast refers to: submission time plus the horizon
#[must_use]
pub fn forecast_clock(moment: &DateTime<Local>) -> String {
    (*moment + Duration::minutes(readings::FORECAST_HORIZON_MINUTES))
        .format(formats::TIME_FORMAT)
        .to_string()
}

/// Render history entries as an aligned plain-text table
///
/// Columns are left-aligned and separated by two spaces; with no entries only
/// the header row remains.
#[must_use]
pub fn history_table(entries: &[HistoryEntry]) -> String {
    let mut rows: Vec<[String; 4]> = Vec::with_capacity(entries.len() + 1);
    rows.push(HISTORY_HEADERS.map(str::to_owned));
    for entry in entries {
        rows.push([
            entry.date.clone(),
            entry.time.clone(),
            entry.predicted.clone(),
            entry.actual.as_deref().unwrap_or(MISSING_ACTUAL).to_owned(),
        ]);
    }

    let mut widths = [0_usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut line = String::new();
        for (index, (cell, width)) in row.iter().zip(&widths).enumerate() {
            if index > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            // Last column stays unpadded so lines carry no trailing spaces
            if index + 1 < row.len() {
                for _ in cell.chars().count()..*width {
                    line.push(' ');
                }
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}
