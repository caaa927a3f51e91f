// ABOUTME: Validation and casting of raw reading-series input into typed readings
// ABOUTME: Splits on whitespace, resolves unknown-value sentinels and casts per feature kind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Feature input validation
//!
//! Raw message text is split on runs of whitespace and must yield exactly one
//! token per five-minute slot. Sentinel tokens become unknown readings before
//! any casting happens, so `nan` never reaches the number parser. A single
//! bad token rejects the whole series; nothing is kept from a failed attempt.

use crate::catalog::ActivityCatalog;
use crate::constants::{readings, sentinels};
use crate::errors::{AppError, AppResult};
use crate::models::{Reading, ReadingSeries, ValueKind};
use regex::Regex;
use std::sync::LazyLock;

/// Splits input on runs of whitespace, keeping boundary empty tokens
///
/// A leading or trailing separator therefore produces an extra empty token,
/// which fails the count check instead of being silently dropped.
static TOKEN_SPLIT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Whether a token marks a reading as unknown
///
/// Comparison is case-insensitive and covers both Latin and Cyrillic forms.
#[must_use]
pub fn is_missing_token(token: &str) -> bool {
    let lowered = token.to_lowercase();
    sentinels::MISSING_VALUE_TOKENS
        .iter()
        .any(|sentinel| lowered == *sentinel)
}

/// Parse one submitted message into a reading series
///
/// # Errors
///
/// Returns an error when the token count differs from the series length or
/// when any token is neither a sentinel nor castable to the feature's kind.
pub fn parse_series(
    input: &str,
    kind: ValueKind,
    catalog: ActivityCatalog,
) -> AppResult<ReadingSeries> {
    let Some(splitter) = TOKEN_SPLIT.as_ref() else {
        return Err(AppError::internal("token split pattern failed to compile"));
    };

    let tokens: Vec<&str> = splitter.split(input).collect();
    if tokens.len() != readings::SERIES_LEN {
        return Err(AppError::invalid_input(format!(
            "expected {} readings, got {}",
            readings::SERIES_LEN,
            tokens.len()
        )));
    }

    let mut values = Vec::with_capacity(readings::SERIES_LEN);
    for token in tokens {
        values.push(parse_reading(token, kind, catalog)?);
    }
    ReadingSeries::new(values)
}

/// Cast one token according to the feature's value kind
fn parse_reading(token: &str, kind: ValueKind, catalog: ActivityCatalog) -> AppResult<Reading> {
    if is_missing_token(token) {
        return Ok(Reading::Unknown);
    }

    match kind {
        ValueKind::Decimal => token
            .parse::<f64>()
            .map(Reading::Value)
            .map_err(|_| AppError::invalid_input(format!("not a decimal reading: {token:?}"))),
        ValueKind::Integer => token
            .parse::<i64>()
            .map(Reading::Count)
            .map_err(|_| AppError::invalid_input(format!("not a whole-number reading: {token:?}"))),
        ValueKind::Label => parse_label(token, catalog),
    }
}

/// Resolve a 1-based activity index token to its catalog label
fn parse_label(token: &str, catalog: ActivityCatalog) -> AppResult<Reading> {
    let index = token
        .parse::<i64>()
        .map_err(|_| AppError::invalid_input(format!("not an activity index: {token:?}")))?;

    usize::try_from(index)
        .ok()
        .and_then(|index| catalog.label_at(index))
        .map(|label| Reading::Label(label.to_owned()))
        .ok_or_else(|| {
            AppError::value_out_of_range(format!(
                "activity index {index} outside 1..={}",
                ActivityCatalog::LEN
            ))
        })
}
