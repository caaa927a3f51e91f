// ABOUTME: Shared test utilities and builders for integration tests
// ABOUTME: Provides a hand-checkable model artifact, series builders and a wired controller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::must_use_candidate,
    clippy::missing_panics_doc
)]
#![allow(missing_docs)]

//! Shared helpers for glucobot integration tests
//!
//! The demo artifact puts all its weight on the latest glucose reading so
//! expected forecasts stay easy to compute by hand.

use glucobot::catalog::ActivityCatalog;
use glucobot::constants::readings;
use glucobot::dialogue::DialogueController;
use glucobot::models::{FeatureKind, Reading, ReadingSeries, ValueKind};
use glucobot::predictor::{GlucosePredictor, ModelArtifact};
use glucobot::session::{SessionConfig, SessionStore};
use glucobot::store::schema::TableSchema;
use glucobot::store::FeatureStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Column carrying the only non-zero weight in the demo artifact
pub const WEIGHTED_COLUMN: &str = "bg-0:00";

/// Fill value for unknown glucose readings in the demo artifact
pub const GLUCOSE_FILL: f64 = 5.0;

/// Intercept of the demo artifact
pub const INTERCEPT: f64 = 1.0;

/// Artifact with intercept 1.0, weight 1.0 on the latest glucose reading and
/// zero everywhere else; Walk is the only activity with a non-zero encoding.
pub fn demo_artifact() -> ModelArtifact {
    let schema = TableSchema::new();
    let columns = schema.model_columns();

    let mut weights = HashMap::new();
    let mut fill = HashMap::new();
    for (index, column) in columns.iter().enumerate() {
        let weight = if column == WEIGHTED_COLUMN { 1.0 } else { 0.0 };
        weights.insert(column.clone(), weight);

        if let Some(kind) = reading_kind(index) {
            if kind.value_kind() != ValueKind::Label {
                let fill_value = if kind == FeatureKind::Glucose {
                    GLUCOSE_FILL
                } else {
                    0.0
                };
                fill.insert(column.clone(), fill_value);
            }
        }
    }

    let catalog = ActivityCatalog;
    let activity_labels: Vec<String> = catalog
        .labels()
        .iter()
        .map(|label| (*label).to_owned())
        .collect();
    let mut activity_weights = HashMap::new();
    for label in catalog.labels() {
        let weight = if *label == "Walk" { 0.5 } else { 0.0 };
        activity_weights.insert((*label).to_owned(), weight);
    }

    ModelArtifact {
        name: "test-linear".to_owned(),
        version: "0.0.1".to_owned(),
        intercept: INTERCEPT,
        columns,
        weights,
        fill,
        activity_labels,
        activity_weights,
    }
}

/// Feature behind a model column index; the first three columns are scalars
fn reading_kind(index: usize) -> Option<FeatureKind> {
    index
        .checked_sub(3)
        .map(|reading_index| FeatureKind::ALL[reading_index / readings::SERIES_LEN])
}

pub fn demo_predictor() -> GlucosePredictor {
    GlucosePredictor::from_artifact(demo_artifact()).unwrap()
}

/// Series with every slot unknown except the newest, which holds `value`
pub fn series_with_latest(value: f64) -> ReadingSeries {
    let mut values = vec![Reading::Unknown; readings::SERIES_LEN - 1];
    values.push(Reading::Value(value));
    ReadingSeries::new(values).unwrap()
}

/// Series with every slot unknown except the newest, which holds `label`
pub fn series_with_latest_label(label: &str) -> ReadingSeries {
    let mut values = vec![Reading::Unknown; readings::SERIES_LEN - 1];
    values.push(Reading::Label(label.to_owned()));
    ReadingSeries::new(values).unwrap()
}

/// Confirmed-series map holding a single glucose series
pub fn confirmed_glucose(latest: f64) -> HashMap<FeatureKind, ReadingSeries> {
    let mut confirmed = HashMap::new();
    confirmed.insert(FeatureKind::Glucose, series_with_latest(latest));
    confirmed
}

/// Session config without the background sweep, for deterministic tests
pub fn session_config() -> SessionConfig {
    SessionConfig {
        capacity: 64,
        ttl: Duration::from_secs(60),
        cleanup_interval: Duration::from_secs(60),
        enable_background_cleanup: false,
    }
}

/// Controller backed by a temp-dir store and the demo artifact
///
/// The returned directory keeps the table file alive for the test's duration.
pub async fn controller_with_temp_store() -> (DialogueController, FeatureStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = FeatureStore::open(dir.path().join("database.csv"))
        .await
        .unwrap();
    let sessions = SessionStore::new(&session_config());
    let predictor = Arc::new(demo_predictor());
    let controller = DialogueController::new(sessions, store.clone(), predictor);
    (controller, store, dir)
}
