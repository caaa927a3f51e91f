// ABOUTME: Integration tests for model artifact validation and forecast evaluation
// ABOUTME: Exercises startup rejection of malformed artifacts and hand-computed predictions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Local, TimeZone};
use glucobot::models::{FeatureKind, FeatureRow};
use glucobot::predictor::GlucosePredictor;
use std::collections::HashMap;
use tempfile::TempDir;

#[test]
fn test_artifact_with_reordered_columns_is_rejected() {
    let mut artifact = common::demo_artifact();
    artifact.columns.swap(0, 1);
    assert!(GlucosePredictor::from_artifact(artifact).is_err());
}

#[test]
fn test_artifact_missing_a_weight_is_rejected() {
    let mut artifact = common::demo_artifact();
    artifact.weights.remove("hour");
    assert!(GlucosePredictor::from_artifact(artifact).is_err());
}

#[test]
fn test_artifact_missing_a_fill_value_is_rejected() {
    let mut artifact = common::demo_artifact();
    artifact.fill.remove(common::WEIGHTED_COLUMN);
    assert!(GlucosePredictor::from_artifact(artifact).is_err());
}

#[test]
fn test_artifact_with_foreign_activity_labels_is_rejected() {
    let mut artifact = common::demo_artifact();
    artifact.activity_labels[0] = "Stroll".to_owned();
    assert!(GlucosePredictor::from_artifact(artifact).is_err());
}

#[test]
fn test_artifact_missing_an_activity_weight_is_rejected() {
    let mut artifact = common::demo_artifact();
    artifact.activity_weights.remove("Walk");
    assert!(GlucosePredictor::from_artifact(artifact).is_err());
}

#[test]
fn test_accessors_reflect_the_artifact() {
    let predictor = common::demo_predictor();
    assert_eq!(predictor.name(), "test-linear");
    assert_eq!(predictor.version(), "0.0.1");
}

#[test]
fn test_all_unknown_row_predicts_from_fill_values() {
    let predictor = common::demo_predictor();
    let row = FeatureRow::assemble(1, &Local::now(), HashMap::new());

    let predicted = predictor.predict(&row).unwrap();
    assert!((predicted - (common::INTERCEPT + common::GLUCOSE_FILL)).abs() < 1e-9);
}

#[test]
fn test_known_latest_glucose_drives_the_forecast() {
    let predictor = common::demo_predictor();
    let row = FeatureRow::assemble(1, &Local::now(), common::confirmed_glucose(7.5));

    let predicted = predictor.predict(&row).unwrap();
    assert!((predicted - 8.5).abs() < 1e-9);
}

#[test]
fn test_activity_labels_contribute_their_trained_weight() {
    let mut artifact = common::demo_artifact();
    artifact.weights.insert("activity-0:00".to_owned(), 1.0);
    let predictor = GlucosePredictor::from_artifact(artifact).unwrap();

    let mut confirmed = HashMap::new();
    confirmed.insert(
        FeatureKind::Activity,
        common::series_with_latest_label("Walk"),
    );
    let row = FeatureRow::assemble(1, &Local::now(), confirmed);

    // intercept 1.0 + glucose fill 5.0 + Walk encoding 0.5
    let predicted = predictor.predict(&row).unwrap();
    assert!((predicted - 6.5).abs() < 1e-9);
}

#[test]
fn test_unknown_activity_slots_contribute_nothing() {
    let mut artifact = common::demo_artifact();
    artifact.weights.insert("activity-0:00".to_owned(), 1.0);
    let predictor = GlucosePredictor::from_artifact(artifact).unwrap();

    let row = FeatureRow::assemble(1, &Local::now(), HashMap::new());
    let predicted = predictor.predict(&row).unwrap();
    assert!((predicted - 6.0).abs() < 1e-9);
}

#[test]
fn test_time_of_day_columns_use_the_submission_moment() {
    let mut artifact = common::demo_artifact();
    artifact.weights.insert("hour".to_owned(), 1.0);
    artifact.weights.insert("minute".to_owned(), 1.0);
    let predictor = GlucosePredictor::from_artifact(artifact).unwrap();

    let moment = Local.with_ymd_and_hms(2025, 5, 21, 14, 3, 0).unwrap();
    let row = FeatureRow::assemble(1, &moment, HashMap::new());

    // intercept 1.0 + hour 14 + minute 3 + glucose fill 5.0
    let predicted = predictor.predict(&row).unwrap();
    assert!((predicted - 23.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_load_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    let artifact = common::demo_artifact();
    std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();

    let predictor = GlucosePredictor::load(&path).await.unwrap();
    let row = FeatureRow::assemble(1, &Local::now(), common::confirmed_glucose(7.5));
    assert!((predictor.predict(&row).unwrap() - 8.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_load_fails_for_missing_or_malformed_files() {
    let dir = TempDir::new().unwrap();

    assert!(GlucosePredictor::load(dir.path().join("absent.json"))
        .await
        .is_err());

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(GlucosePredictor::load(&path).await.is_err());
}
