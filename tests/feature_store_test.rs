// ABOUTME: Integration tests for CSV-backed feature row storage
// ABOUTME: Covers table creation, append/rounding, history, purge isolation and reopening
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Local;
use glucobot::store::schema::TableSchema;
use glucobot::store::FeatureStore;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_open_creates_a_header_only_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("database.csv");

    let store = FeatureStore::open(&path).await.unwrap();
    assert_eq!(store.row_count().await, 0);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.trim_end().lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("user_id,date,hour,minute,bg-0:55,"));
    assert!(lines[0].ends_with("bg+1:00,real_bg+1:00"));
}

#[tokio::test]
async fn test_append_rounds_and_persists_the_forecast() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.csv");
    let store = FeatureStore::open(&path).await.unwrap();
    let predictor = common::demo_predictor();

    let moment = Local::now();
    let predicted = store
        .append(7, &moment, common::confirmed_glucose(7.456), &predictor)
        .await
        .unwrap();

    // intercept 1.0 plus the latest glucose reading, rounded to two decimals
    assert!((predicted - 8.46).abs() < 1e-9);
    assert_eq!(store.row_count().await, 1);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.trim_end().lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("7,"));
    // Forecast cell holds the rounded value; the actual cell stays empty.
    assert!(lines[1].ends_with(",8.46,"));
}

#[tokio::test]
async fn test_history_projects_stored_rows() {
    let dir = TempDir::new().unwrap();
    let store = FeatureStore::open(dir.path().join("database.csv"))
        .await
        .unwrap();
    let predictor = common::demo_predictor();

    let moment = Local::now();
    store
        .append(7, &moment, common::confirmed_glucose(7.5), &predictor)
        .await
        .unwrap();

    let entries = store.history(7).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].predicted, "8.50");
    assert!(entries[0].actual.is_none());
    assert_eq!(entries[0].date, moment.format("%d.%m.%Y").to_string());
    assert_eq!(entries[0].time.len(), 5);
    assert_eq!(&entries[0].time[2..3], ":");
}

#[tokio::test]
async fn test_purge_removes_only_the_given_user() {
    let dir = TempDir::new().unwrap();
    let store = FeatureStore::open(dir.path().join("database.csv"))
        .await
        .unwrap();
    let predictor = common::demo_predictor();
    let moment = Local::now();

    for _ in 0..2 {
        store
            .append(1, &moment, common::confirmed_glucose(5.0), &predictor)
            .await
            .unwrap();
    }
    store
        .append(2, &moment, common::confirmed_glucose(6.0), &predictor)
        .await
        .unwrap();

    assert_eq!(store.purge(1).await.unwrap(), 2);
    assert!(store.history(1).await.unwrap().is_empty());
    assert_eq!(store.history(2).await.unwrap().len(), 1);
    assert_eq!(store.row_count().await, 1);

    // Purging again is a no-op.
    assert_eq!(store.purge(1).await.unwrap(), 0);
}

#[tokio::test]
async fn test_reopening_reads_existing_rows_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.csv");
    let predictor = common::demo_predictor();
    let moment = Local::now();

    {
        let store = FeatureStore::open(&path).await.unwrap();
        store
            .append(7, &moment, common::confirmed_glucose(7.5), &predictor)
            .await
            .unwrap();
    }

    let reopened = FeatureStore::open(&path).await.unwrap();
    assert_eq!(reopened.row_count().await, 1);
    let entries = reopened.history(7).await.unwrap();
    assert_eq!(entries[0].predicted, "8.50");
}

#[tokio::test]
async fn test_open_rejects_a_foreign_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.csv");
    fs::write(&path, "foo,bar\n1,2\n").unwrap();

    let result = FeatureStore::open(&path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_open_rejects_rows_with_missing_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.csv");

    let header = TableSchema::new().columns().join(",");
    fs::write(&path, format!("{header}\n7,01.01.2025,10,30\n")).unwrap();

    let result = FeatureStore::open(&path).await;
    assert!(result.is_err());
}
