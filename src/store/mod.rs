// ABOUTME: Append-only CSV persistence for assembled feature rows
// ABOUTME: Owns the table file, an in-memory row mirror and atomic rewrites
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Feature row storage
//!
//! The store keeps the whole table in memory and mirrors every mutation to
//! disk by rewriting the file through a temporary sibling followed by a
//! rename. A missing or empty file is initialized with the header row; an
//! existing file must match the schema exactly before the store accepts it.

pub mod schema;

use self::schema::TableSchema;
use crate::errors::{AppError, AppResult};
use crate::models::{FeatureKind, FeatureRow, HistoryEntry, ReadingSeries};
use crate::predictor::GlucosePredictor;
use chrono::{DateTime, Local};
use csv_async::{AsyncReader, AsyncWriter};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Persistent table of submitted feature rows
#[derive(Clone)]
pub struct FeatureStore {
    path: PathBuf,
    schema: TableSchema,
    rows: Arc<RwLock<Vec<Vec<String>>>>,
}

impl FeatureStore {
    /// Open the table at `path`, creating it when missing
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or written, or when an
    /// existing file does not match the expected column layout.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::storage(format!(
                        "failed to create data directory {}",
                        parent.display()
                    ))
                    .with_source(e)
                })?;
            }
        }

        let store = Self {
            path,
            schema: TableSchema::new(),
            rows: Arc::new(RwLock::new(Vec::new())),
        };

        let fresh = match tokio::fs::metadata(&store.path).await {
            Ok(metadata) => metadata.len() == 0,
            Err(error) if error.kind() == ErrorKind::NotFound => true,
            Err(error) => {
                return Err(AppError::storage(format!(
                    "failed to inspect feature table at {}",
                    store.path.display()
                ))
                .with_source(error));
            }
        };

        if fresh {
            store.rewrite(&[]).await?;
            info!(path = %store.path.display(), "Initialized empty feature table");
        } else {
            let rows = store.load_rows().await?;
            info!(
                path = %store.path.display(),
                rows = rows.len(),
                "Opened feature table"
            );
            *store.rows.write().await = rows;
        }

        Ok(store)
    }

    /// Forecast, append and persist one entry
    ///
    /// Assembles the row from the confirmed series, runs the predictor, and
    /// stores the row with the forecast rounded to two decimal places. The
    /// rounded forecast is returned. When the rewrite fails the in-memory
    /// table is rolled back and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error when prediction or the file rewrite fails.
    #[allow(clippy::implicit_hasher)]
    pub async fn append(
        &self,
        user_id: i64,
        moment: &DateTime<Local>,
        confirmed: HashMap<FeatureKind, ReadingSeries>,
        predictor: &GlucosePredictor,
    ) -> AppResult<f64> {
        let mut row = FeatureRow::assemble(user_id, moment, confirmed);
        let predicted = round_to_hundredths(predictor.predict(&row)?);
        row.predicted = Some(predicted);
        let encoded = self.schema.encode_row(&row);

        let mut rows = self.rows.write().await;
        rows.push(encoded);
        if let Err(error) = self.rewrite(&rows).await {
            rows.pop();
            return Err(error);
        }
        debug!(user_id, predicted, rows = rows.len(), "Appended feature row");
        drop(rows);

        Ok(predicted)
    }

    /// Delete every row belonging to `user_id`, returning how many went away
    ///
    /// # Errors
    ///
    /// Returns an error when the file rewrite fails; the in-memory table is
    /// left untouched in that case.
    pub async fn purge(&self, user_id: i64) -> AppResult<usize> {
        let user_cell = user_id.to_string();
        let mut rows = self.rows.write().await;
        let retained: Vec<Vec<String>> = rows
            .iter()
            .filter(|row| row.first().is_some_and(|cell| *cell != user_cell))
            .cloned()
            .collect();
        let removed = rows.len() - retained.len();
        if removed == 0 {
            return Ok(0);
        }

        self.rewrite(&retained).await?;
        *rows = retained;
        drop(rows);

        info!(user_id, removed, "Purged user history");
        Ok(removed)
    }

    /// History entries for `user_id`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error when a stored row carries a non-numeric hour or
    /// minute cell.
    pub async fn history(&self, user_id: i64) -> AppResult<Vec<HistoryEntry>> {
        let user_cell = user_id.to_string();
        let rows = self.rows.read().await;
        let mut entries = Vec::new();
        for row in rows
            .iter()
            .filter(|row| row.first().is_some_and(|cell| *cell == user_cell))
        {
            entries.push(self.history_entry(row)?);
        }
        drop(rows);
        Ok(entries)
    }

    /// Number of stored rows across all users
    #[must_use]
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    fn history_entry(&self, row: &[String]) -> AppResult<HistoryEntry> {
        let cell = |index: usize| row.get(index).map_or("", String::as_str);

        let hour: u32 = cell(TableSchema::HOUR_INDEX).parse().map_err(|e| {
            AppError::storage("feature table has a non-numeric hour cell").with_source(e)
        })?;
        let minute: u32 = cell(TableSchema::MINUTE_INDEX).parse().map_err(|e| {
            AppError::storage("feature table has a non-numeric minute cell").with_source(e)
        })?;

        let actual_cell = cell(self.schema.actual_index());
        Ok(HistoryEntry {
            date: cell(TableSchema::DATE_INDEX).to_owned(),
            time: format!("{hour:02}:{minute:02}"),
            predicted: cell(self.schema.predicted_index()).to_owned(),
            actual: (!actual_cell.is_empty()).then(|| actual_cell.to_owned()),
        })
    }

    async fn load_rows(&self) -> AppResult<Vec<Vec<String>>> {
        let file = File::open(&self.path).await.map_err(|e| {
            AppError::storage(format!(
                "failed to open feature table at {}",
                self.path.display()
            ))
            .with_source(e)
        })?;
        let mut reader = AsyncReader::from_reader(file);

        let headers = reader.headers().await.map_err(|e| {
            AppError::storage("failed to read the feature table header").with_source(e)
        })?;
        self.schema.validate_header(headers.iter())?;

        let mut rows = Vec::new();
        let mut records = reader.records();
        while let Some(record) = records.next().await {
            let record = record.map_err(|e| {
                AppError::storage("failed to read a feature table record").with_source(e)
            })?;
            if record.len() != self.schema.column_count() {
                return Err(AppError::schema_mismatch(format!(
                    "row {} has {} cells, expected {}",
                    rows.len() + 1,
                    record.len(),
                    self.schema.column_count()
                )));
            }
            rows.push(record.iter().map(ToOwned::to_owned).collect());
        }
        Ok(rows)
    }

    /// Write the header and `rows` to a temporary sibling, then rename it
    /// over the table file
    async fn rewrite(&self, rows: &[Vec<String>]) -> AppResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let file = File::create(&tmp).await.map_err(|e| {
            AppError::storage(format!("failed to create {}", tmp.display())).with_source(e)
        })?;
        let mut writer = AsyncWriter::from_writer(file);

        writer.write_record(self.schema.columns()).await.map_err(|e| {
            AppError::storage("failed to write the feature table header").with_source(e)
        })?;
        for row in rows {
            writer.write_record(row).await.map_err(|e| {
                AppError::storage("failed to write a feature table row").with_source(e)
            })?;
        }
        writer.flush().await.map_err(|e| {
            AppError::storage("failed to flush the feature table").with_source(e)
        })?;
        drop(writer);

        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::storage(format!(
                "failed to move {} into place",
                tmp.display()
            ))
            .with_source(e)
        })?;
        Ok(())
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
