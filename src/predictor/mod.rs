// ABOUTME: Pre-trained linear model artifact loading, validation and evaluation
// ABOUTME: Produces the one-hour-ahead glucose forecast for an assembled feature row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Glucose predictor
//!
//! The model ships as a JSON artifact: an intercept, one weight per input
//! column, fill values for unknown numeric readings and a weight per activity
//! label. The artifact is validated against the table schema and the activity
//! catalog at startup, so prediction itself never meets an unexpected column.
//!
//! Evaluation is a single weighted sum. Unknown numeric readings take the
//! column's fill value; unknown activities contribute zero.

use crate::catalog::ActivityCatalog;
use crate::constants::readings::SERIES_LEN;
use crate::errors::{AppError, AppResult};
use crate::models::{FeatureKind, FeatureRow, Reading, ValueKind};
use crate::store::schema::TableSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// On-disk representation of the trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Human-readable model name
    pub name: String,
    /// Model version string
    pub version: String,
    /// Regression intercept
    pub intercept: f64,
    /// Input column names, in the exact order the model was trained on
    pub columns: Vec<String>,
    /// Weight per input column
    pub weights: HashMap<String, f64>,
    /// Value substituted for unknown readings, per numeric reading column
    pub fill: HashMap<String, f64>,
    /// Activity labels the model was trained on, in catalog order
    pub activity_labels: Vec<String>,
    /// Numeric encoding per activity label
    pub activity_weights: HashMap<String, f64>,
}

/// Where one model input column takes its value from
#[derive(Debug, Clone, Copy)]
enum ColumnSource {
    UserId,
    Hour,
    Minute,
    Reading { kind: FeatureKind, slot: usize },
}

/// Fully resolved evaluation step for one input column
#[derive(Debug, Clone)]
struct ColumnPlan {
    column: String,
    weight: f64,
    fill: Option<f64>,
    source: ColumnSource,
}

/// Evaluator for the pre-trained regression model
pub struct GlucosePredictor {
    artifact: ModelArtifact,
    plan: Vec<ColumnPlan>,
}

impl GlucosePredictor {
    /// Load and validate a model artifact from disk
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed, or fails
    /// validation against the table schema and activity catalog.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::model(format!(
                "failed to read model artifact from {}",
                path.display()
            ))
            .with_source(e)
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .map_err(|e| AppError::model_invalid("failed to parse model artifact").with_source(e))?;
        Self::from_artifact(artifact)
    }

    /// Validate an artifact and build the evaluation plan
    ///
    /// # Errors
    ///
    /// Returns an error when the artifact's columns disagree with the table
    /// schema, a weight or fill value is missing, or the activity labels do
    /// not match the catalog.
    pub fn from_artifact(artifact: ModelArtifact) -> AppResult<Self> {
        let schema = TableSchema::new();
        let expected = schema.model_columns();
        if artifact.columns != expected {
            return Err(AppError::model_invalid(format!(
                "artifact columns do not match the table schema: expected {} columns starting with {:?}",
                expected.len(),
                expected.first()
            )));
        }

        let catalog = ActivityCatalog;
        if artifact.activity_labels != catalog.labels() {
            return Err(AppError::model_invalid(
                "artifact activity labels do not match the supported catalog",
            ));
        }
        for label in catalog.labels() {
            if !artifact.activity_weights.contains_key(*label) {
                return Err(AppError::model_invalid(format!(
                    "artifact is missing an activity weight for {label:?}"
                )));
            }
        }

        let plan = Self::build_plan(&artifact)?;

        info!(
            model.name = %artifact.name,
            model.version = %artifact.version,
            model.columns = plan.len(),
            "Model artifact validated"
        );

        Ok(Self { artifact, plan })
    }

    /// Model name as recorded in the artifact
    #[must_use]
    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    /// Model version as recorded in the artifact
    #[must_use]
    pub fn version(&self) -> &str {
        &self.artifact.version
    }

    /// Evaluate the model for one assembled row
    ///
    /// # Errors
    ///
    /// Returns an error when the row's readings disagree with their feature
    /// kinds or an activity label falls outside the trained domain.
    pub fn predict(&self, row: &FeatureRow) -> AppResult<f64> {
        let mut total = self.artifact.intercept;
        for plan in &self.plan {
            total += plan.weight * self.column_value(plan, row)?;
        }
        Ok(total)
    }

    fn build_plan(artifact: &ModelArtifact) -> AppResult<Vec<ColumnPlan>> {
        let mut plan = Vec::with_capacity(artifact.columns.len());
        for (index, column) in artifact.columns.iter().enumerate() {
            let weight = *artifact.weights.get(column).ok_or_else(|| {
                AppError::model_invalid(format!("artifact is missing a weight for {column:?}"))
            })?;
            let source = Self::column_source(index);

            let fill = match source {
                ColumnSource::Reading { kind, .. } if kind.value_kind() != ValueKind::Label => {
                    let fill = *artifact.fill.get(column).ok_or_else(|| {
                        AppError::model_invalid(format!(
                            "artifact is missing a fill value for {column:?}"
                        ))
                    })?;
                    Some(fill)
                }
                _ => None,
            };

            plan.push(ColumnPlan {
                column: column.clone(),
                weight,
                fill,
                source,
            });
        }
        Ok(plan)
    }

    /// Map a model column index to its value source
    ///
    /// The first three model inputs are user id, hour and minute; the rest
    /// are reading columns in feature order, twelve per feature.
    fn column_source(index: usize) -> ColumnSource {
        match index {
            0 => ColumnSource::UserId,
            1 => ColumnSource::Hour,
            2 => ColumnSource::Minute,
            _ => {
                let reading_index = index - 3;
                let kind = FeatureKind::ALL[reading_index / SERIES_LEN];
                let slot = reading_index % SERIES_LEN;
                ColumnSource::Reading { kind, slot }
            }
        }
    }

    fn column_value(&self, plan: &ColumnPlan, row: &FeatureRow) -> AppResult<f64> {
        match plan.source {
            ColumnSource::UserId => Ok(row.user_id as f64),
            ColumnSource::Hour => Ok(f64::from(row.hour)),
            ColumnSource::Minute => Ok(f64::from(row.minute)),
            ColumnSource::Reading { kind, slot } => self.reading_value(plan, kind, slot, row),
        }
    }

    fn reading_value(
        &self,
        plan: &ColumnPlan,
        kind: FeatureKind,
        slot: usize,
        row: &FeatureRow,
    ) -> AppResult<f64> {
        let reading = row.series(kind).get(slot).ok_or_else(|| {
            AppError::model(format!("row is missing slot {slot} of the {kind} series"))
        })?;

        match (kind.value_kind(), reading) {
            (ValueKind::Decimal, Reading::Value(value)) => Ok(*value),
            (ValueKind::Integer, Reading::Count(count)) => Ok(*count as f64),
            (ValueKind::Label, Reading::Label(label)) => self
                .artifact
                .activity_weights
                .get(label)
                .copied()
                .ok_or_else(|| {
                    AppError::model(format!(
                        "activity label {label:?} is outside the trained domain"
                    ))
                }),
            (ValueKind::Label, Reading::Unknown) => Ok(0.0),
            (_, Reading::Unknown) => plan.fill.ok_or_else(|| {
                AppError::model(format!("no fill value for column {:?}", plan.column))
            }),
            _ => Err(AppError::model(format!(
                "reading does not match the kind of column {:?}",
                plan.column
            ))),
        }
    }
}
