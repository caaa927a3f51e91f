// ABOUTME: Demo model seeder producing a plausible linear artifact and table
// ABOUTME: Generates deterministic weights so local runs are reproducible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Demo model seeder for Glucobot.
//!
//! This binary writes a model artifact with plausible regression weights and
//! initializes the feature table, so the server can run end to end without a
//! real training pipeline.
//!
//! Usage:
//! ```bash
//! # Seed with default paths (model.json, data/database.csv)
//! cargo run --bin seed-demo-model
//!
//! # Custom paths and seed
//! cargo run --bin seed-demo-model -- --model demo.json --seed 7
//!
//! # Verbose output
//! cargo run --bin seed-demo-model -- -v
//! ```

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use glucobot::catalog::ActivityCatalog;
use glucobot::constants::defaults;
use glucobot::models::FeatureRow;
use glucobot::predictor::{GlucosePredictor, ModelArtifact};
use glucobot::store::schema::TableSchema;
use glucobot::store::FeatureStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-demo-model",
    about = "Glucobot Demo Model Seeder",
    long_about = "Write a demo regression artifact and initialize the feature table"
)]
struct SeedArgs {
    /// Model artifact path
    #[arg(long, default_value = defaults::MODEL_PATH)]
    model: String,

    /// Feature table path
    #[arg(long, default_value = defaults::DATABASE_PATH)]
    database: String,

    /// Random seed for weight generation
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Glucobot Demo Model Seeder ===");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let artifact = build_artifact(&mut rng);

    // Prove the artifact passes the same validation the server applies
    let predictor = GlucosePredictor::from_artifact(artifact.clone())?;
    let baseline = predictor.predict(&FeatureRow::assemble(1, &Local::now(), HashMap::new()))?;
    info!(baseline, "All-unknown row forecast");

    write_artifact(&artifact, &args.model).await?;
    info!(path = %args.model, columns = artifact.columns.len(), "Model artifact written");

    let store = FeatureStore::open(&args.database).await?;
    info!(
        path = %args.database,
        rows = store.row_count().await,
        "Feature table ready"
    );

    info!("Seeding complete");
    Ok(())
}

fn build_artifact(rng: &mut StdRng) -> ModelArtifact {
    let schema = TableSchema::new();
    let columns = schema.model_columns();

    let mut weights = HashMap::new();
    let mut fill = HashMap::new();
    for column in &columns {
        weights.insert(column.clone(), column_weight(rng, column));
        if let Some(value) = column_fill(column) {
            fill.insert(column.clone(), value);
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
        activity_weights.insert((*label).to_owned(), rng.gen_range(-0.3..0.3));
    }

    ModelArtifact {
        name: "glucose-demo-linear".to_owned(),
        version: "0.1.0".to_owned(),
        intercept: rng.gen_range(3.8..4.6),
        columns,
        weights,
        fill,
        activity_labels,
        activity_weights,
    }
}

/// Weight ranges roughly shaped like a trained glucose regression: the most
/// recent glucose reading dominates, insulin pulls down, carbs push up
fn column_weight(rng: &mut StdRng, column: &str) -> f64 {
    if matches!(column, "user_id" | "hour" | "minute") {
        return rng.gen_range(-0.001..0.001);
    }
    if column == "bg-0:00" {
        return rng.gen_range(0.6..0.9);
    }
    match column.split_once('-').map(|(prefix, _)| prefix) {
        Some("bg") => rng.gen_range(0.0..0.08),
        Some("insulin") => rng.gen_range(-0.05..0.0),
        Some("carbs") => rng.gen_range(0.0..0.03),
        Some("hr") => rng.gen_range(-0.005..0.005),
        Some("steps") => rng.gen_range(-0.000_5..0.0),
        Some("cals") => rng.gen_range(-0.002..0.0),
        Some("activity") => rng.gen_range(-0.05..0.05),
        _ => 0.0,
    }
}

/// Substitutes for unknown readings: population-typical glucose and resting
/// heart rate, zero for consumption-style features
fn column_fill(column: &str) -> Option<f64> {
    match column.split_once('-').map(|(prefix, _)| prefix) {
        Some("bg") => Some(5.5),
        Some("hr") => Some(75.0),
        Some("activity") | None => None,
        Some(_) => Some(0.0),
    }
}

async fn write_artifact(artifact: &ModelArtifact, path: &str) -> Result<()> {
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let json = serde_json::to_string_pretty(artifact)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
