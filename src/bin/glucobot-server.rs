// ABOUTME: Main server binary wiring config, model, storage and the bot loop
// ABOUTME: Loads the artifact and table up front so startup fails fast
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! # Glucobot Server Binary
//!
//! Starts the Telegram long-polling bot with the pre-trained glucose model
//! and the CSV feature table. A bad model artifact or an unreadable table
//! stops the process before the first poll.

use anyhow::Result;
use clap::Parser;
use glucobot::{
    bot::BotServer, config::environment::ServerConfig, dialogue::DialogueController, logging,
    predictor::GlucosePredictor, session::SessionStore, store::FeatureStore,
    telegram::TelegramClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "glucobot-server")]
#[command(about = "Glucobot - Telegram bot forecasting blood glucose from self-reported features")]
pub struct Args {
    /// Override the feature table path
    #[arg(long)]
    database: Option<String>,

    /// Override the model artifact path
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using environment configuration");
            Args {
                database: None,
                model: None,
            }
        }
    };

    let mut config = ServerConfig::from_env()?;
    if let Some(database) = args.database {
        config.database_path = database.into();
    }
    if let Some(model) = args.model {
        config.model_path = model.into();
    }

    logging::init_from_env()?;

    info!("Starting Glucobot");
    info!("{}", config.summary());
    config.validate()?;

    let predictor = Arc::new(GlucosePredictor::load(&config.model_path).await?);
    info!(
        model = predictor.name(),
        version = predictor.version(),
        "Model loaded"
    );

    let store = FeatureStore::open(&config.database_path).await?;
    info!(rows = store.row_count().await, "Feature table ready");

    let sessions = SessionStore::new(&config.session_config());
    let dialogue = DialogueController::new(sessions, store, predictor);

    let client = TelegramClient::new(
        config.telegram.api_base.clone(),
        config.bot_token.clone(),
        Duration::from_secs(config.telegram.poll_timeout_secs),
    )?;

    let server = BotServer::new(client, dialogue, config.telegram.poll_timeout_secs);
    server.run().await?;

    info!("Glucobot stopped");
    Ok(())
}
