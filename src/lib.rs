// ABOUTME: Main library entry point for the Glucobot Telegram bot
// ABOUTME: Collects hourly health features and forecasts blood glucose an hour ahead
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

#![deny(unsafe_code)]

//! # Glucobot
//!
//! A Telegram bot that collects self-reported health features through a
//! guided dialogue and forecasts the blood glucose level one hour ahead
//! with a pre-trained linear regression model.
//!
//! ## Features
//!
//! - **Guided entry**: Reply-keyboard dialogue collecting seven features as
//!   twelve-value series covering the last hour
//! - **Tolerant input**: Whitespace-separated values with sentinel spellings
//!   for unknown readings
//! - **On-device forecasting**: A validated JSON model artifact evaluated
//!   locally, no inference service involved
//! - **Plain storage**: One append-only CSV table, rewritten atomically
//!
//! ## Quick Start
//!
//! 1. Seed a demo artifact and table with the `seed-demo-model` binary
//! 2. Export `TELEGRAM_BOT_TOKEN` and start `glucobot-server`
//! 3. Send `/start` to the bot
//!
//! ## Architecture
//!
//! The crate is layered from the wire inward:
//! - **Telegram**: Long-polling Bot API client and wire types
//! - **Dialogue**: States, menus and reply sequences
//! - **Validator**: Series parsing with sentinel handling
//! - **Predictor**: Model artifact loading and evaluation
//! - **Store**: CSV persistence of assembled feature rows
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use glucobot::config::environment::ServerConfig;
//! use glucobot::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("Glucobot configured with table: {}",
//!              config.database_path.display());
//!
//!     Ok(())
//! }
//! ```

/// Long-polling server loop
pub mod bot;

/// Supported activity types
pub mod catalog;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Dialogue control, templates and keyboards
pub mod dialogue;

/// Unified error handling system with standard error codes
pub mod errors;

/// Display formatting for forecasts and history tables
pub mod formatters;

/// Logging configuration and structured logging setup
pub mod logging;

/// Core domain types: features, readings, rows and chat state
pub mod models;

/// Pre-trained model loading and evaluation
pub mod predictor;

/// Per-user dialogue session tracking
pub mod session;

/// CSV-backed feature row storage
pub mod store;

/// Telegram Bot API transport
pub mod telegram;

/// Series input parsing and validation
pub mod validator;
