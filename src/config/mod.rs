// ABOUTME: Configuration module wiring environment settings into the server
// ABOUTME: Exposes the server configuration and its session settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Configuration
//!
//! All runtime settings come from environment variables with defaults from
//! [`crate::constants`]; the bot token is the only required one.

/// Environment and server configuration
pub mod environment;

pub use environment::ServerConfig;
