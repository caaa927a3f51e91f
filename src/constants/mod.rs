// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Groups sampling, sentinel, format and transport constants plus env helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Constants module
//!
//! This module organizes application constants by domain for better maintainability.
//! Constants are grouped into logical domains rather than being in a single large file.

use std::env;

/// Default values
pub mod defaults {
    /// Default feature table location
    pub const DATABASE_PATH: &str = "data/database.csv";
    /// Default model artifact location
    pub const MODEL_PATH: &str = "model.json";
    /// Default session TTL in seconds (30 minutes)
    pub const SESSION_TTL_SECS: u64 = 1800;
    /// Default maximum number of concurrently tracked dialogue sessions
    pub const SESSION_CAPACITY: usize = 10_000;
    /// Default interval between expired-session sweeps in seconds
    pub const SESSION_CLEANUP_INTERVAL_SECS: u64 = 60;
    /// Default long-poll timeout in seconds
    pub const POLL_TIMEOUT_SECS: u64 = 30;
    /// Delay before retrying a failed poll in seconds
    pub const POLL_RETRY_DELAY_SECS: u64 = 5;
}

/// Reading series shape
pub mod readings {
    /// Number of readings in one submitted series
    pub const SERIES_LEN: usize = 12;
    /// Spacing between consecutive readings in minutes
    pub const SAMPLE_INTERVAL_MINUTES: u32 = 5;
    /// Width of the observation window in minutes
    pub const WINDOW_MINUTES: u32 = 60;
    /// How far ahead the forecast looks in minutes
    pub const FORECAST_HORIZON_MINUTES: i64 = 60;
}

/// Unknown-value sentinels
pub mod sentinels {
    /// Tokens that mark a reading as unknown, compared case-insensitively
    pub const MISSING_VALUE_TOKENS: &[&str] = &["n", "н", "nan", "нан"];
}

/// Date and time display formats
pub mod formats {
    /// Entry date format (day.month.year)
    pub const DATE_FORMAT: &str = "%d.%m.%Y";
    /// Forecast time format (hour:minute)
    pub const TIME_FORMAT: &str = "%H:%M";
}

/// Telegram Bot API transport
pub mod telegram {
    /// Default Bot API base URL
    pub const API_BASE: &str = "https://api.telegram.org";
    /// Update kinds the bot subscribes to
    pub const ALLOWED_UPDATES: &[&str] = &["message"];
    /// Extra headroom added to the HTTP timeout on top of the long-poll timeout, in seconds
    pub const HTTP_TIMEOUT_MARGIN_SECS: u64 = 10;
}

/// Logging configuration
pub mod logging {
    /// Default log level
    pub const DEFAULT_LEVEL: &str = "info";
}

/// Service names
pub mod service_names {
    /// Bot service name
    pub const GLUCOBOT: &str = "glucobot";
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get feature table path from environment or default
    #[must_use]
    pub fn database_path() -> String {
        env::var("DATABASE_PATH").unwrap_or_else(|_| super::defaults::DATABASE_PATH.to_owned())
    }

    /// Get model artifact path from environment or default
    #[must_use]
    pub fn model_path() -> String {
        env::var("MODEL_PATH").unwrap_or_else(|_| super::defaults::MODEL_PATH.to_owned())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| super::logging::DEFAULT_LEVEL.to_owned())
    }

    /// Get session TTL in seconds from environment or default
    #[must_use]
    pub fn session_ttl_secs() -> u64 {
        env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::defaults::SESSION_TTL_SECS)
    }

    /// Get session capacity from environment or default
    #[must_use]
    pub fn session_capacity() -> usize {
        env::var("SESSION_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::defaults::SESSION_CAPACITY)
    }

    /// Get expired-session sweep interval in seconds from environment or default
    #[must_use]
    pub fn session_cleanup_interval_secs() -> u64 {
        env::var("SESSION_CLEANUP_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::defaults::SESSION_CLEANUP_INTERVAL_SECS)
    }

    /// Get long-poll timeout in seconds from environment or default
    #[must_use]
    pub fn poll_timeout_secs() -> u64 {
        env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::defaults::POLL_TIMEOUT_SECS)
    }

    /// Get Bot API base URL from environment or default
    #[must_use]
    pub fn telegram_api_base() -> String {
        env::var("TELEGRAM_API_BASE").unwrap_or_else(|_| super::telegram::API_BASE.to_owned())
    }
}
