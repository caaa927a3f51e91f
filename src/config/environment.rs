// ABOUTME: Environment-driven server configuration with secret-free summaries
// ABOUTME: Reads the bot token, paths and tuning knobs, then validates them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Environment-based configuration
//!
//! Everything except the bot token has a sensible default. The token is the
//! one secret the server carries; it is required, never serialized and never
//! part of the logged summary beyond a short prefix.

use crate::constants::env_config;
use crate::errors::{AppError, AppResult};
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the bot token
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Routine operational events
    #[default]
    Info,
    /// Per-decision detail
    Debug,
    /// Everything, including wire-level noise
    Trace,
}

impl LogLevel {
    /// Convert to the equivalent `tracing` level
    #[must_use]
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string, falling back to `Info` on anything unrecognized
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Session tracking settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Idle seconds before a session expires
    pub ttl_secs: u64,
    /// Maximum concurrently tracked sessions
    pub capacity: usize,
    /// Seconds between background expiry sweeps
    pub cleanup_interval_secs: u64,
}

/// Telegram transport settings
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    /// Bot API base URL, overridable for self-hosted gateways
    pub api_base: String,
    /// Long-poll hold time in seconds
    pub poll_timeout_secs: u64,
}

/// Complete server configuration
///
/// Deliberately not serializable; the token must not leak through a config
/// dump.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Path of the feature table CSV
    pub database_path: PathBuf,
    /// Path of the model artifact JSON
    pub model_path: PathBuf,
    /// Log level
    pub log_level: LogLevel,
    /// Session tracking settings
    pub session: SessionSettings,
    /// Telegram transport settings
    pub telegram: TelegramSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file first when one exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the bot token is missing.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        let bot_token = env::var(BOT_TOKEN_ENV).map_err(|_| {
            AppError::config_missing(format!("{BOT_TOKEN_ENV} environment variable is required"))
        })?;

        Ok(Self {
            bot_token,
            database_path: PathBuf::from(env_config::database_path()),
            model_path: PathBuf::from(env_config::model_path()),
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            session: SessionSettings {
                ttl_secs: env_config::session_ttl_secs(),
                capacity: env_config::session_capacity(),
                cleanup_interval_secs: env_config::session_cleanup_interval_secs(),
            },
            telegram: TelegramSettings {
                api_base: env_config::telegram_api_base(),
                poll_timeout_secs: env_config::poll_timeout_secs(),
            },
        })
    }

    /// Check the loaded values for contradictions
    ///
    /// # Errors
    ///
    /// Returns an error when a value cannot work, such as an empty token or
    /// a zero session capacity.
    pub fn validate(&self) -> AppResult<()> {
        if self.bot_token.trim().is_empty() {
            return Err(AppError::config_invalid("bot token must not be empty"));
        }
        if self.session.capacity == 0 {
            return Err(AppError::config_invalid(
                "SESSION_CAPACITY must be at least 1",
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(AppError::config_invalid("SESSION_TTL_SECS must be at least 1"));
        }
        if self.telegram.poll_timeout_secs == 0 {
            warn!("POLL_TIMEOUT_SECS is 0; getUpdates will short-poll");
        }
        Ok(())
    }

    /// Session store configuration derived from these settings
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            capacity: self.session.capacity.max(1),
            ttl: Duration::from_secs(self.session.ttl_secs),
            cleanup_interval: Duration::from_secs(self.session.cleanup_interval_secs),
            enable_background_cleanup: true,
        }
    }

    /// One-line-per-setting summary for startup logging, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Glucobot Configuration:\n\
             - Bot Token: {}\n\
             - Database: {}\n\
             - Model: {}\n\
             - Log Level: {}\n\
             - Session TTL: {}s\n\
             - Session Capacity: {}\n\
             - API Base: {}\n\
             - Poll Timeout: {}s",
            redact_token(&self.bot_token),
            self.database_path.display(),
            self.model_path.display(),
            self.log_level,
            self.session.ttl_secs,
            self.session.capacity,
            self.telegram.api_base,
            self.telegram.poll_timeout_secs,
        )
    }
}

/// Keep just enough of the token to recognize which bot is configured
fn redact_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::defaults;

    fn config_with_token(token: &str) -> ServerConfig {
        ServerConfig {
            bot_token: token.to_owned(),
            database_path: PathBuf::from(defaults::DATABASE_PATH),
            model_path: PathBuf::from(defaults::MODEL_PATH),
            log_level: LogLevel::default(),
            session: SessionSettings {
                ttl_secs: defaults::SESSION_TTL_SECS,
                capacity: defaults::SESSION_CAPACITY,
                cleanup_interval_secs: defaults::SESSION_CLEANUP_INTERVAL_SECS,
            },
            telegram: TelegramSettings {
                api_base: "https://api.telegram.org".to_owned(),
                poll_timeout_secs: defaults::POLL_TIMEOUT_SECS,
            },
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("info"), LogLevel::Info);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
        assert_eq!(LogLevel::from_str_or_default("verbose"), LogLevel::Info);
    }

    #[test]
    fn test_log_level_renders_as_a_filter_directive() {
        assert_eq!(format!("glucobot={}", LogLevel::Debug), "glucobot=debug");
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        assert!(config_with_token("  ").validate().is_err());
        assert!(config_with_token("123456:abcdef").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = config_with_token("123456:abcdef");
        config.session.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_redacts_the_token() {
        let config = config_with_token("123456:secret-part");
        let summary = config.summary();
        assert!(summary.contains("1234…"));
        assert!(!summary.contains("secret-part"));
    }

    #[test]
    fn test_session_config_conversion() {
        let config = config_with_token("123456:abcdef");
        let session = config.session_config();
        assert_eq!(session.ttl, Duration::from_secs(defaults::SESSION_TTL_SECS));
        assert_eq!(session.capacity, defaults::SESSION_CAPACITY);
        assert!(session.enable_background_cleanup);
    }
}
