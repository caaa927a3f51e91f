// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Exercises variable precedence, defaults, validation and redaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use glucobot::config::environment::{LogLevel, ServerConfig, BOT_TOKEN_ENV};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const ALL_VARS: &[&str] = &[
    BOT_TOKEN_ENV,
    "DATABASE_PATH",
    "MODEL_PATH",
    "LOG_LEVEL",
    "SESSION_TTL_SECS",
    "SESSION_CAPACITY",
    "SESSION_CLEANUP_INTERVAL_SECS",
    "POLL_TIMEOUT_SECS",
    "TELEGRAM_API_BASE",
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_requires_the_bot_token() {
    clear_env();

    let result = ServerConfig::from_env();
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains(BOT_TOKEN_ENV));
}

#[test]
#[serial]
fn test_from_env_uses_defaults_when_only_the_token_is_set() {
    clear_env();
    env::set_var(BOT_TOKEN_ENV, "123456:test-token");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.database_path, PathBuf::from("data/database.csv"));
    assert_eq!(config.model_path, PathBuf::from("model.json"));
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.session.ttl_secs, 1800);
    assert_eq!(config.session.capacity, 10_000);
    assert_eq!(config.telegram.api_base, "https://api.telegram.org");
    assert_eq!(config.telegram.poll_timeout_secs, 30);
    assert!(config.validate().is_ok());

    clear_env();
}

#[test]
#[serial]
fn test_from_env_honors_overrides() {
    clear_env();
    env::set_var(BOT_TOKEN_ENV, "123456:test-token");
    env::set_var("DATABASE_PATH", "/tmp/features.csv");
    env::set_var("MODEL_PATH", "/tmp/weights.json");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("SESSION_TTL_SECS", "90");
    env::set_var("SESSION_CAPACITY", "5");
    env::set_var("POLL_TIMEOUT_SECS", "7");
    env::set_var("TELEGRAM_API_BASE", "http://localhost:8081");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.database_path, PathBuf::from("/tmp/features.csv"));
    assert_eq!(config.model_path, PathBuf::from("/tmp/weights.json"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.session.ttl_secs, 90);
    assert_eq!(config.session.capacity, 5);
    assert_eq!(config.telegram.poll_timeout_secs, 7);
    assert_eq!(config.telegram.api_base, "http://localhost:8081");

    clear_env();
}

#[test]
#[serial]
fn test_unparseable_numbers_fall_back_to_defaults() {
    clear_env();
    env::set_var(BOT_TOKEN_ENV, "123456:test-token");
    env::set_var("SESSION_TTL_SECS", "not-a-number");
    env::set_var("SESSION_CAPACITY", "-3");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.session.ttl_secs, 1800);
    assert_eq!(config.session.capacity, 10_000);

    clear_env();
}

#[test]
#[serial]
fn test_unrecognized_log_level_falls_back_to_info() {
    clear_env();
    env::set_var(BOT_TOKEN_ENV, "123456:test-token");
    env::set_var("LOG_LEVEL", "chatty");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.log_level, LogLevel::Info);

    clear_env();
}

#[test]
#[serial]
fn test_summary_never_carries_the_full_token() {
    clear_env();
    env::set_var(BOT_TOKEN_ENV, "987654:very-secret-suffix");

    let config = ServerConfig::from_env().unwrap();
    let summary = config.summary();
    assert!(summary.contains("9876…"));
    assert!(!summary.contains("very-secret-suffix"));

    clear_env();
}

#[test]
#[serial]
fn test_zero_capacity_fails_validation_but_session_config_clamps() {
    clear_env();
    env::set_var(BOT_TOKEN_ENV, "123456:test-token");
    env::set_var("SESSION_CAPACITY", "0");

    let config = ServerConfig::from_env().unwrap();
    assert!(config.validate().is_err());

    let session = config.session_config();
    assert_eq!(session.capacity, 1);
    assert!(session.enable_background_cleanup);

    clear_env();
}
