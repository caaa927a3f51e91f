// ABOUTME: Unified error handling with stable error codes shared across all modules
// ABOUTME: Defines AppError, ErrorCode and builder helpers for consistent error construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the bot.
//! It defines standard error types and error codes so that validation,
//! storage, model and transport failures are reported consistently across
//! all modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (1000-1999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 1000,
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 1001,
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 1002,

    // Configuration (2000-2999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 2000,
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 2001,
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 2002,

    // Storage (3000-3999)
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 3000,
    #[serde(rename = "SCHEMA_MISMATCH")]
    SchemaMismatch = 3001,

    // Model (4000-4999)
    #[serde(rename = "MODEL_ERROR")]
    ModelError = 4000,
    #[serde(rename = "MODEL_INVALID")]
    ModelInvalid = 4001,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::StorageError => "Storage operation failed",
            Self::SchemaMismatch => "Stored table does not match the expected schema",
            Self::ModelError => "Model evaluation failed",
            Self::ModelInvalid => "Model artifact is invalid",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the error belongs to the validation domain (recoverable by re-prompting)
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::InvalidFormat | Self::ValueOutOfRange
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid user input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Value outside the acceptable range
    #[must_use]
    pub fn value_out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration is missing
    #[must_use]
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// Configuration has an invalid value
    #[must_use]
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Storage error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Stored table header does not match the schema
    #[must_use]
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SchemaMismatch, message)
    }

    /// Model evaluation error
    #[must_use]
    pub fn model(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelError, message)
    }

    /// Model artifact failed validation
    #[must_use]
    pub fn model_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelInvalid, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Serialization/deserialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }
}
