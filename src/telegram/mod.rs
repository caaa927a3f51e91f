// ABOUTME: Telegram Bot API transport layer
// ABOUTME: Wire types plus the long-polling HTTP client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

/// Bot API HTTP client
pub mod client;
/// Wire types for the Bot API subset in use
pub mod types;

pub use client::TelegramClient;
