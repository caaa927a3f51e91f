// ABOUTME: Serde shapes for the subset of the Telegram Bot API the bot uses
// ABOUTME: Long-poll updates, outgoing messages, reply keyboards and envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

use crate::dialogue::keyboards::KeyboardLayout;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// One long-poll update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier
    pub update_id: i64,
    /// Present for message updates, the only kind the bot subscribes to
    #[serde(default)]
    pub message: Option<Message>,
}

/// Incoming chat message
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier within the chat
    pub message_id: i64,
    /// Sender, absent for channel posts
    #[serde(default)]
    pub from: Option<User>,
    /// Chat the message was sent in
    pub chat: Chat,
    /// Text content, absent for media messages
    #[serde(default)]
    pub text: Option<String>,
}

/// Message sender
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Telegram user identifier
    pub id: i64,
    /// Whether the sender is another bot
    #[serde(default)]
    pub is_bot: bool,
    /// Public username, when set
    #[serde(default)]
    pub username: Option<String>,
}

/// Chat reference
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier, equal to the user id for private chats
    pub id: i64,
}

/// Response wrapper every Bot API method returns
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Whether the call succeeded
    pub ok: bool,
    /// Payload, present when `ok` is true
    #[serde(default)]
    pub result: Option<T>,
    /// Error description, present when `ok` is false
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric error code, present when `ok` is false
    #[serde(default)]
    pub error_code: Option<i64>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload or turn the envelope into an error
    ///
    /// # Errors
    ///
    /// Returns an error when the envelope reports failure or carries no
    /// result despite claiming success.
    pub fn into_result(self) -> AppResult<T> {
        if self.ok {
            self.result.ok_or_else(|| {
                AppError::external_service("Telegram", "response envelope carried no result")
            })
        } else {
            let code = self.error_code.unwrap_or_default();
            let description = self
                .description
                .unwrap_or_else(|| "no description".to_owned());
            Err(AppError::external_service(
                "Telegram",
                format!("API error {code}: {description}"),
            ))
        }
    }
}

/// Body of a `getUpdates` call
#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    /// Identifier of the first update to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Long-poll hold time in seconds
    pub timeout: u64,
    /// Update kinds the bot subscribes to
    pub allowed_updates: &'static [&'static str],
}

/// Body of a `sendMessage` call
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    /// Target chat
    pub chat_id: i64,
    /// Message text, HTML-formatted
    pub text: &'a str,
    /// Always HTML, matching how templates are written
    pub parse_mode: &'static str,
    /// Keyboard replacement, when the reply carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyKeyboardMarkup>,
}

/// Custom reply keyboard shown under the input field
#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardMarkup {
    /// Button rows
    pub keyboard: Vec<Vec<KeyboardButton>>,
    /// Fit the keyboard height to its rows
    pub resize_keyboard: bool,
}

/// Single reply keyboard button
#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    /// Label, echoed back as message text when pressed
    pub text: String,
}

impl From<&KeyboardLayout> for ReplyKeyboardMarkup {
    fn from(layout: &KeyboardLayout) -> Self {
        Self {
            keyboard: layout
                .rows()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|label| KeyboardButton {
                            text: label.clone(),
                        })
                        .collect()
                })
                .collect(),
            resize_keyboard: true,
        }
    }
}
