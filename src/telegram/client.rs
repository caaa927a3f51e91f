// ABOUTME: Minimal Telegram Bot API client over long polling
// ABOUTME: Wraps getUpdates and sendMessage with token-redacted error reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Bot API client
//!
//! The bot token is part of every request URL, so transport errors are
//! reported with the token replaced by a placeholder and never chained as
//! error sources. Envelope-level failures are surfaced with Telegram's own
//! error code and description.

use super::types::{
    ApiEnvelope, GetUpdatesRequest, Message, ReplyKeyboardMarkup, SendMessageRequest, Update,
};
use crate::constants::telegram;
use crate::dialogue::Reply;
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TOKEN_PLACEHOLDER: &str = "***";

/// HTTP client bound to one bot token
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    /// Create a client whose request timeout covers long polls of
    /// `poll_timeout` plus a fixed margin
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        poll_timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(poll_timeout + Duration::from_secs(telegram::HTTP_TIMEOUT_MARGIN_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
        })
    }

    /// Long-poll for updates starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or Telegram rejects it.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> AppResult<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: telegram::ALLOWED_UPDATES,
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), "Received updates");
        }
        Ok(updates)
    }

    /// Deliver one reply to `chat_id`
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or Telegram rejects it.
    pub async fn send_message(&self, chat_id: i64, reply: &Reply) -> AppResult<()> {
        let request = SendMessageRequest {
            chat_id,
            text: &reply.text,
            parse_mode: "HTML",
            reply_markup: reply.keyboard.as_ref().map(ReplyKeyboardMarkup::from),
        };
        let _delivered: Message = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> AppResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let code = if e.is_connect() {
                    ErrorCode::ExternalServiceUnavailable
                } else {
                    ErrorCode::ExternalServiceError
                };
                AppError::new(
                    code,
                    format!("Telegram {method} request failed: {}", self.redact(&e.to_string())),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(
                "Telegram",
                format!("failed to read {method} response: {}", self.redact(&e.to_string())),
            )
        })?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let envelope: ApiEnvelope<Resp> = serde_json::from_str(&body).map_err(|e| {
            AppError::serialization(format!("failed to parse Telegram {method} response: {e}"))
        })?;
        envelope.into_result()
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }

    fn redact(&self, text: &str) -> String {
        text.replace(&self.token, TOKEN_PLACEHOLDER)
    }
}

/// Error responses usually still carry the envelope with a description
fn error_from_body(status: reqwest::StatusCode, body: &str) -> AppError {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body).map_or_else(
        |_| {
            AppError::external_service(
                "Telegram",
                format!(
                    "API error ({status}): {}",
                    body.chars().take(200).collect::<String>()
                ),
            )
        },
        |envelope| match envelope.into_result() {
            Ok(_) => AppError::external_service("Telegram", format!("API error ({status})")),
            Err(error) => error,
        },
    )
}
