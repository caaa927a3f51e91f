// ABOUTME: Long-polling server loop feeding Telegram updates into the dialogue
// ABOUTME: Handles update ordering, reply delivery and graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Bot server
//!
//! Updates are fetched in batches and handled strictly in order; the offset
//! is advanced past each update once its replies have been attempted, so a
//! crash never re-delivers handled messages after restart beyond the current
//! batch. Polling errors back off for a fixed delay instead of tearing the
//! server down.

use crate::constants::defaults;
use crate::dialogue::DialogueController;
use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::telegram::types::Update;
use crate::telegram::TelegramClient;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Polling server tying the transport to the dialogue
pub struct BotServer {
    client: TelegramClient,
    dialogue: DialogueController,
    poll_timeout_secs: u64,
}

impl BotServer {
    #[must_use]
    pub fn new(client: TelegramClient, dialogue: DialogueController, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            dialogue,
            poll_timeout_secs,
        }
    }

    /// Poll for updates until interrupted
    ///
    /// # Errors
    ///
    /// Currently always returns `Ok` after a shutdown signal; the signature
    /// leaves room for fatal transport errors.
    pub async fn run(&self) -> AppResult<()> {
        info!(
            poll_timeout = self.poll_timeout_secs,
            "Starting long-poll loop"
        );
        let mut offset: Option<i64> = None;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
                batch = self.client.get_updates(offset, self.poll_timeout_secs) => {
                    match batch {
                        Ok(updates) => {
                            for update in updates {
                                offset = Some(update.update_id + 1);
                                self.handle_update(update).await;
                            }
                        }
                        Err(error) => {
                            warn!(error = %error, "Polling failed, backing off");
                            tokio::time::sleep(Duration::from_secs(defaults::POLL_RETRY_DELAY_SECS))
                                .await;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle one update end to end, never failing the polling loop
    async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            debug!(chat_id = message.chat.id, "Skipping non-text message");
            return;
        };
        if message.from.as_ref().is_some_and(|user| user.is_bot) {
            debug!(chat_id = message.chat.id, "Skipping bot message");
            return;
        }

        let chat_id = message.chat.id;
        let user_id = message.from.as_ref().map_or(chat_id, |user| user.id);

        let started = Instant::now();
        let replies = self.dialogue.handle_message(user_id, &text).await;
        let reply_count = replies.len();

        for reply in &replies {
            if let Err(error) = self.client.send_message(chat_id, reply).await {
                warn!(chat_id, error = %error, "Failed to deliver reply");
                break;
            }
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_update_handled(user_id, duration_ms, reply_count);
    }
}
