// ABOUTME: Guided entry dialogue turning incoming text into reply sequences
// ABOUTME: Dispatches commands, menu labels and per-state series input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Dialogue control
//!
//! One incoming message maps to an ordered list of replies. Dispatch checks
//! the `/start` command first, then feature labels, then menu labels, and
//! only then falls back to the per-user chat state: series input while a
//! feature is being entered, the unknown-command fallback otherwise. Labels
//! therefore win over pending input in every state, so a stray button press
//! never gets swallowed as series data.
//!
//! Submitting runs the forecast and persists the row; on failure the session
//! is kept so the user can simply try again.

pub mod keyboards;
pub mod templates;

use self::keyboards::KeyboardLayout;
use self::templates::labels;
use crate::catalog::ActivityCatalog;
use crate::errors::AppError;
use crate::formatters;
use crate::logging::AppLogger;
use crate::models::{ChatState, FeatureKind};
use crate::predictor::GlucosePredictor;
use crate::session::SessionStore;
use crate::store::FeatureStore;
use crate::validator;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, warn};

/// One outgoing message, optionally replacing the reply keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text, HTML-formatted
    pub text: String,
    /// Keyboard to show with the message, when it changes
    pub keyboard: Option<KeyboardLayout>,
}

impl Reply {
    /// Plain text reply keeping the current keyboard
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Reply that switches the user to `keyboard`
    #[must_use]
    pub fn with_keyboard(text: impl Into<String>, keyboard: KeyboardLayout) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Menu actions reachable through button labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Rules,
    MainMenu,
    History,
    DeleteHistory,
    ChooseFeature,
    Submit,
}

impl MenuAction {
    fn from_label(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case(labels::RULES) {
            Some(Self::Rules)
        } else if text.eq_ignore_ascii_case(labels::MAIN_MENU) {
            Some(Self::MainMenu)
        } else if text.eq_ignore_ascii_case(labels::VIEW_HISTORY) {
            Some(Self::History)
        } else if text.eq_ignore_ascii_case(labels::DELETE_HISTORY) {
            Some(Self::DeleteHistory)
        } else if text.eq_ignore_ascii_case(labels::ADD_ENTRY)
            || text.eq_ignore_ascii_case(labels::BACK_TO_FEATURES)
        {
            Some(Self::ChooseFeature)
        } else if text.eq_ignore_ascii_case(labels::SUBMIT) {
            Some(Self::Submit)
        } else {
            None
        }
    }
}

/// Stateful message handler shared by every chat
#[derive(Clone)]
pub struct DialogueController {
    sessions: SessionStore,
    store: FeatureStore,
    predictor: Arc<GlucosePredictor>,
    catalog: ActivityCatalog,
}

impl DialogueController {
    #[must_use]
    pub fn new(
        sessions: SessionStore,
        store: FeatureStore,
        predictor: Arc<GlucosePredictor>,
    ) -> Self {
        Self {
            sessions,
            store,
            predictor,
            catalog: ActivityCatalog,
        }
    }

    /// Produce the replies for one incoming text message
    pub async fn handle_message(&self, user_id: i64, text: &str) -> Vec<Reply> {
        if is_start_command(text) {
            return Self::start();
        }
        if let Some(kind) = templates::feature_for_label(text) {
            return self.prompt_feature(user_id, kind).await;
        }
        if let Some(action) = MenuAction::from_label(text) {
            return self.menu_action(user_id, action).await;
        }

        match self.sessions.state(user_id).await {
            ChatState::Inputting(kind) => self.process_input(user_id, kind, text).await,
            ChatState::Idle | ChatState::ChoosingFeature => {
                vec![Reply::text(templates::UNKNOWN_COMMAND)]
            }
        }
    }

    fn start() -> Vec<Reply> {
        vec![Reply::with_keyboard(
            templates::GREETING,
            KeyboardLayout::start(),
        )]
    }

    async fn menu_action(&self, user_id: i64, action: MenuAction) -> Vec<Reply> {
        match action {
            MenuAction::Rules => self.rules(user_id).await,
            MenuAction::MainMenu => self.main_menu(user_id).await,
            MenuAction::History => self.history(user_id).await,
            MenuAction::DeleteHistory => self.delete_history(user_id).await,
            MenuAction::ChooseFeature => self.choose_feature(user_id).await,
            MenuAction::Submit => self.submit(user_id).await,
        }
    }

    /// Rules text followed by the main menu, dropping any session
    async fn rules(&self, user_id: i64) -> Vec<Reply> {
        let mut replies = vec![Reply::text(templates::RULES)];
        replies.extend(self.main_menu(user_id).await);
        replies
    }

    async fn main_menu(&self, user_id: i64) -> Vec<Reply> {
        self.sessions.clear(user_id).await;
        vec![Reply::with_keyboard(
            templates::CHOOSE_OPTION,
            KeyboardLayout::main_menu(),
        )]
    }

    /// History table for the user; chat state stays untouched
    async fn history(&self, user_id: i64) -> Vec<Reply> {
        match self.store.history(user_id).await {
            Ok(entries) => {
                let table = formatters::history_table(&entries);
                vec![Reply::with_keyboard(
                    templates::history_message(&table),
                    KeyboardLayout::history(),
                )]
            }
            Err(error) => failure_reply(user_id, "history", &error),
        }
    }

    async fn delete_history(&self, user_id: i64) -> Vec<Reply> {
        match self.store.purge(user_id).await {
            Ok(_) => {
                let mut replies = vec![Reply::text(templates::HISTORY_DELETED)];
                replies.extend(self.main_menu(user_id).await);
                replies
            }
            Err(error) => failure_reply(user_id, "delete_history", &error),
        }
    }

    /// Feature menu; confirmed series survive re-entering it
    async fn choose_feature(&self, user_id: i64) -> Vec<Reply> {
        self.sessions.enter_choosing(user_id).await;
        vec![Reply::with_keyboard(
            templates::CHOOSE_FEATURE,
            KeyboardLayout::features(),
        )]
    }

    async fn prompt_feature(&self, user_id: i64, kind: FeatureKind) -> Vec<Reply> {
        let mut replies = vec![Reply::text(templates::input_prompt(kind))];
        if kind == FeatureKind::Activity {
            replies.push(Reply::text(templates::activity_listing(self.catalog)));
        }
        replies.push(Reply::with_keyboard(
            templates::SENTINEL_HINT,
            KeyboardLayout::input(),
        ));
        self.sessions.enter_inputting(user_id, kind).await;
        replies
    }

    async fn process_input(&self, user_id: i64, kind: FeatureKind, text: &str) -> Vec<Reply> {
        match validator::parse_series(text, kind.value_kind(), self.catalog) {
            Ok(series) => {
                self.sessions.confirm_series(user_id, kind, series).await;
                vec![Reply::with_keyboard(
                    templates::saved(kind),
                    KeyboardLayout::features(),
                )]
            }
            Err(error) => {
                debug!(user_id, kind = %kind, error = %error, "Rejected series input");
                vec![Reply::text(templates::retry_prompt(kind))]
            }
        }
    }

    /// Forecast and persist the confirmed series
    ///
    /// On failure the session is preserved so the entry is not lost.
    async fn submit(&self, user_id: i64) -> Vec<Reply> {
        let confirmed = self.sessions.series_snapshot(user_id).await;
        if confirmed.is_empty() {
            return vec![Reply::text(templates::EMPTY_SUBMIT)];
        }

        let moment = Local::now();
        match self
            .store
            .append(user_id, &moment, confirmed, &self.predictor)
            .await
        {
            Ok(predicted) => {
                AppLogger::log_forecast_served(user_id, predicted);
                let clock = formatters::forecast_clock(&moment);
                let mut replies = vec![Reply::text(templates::forecast(&clock, predicted))];
                replies.extend(self.main_menu(user_id).await);
                replies
            }
            Err(error) => failure_reply(user_id, "submit", &error),
        }
    }
}

/// Whether `text` is the `/start` command, with or without a bot mention
fn is_start_command(text: &str) -> bool {
    let Some(first) = text.split_whitespace().next() else {
        return false;
    };
    let Some(command) = first.strip_prefix('/') else {
        return false;
    };
    matches!(command.split('@').next(), Some("start"))
}

fn failure_reply(user_id: i64, operation: &str, error: &AppError) -> Vec<Reply> {
    warn!(user_id, operation, error = %error, "Request handling failed");
    vec![Reply::text(templates::REQUEST_FAILED)]
}
