// ABOUTME: In-memory dialogue session store with LRU eviction and TTL support
// ABOUTME: Tracks per-user chat state and confirmed series, with background expiry sweeps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glucobot Contributors

//! Dialogue session store
//!
//! Every user working through an entry owns one session holding their chat
//! state and the series they confirmed so far. Sessions slide their expiry
//! forward on each access and vanish after the configured idle TTL, at which
//! point the user is back at [`ChatState::Idle`] as if they never started.

use crate::constants::defaults;
use crate::models::{ChatState, FeatureKind, ReadingSeries};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};

/// Session store tuning knobs
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of concurrently tracked sessions
    pub capacity: usize,
    /// Idle time after which a session expires
    pub ttl: Duration,
    /// Interval between background expiry sweeps
    pub cleanup_interval: Duration,
    /// Whether to spawn the background sweep task
    pub enable_background_cleanup: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::SESSION_CAPACITY,
            ttl: Duration::from_secs(defaults::SESSION_TTL_SECS),
            cleanup_interval: Duration::from_secs(defaults::SESSION_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

/// One user's in-progress entry
#[derive(Debug, Clone)]
struct SessionEntry {
    state: ChatState,
    series: HashMap<FeatureKind, ReadingSeries>,
    expires_at: Instant,
}

impl SessionEntry {
    fn new(ttl: Duration) -> Self {
        Self {
            state: ChatState::ChoosingFeature,
            series: HashMap::new(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn touch(&mut self, ttl: Duration) {
        self.expires_at = Instant::now() + ttl;
    }
}

/// In-memory session store with LRU eviction and background cleanup
///
/// Uses `Arc<RwLock<LruCache>>` for shared state between dialogue handling and
/// the background sweep task. The Arc is required because the sweep task
/// (spawned in `new`) needs shared ownership of the store to remove expired
/// sessions concurrently. `LruCache` bounds memory: at capacity the least
/// recently active user is evicted first.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<RwLock<LruCache<i64, SessionEntry>>>,
    ttl: Duration,
    shutdown_tx: Option<Arc<mpsc::Sender<()>>>,
}

impl SessionStore {
    /// Default capacity when config specifies zero sessions
    /// Note: the `unreachable!()` arm is checked at compile time
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(defaults::SESSION_CAPACITY) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a new session store with optional background sweep task
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        // LruCache requires NonZeroUsize for capacity
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(Self::DEFAULT_CAPACITY);

        let store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("Session cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self {
            store,
            ttl: config.ttl,
            shutdown_tx,
        }
    }

    /// Remove all expired sessions from the store
    async fn cleanup_expired(store: &Arc<RwLock<LruCache<i64, SessionEntry>>>) {
        let mut store_guard = store.write().await;

        // Collect expired keys first (can't modify while iterating)
        let expired_keys: Vec<i64> = store_guard
            .iter()
            .filter_map(|(k, v)| if v.is_expired() { Some(*k) } else { None })
            .collect();

        // Remove expired entries
        for key in &expired_keys {
            store_guard.pop(key);
        }

        let removed = expired_keys.len();
        drop(store_guard);
        if removed > 0 {
            tracing::debug!("Cleaned up {removed} expired dialogue sessions");
        }
    }

    /// Current chat state of a user, sliding the session expiry forward
    ///
    /// Users without a live session are [`ChatState::Idle`].
    pub async fn state(&self, user_id: i64) -> ChatState {
        let mut store = self.store.write().await;

        if let Some(entry) = store.get_mut(&user_id) {
            if entry.is_expired() {
                store.pop(&user_id);
                drop(store);
                return ChatState::Idle;
            }
            entry.touch(self.ttl);
            let state = entry.state;
            drop(store);
            return state;
        }
        drop(store);

        ChatState::Idle
    }

    /// Put the user at the feature-choice step, starting a session if needed
    ///
    /// Series already confirmed in a live session are kept.
    pub async fn enter_choosing(&self, user_id: i64) {
        self.set_state(user_id, ChatState::ChoosingFeature).await;
    }

    /// Put the user into input mode for one feature, starting a session if needed
    pub async fn enter_inputting(&self, user_id: i64, kind: FeatureKind) {
        self.set_state(user_id, ChatState::Inputting(kind)).await;
    }

    /// Store a validated series and return the user to the feature-choice step
    ///
    /// A later series for the same feature replaces the earlier one.
    pub async fn confirm_series(&self, user_id: i64, kind: FeatureKind, series: ReadingSeries) {
        let mut store = self.store.write().await;

        if store.get(&user_id).is_some_and(SessionEntry::is_expired) {
            store.pop(&user_id);
        }

        if let Some(entry) = store.get_mut(&user_id) {
            entry.series.insert(kind, series);
            entry.state = ChatState::ChoosingFeature;
            entry.touch(self.ttl);
        } else {
            let mut entry = SessionEntry::new(self.ttl);
            entry.series.insert(kind, series);
            Self::push_entry(&mut store, user_id, entry);
        }
        drop(store);
    }

    /// Copy of all series the user confirmed so far
    ///
    /// The session is left untouched, so a failed submission can be retried.
    pub async fn series_snapshot(&self, user_id: i64) -> HashMap<FeatureKind, ReadingSeries> {
        let mut store = self.store.write().await;

        if let Some(entry) = store.get_mut(&user_id) {
            if entry.is_expired() {
                store.pop(&user_id);
                drop(store);
                return HashMap::new();
            }
            entry.touch(self.ttl);
            let snapshot = entry.series.clone();
            drop(store);
            return snapshot;
        }
        drop(store);

        HashMap::new()
    }

    /// Drop the whole session: chat state and every confirmed series
    pub async fn clear(&self, user_id: i64) {
        self.store.write().await.pop(&user_id);
    }

    async fn set_state(&self, user_id: i64, state: ChatState) {
        let mut store = self.store.write().await;

        if store.get(&user_id).is_some_and(SessionEntry::is_expired) {
            store.pop(&user_id);
        }

        if let Some(entry) = store.get_mut(&user_id) {
            entry.state = state;
            entry.touch(self.ttl);
        } else {
            let mut entry = SessionEntry::new(self.ttl);
            entry.state = state;
            Self::push_entry(&mut store, user_id, entry);
        }
        drop(store);
    }

    fn push_entry(store: &mut LruCache<i64, SessionEntry>, user_id: i64, entry: SessionEntry) {
        if let Some((evicted_id, _)) = store.push(user_id, entry) {
            if evicted_id != user_id {
                tracing::debug!(
                    user.id = %evicted_id,
                    "Evicted least recently active session at capacity"
                );
            }
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        // Signal background cleanup task to shutdown on drop
        // Note: This only works if the Sender is fully dropped (all Arc clones released)
        // The task will exit when all senders are dropped and recv() returns None
        if let Some(tx) = &self.shutdown_tx {
            // Try to send shutdown signal, errors are expected if channel is already closed
            if let Err(e) = tx.try_send(()) {
                tracing::debug!(error = ?e, "Session shutdown signal send failed (channel likely closed)");
            }
        }
    }
}
