//! Quiz history: bounded, newest-first log of completed sessions per user.
//!
//! Writes go through a per-user async mutex so the read → prepend → truncate →
//! persist sequence is never interleaved with another write to the same log.

pub mod handlers;
pub mod join;
pub mod routine_slot;
pub mod store;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::history::join::{CompletedSession, SessionJoin, SessionTicket};
use crate::history::routine_slot::RoutineSlot;
use crate::history::store::{KvStore, StoreError};
use crate::models::answers::AnswerSet;
use crate::models::history::{HistorySummary, QuizHistoryEntry};
use crate::models::recommendation::RecommendationItem;
use crate::models::routine::Routine;

/// Maximum entries kept per user. Older entries are evicted on insert.
pub const HISTORY_CAPACITY: usize = 10;

pub fn history_key(user_id: &str) -> String {
    format!("quiz_history:{user_id}")
}

pub struct HistoryStore {
    store: Arc<dyn KvStore>,
    routine_slot: RoutineSlot,
    join: SessionJoin,
    write_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KvStore>, routine_slot: RoutineSlot) -> Self {
        Self {
            store,
            routine_slot,
            join: SessionJoin::new(),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the user's log, newest first. Missing or corrupt logs read as empty.
    pub async fn get(&self, user_id: &str) -> Vec<QuizHistoryEntry> {
        self.load(user_id).await.unwrap_or_else(|e| {
            warn!("History for user {user_id} unreadable, treating as empty: {e}");
            Vec::new()
        })
    }

    /// Like `get`, but a backend failure is returned instead of read as empty,
    /// so a write never replaces a log it could not read.
    async fn load(&self, user_id: &str) -> Result<Vec<QuizHistoryEntry>, StoreError> {
        let key = history_key(user_id);
        let value = match self.store.get(&key).await {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(Vec::new()),
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!("{e}; starting a new history log");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_value(value) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("History under '{key}' is corrupt, starting a new log: {e}");
                Ok(Vec::new())
            }
        }
    }

    pub async fn get_entry(&self, user_id: &str, entry_id: &str) -> Option<QuizHistoryEntry> {
        self.get(user_id)
            .await
            .into_iter()
            .find(|entry| entry.id == entry_id)
    }

    pub async fn summaries(&self, user_id: &str) -> Vec<HistorySummary> {
        self.get(user_id)
            .await
            .iter()
            .map(HistorySummary::from)
            .collect()
    }

    /// Records a new entry only when answers, routine and recommendations are all present.
    /// Returns the recorded entry, or `None` when any part is missing.
    pub async fn record_if_complete(
        &self,
        user_id: &str,
        answers: Option<&AnswerSet>,
        routine: Option<&Routine>,
        recommendations: Option<&[RecommendationItem]>,
    ) -> Result<Option<QuizHistoryEntry>, StoreError> {
        let (Some(answers), Some(routine), Some(recommendations)) =
            (answers, routine, recommendations)
        else {
            return Ok(None);
        };

        let entry = QuizHistoryEntry {
            id: Uuid::new_v4().to_string(),
            answers: answers.clone(),
            routine: routine.clone(),
            recommendations: recommendations.to_vec(),
            completed_at: Utc::now(),
            user_id: user_id.to_string(),
        };

        let key = history_key(user_id);
        let lock = self.write_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            self.prepend(&key, user_id, entry.clone()).await
        };
        drop(lock);
        self.release_write_lock(&key);

        let stored = result?;
        info!(
            "Recorded quiz history entry {} for user {user_id} ({stored} stored)",
            entry.id
        );
        Ok(Some(entry))
    }

    /// Read, prepend, truncate, persist. Callers hold the key's write lock.
    async fn prepend(
        &self,
        key: &str,
        user_id: &str,
        entry: QuizHistoryEntry,
    ) -> Result<usize, StoreError> {
        let mut log = self.load(user_id).await?;
        log.insert(0, entry);
        log.truncate(HISTORY_CAPACITY);

        let value = serde_json::to_value(&log).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &value).await?;
        Ok(log.len())
    }

    /// Makes `routine` the active routine, e.g. when reusing a past entry.
    pub async fn set_active_routine(
        &self,
        user_id: &str,
        routine: &Routine,
    ) -> Result<(), StoreError> {
        self.routine_slot.set(routine).await?;
        info!("User {user_id} activated a routine from history");
        Ok(())
    }

    pub async fn clear_active_routine(&self) -> Result<(), StoreError> {
        self.routine_slot.clear().await
    }

    pub async fn active_routine(&self) -> Option<Routine> {
        self.routine_slot.get().await
    }

    // ── Session join ────────────────────────────────────────────────────────

    /// Starts a session for `user_id`; results from any earlier session are dropped.
    pub fn begin_session(&self, user_id: &str) -> SessionTicket {
        self.join.begin(user_id)
    }

    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.join.is_current(ticket)
    }

    pub async fn attach_answers(
        &self,
        ticket: &SessionTicket,
        answers: AnswerSet,
    ) -> Option<QuizHistoryEntry> {
        let completed = self.join.attach_answers(ticket, answers);
        self.record_completed(completed).await
    }

    pub async fn offer_routine(
        &self,
        ticket: &SessionTicket,
        routine: Routine,
    ) -> Option<QuizHistoryEntry> {
        let completed = self.join.offer_routine(ticket, routine);
        self.record_completed(completed).await
    }

    pub async fn offer_recommendations(
        &self,
        ticket: &SessionTicket,
        recommendations: Vec<RecommendationItem>,
    ) -> Option<QuizHistoryEntry> {
        let completed = self.join.offer_recommendations(ticket, recommendations);
        self.record_completed(completed).await
    }

    async fn record_completed(
        &self,
        completed: Option<CompletedSession>,
    ) -> Option<QuizHistoryEntry> {
        let session = completed?;
        let result = self
            .record_if_complete(
                &session.user_id,
                Some(&session.answers),
                Some(&session.routine),
                Some(&session.recommendations),
            )
            .await;

        match result {
            Ok(entry) => entry,
            Err(e) => {
                error!(
                    "Failed to record session {} for user {}: {e}",
                    session.session_id, session.user_id
                );
                None
            }
        }
    }

    fn write_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Drops the key's lock once no writer holds or waits on it.
    fn release_write_lock(&self, key: &str) {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(key);
        }
    }
}
