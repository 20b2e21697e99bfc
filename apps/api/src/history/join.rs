//! Session join: combines the answer set and the two independently resolving
//! generation results into exactly one completed session.
//!
//! Each user has at most one pending session. `begin` replaces it, which
//! invalidates every ticket issued earlier: late results carrying a stale
//! ticket are dropped instead of producing a second history entry.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::models::answers::AnswerSet;
use crate::models::recommendation::RecommendationItem;
use crate::models::routine::Routine;

/// Identifies one in-flight session. Handed to both generation branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub user_id: String,
    pub session_id: Uuid,
}

/// All three parts of a session, released once.
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub user_id: String,
    pub session_id: Uuid,
    pub answers: AnswerSet,
    pub routine: Routine,
    pub recommendations: Vec<RecommendationItem>,
}

#[derive(Debug)]
struct PendingSession {
    session_id: Uuid,
    answers: Option<AnswerSet>,
    routine: Option<Routine>,
    recommendations: Option<Vec<RecommendationItem>>,
}

impl PendingSession {
    fn is_complete(&self) -> bool {
        self.answers.is_some() && self.routine.is_some() && self.recommendations.is_some()
    }
}

#[derive(Default)]
pub struct SessionJoin {
    pending: Mutex<HashMap<String, PendingSession>>,
}

impl SessionJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new pending session for `user_id`, discarding any previous one.
    pub fn begin(&self, user_id: &str) -> SessionTicket {
        let session_id = Uuid::new_v4();
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.insert(
            user_id.to_string(),
            PendingSession {
                session_id,
                answers: None,
                routine: None,
                recommendations: None,
            },
        ) {
            debug!(
                "Session {} for user {user_id} superseded by {session_id}",
                previous.session_id
            );
        }
        SessionTicket {
            user_id: user_id.to_string(),
            session_id,
        }
    }

    pub fn attach_answers(
        &self,
        ticket: &SessionTicket,
        answers: AnswerSet,
    ) -> Option<CompletedSession> {
        self.fill(ticket, |session| session.answers = Some(answers))
    }

    pub fn offer_routine(&self, ticket: &SessionTicket, routine: Routine) -> Option<CompletedSession> {
        self.fill(ticket, |session| session.routine = Some(routine))
    }

    pub fn offer_recommendations(
        &self,
        ticket: &SessionTicket,
        recommendations: Vec<RecommendationItem>,
    ) -> Option<CompletedSession> {
        self.fill(ticket, |session| {
            session.recommendations = Some(recommendations)
        })
    }

    /// True while `ticket` still names the user's pending session.
    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending
            .get(&ticket.user_id)
            .is_some_and(|session| session.session_id == ticket.session_id)
    }

    fn fill(
        &self,
        ticket: &SessionTicket,
        apply: impl FnOnce(&mut PendingSession),
    ) -> Option<CompletedSession> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        let session = match pending.get_mut(&ticket.user_id) {
            Some(session) if session.session_id == ticket.session_id => session,
            _ => {
                debug!(
                    "Dropping result for stale session {} (user {})",
                    ticket.session_id, ticket.user_id
                );
                return None;
            }
        };

        apply(session);
        if !session.is_complete() {
            return None;
        }

        let session = pending.remove(&ticket.user_id)?;
        Some(CompletedSession {
            user_id: ticket.user_id.clone(),
            session_id: session.session_id,
            answers: session.answers?,
            routine: session.routine?,
            recommendations: session.recommendations?,
        })
    }
}
