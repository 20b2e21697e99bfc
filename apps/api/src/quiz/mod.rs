// Quiz: fixed question catalog, the question-flow state machine, and the
// in-memory registry of flows that are still being answered.

pub mod flow;
pub mod handlers;
pub mod questions;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::quiz::flow::QuizFlow;

/// Idle time after which an unfinished session is dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);
/// Upper bound on open sessions; the least recently used one is evicted beyond it.
pub const MAX_OPEN_SESSIONS: usize = 10_000;

/// A flow being answered by one user.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub user_id: String,
    pub flow: QuizFlow,
}

#[derive(Debug)]
struct OpenSession {
    session: QuizSession,
    touched_at: Instant,
}

/// Open quiz sessions, keyed by session id. Completed sessions are removed,
/// abandoned ones expire after `ttl` without activity.
#[derive(Clone)]
pub struct QuizSessions {
    sessions: Arc<Mutex<HashMap<Uuid, OpenSession>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for QuizSessions {
    fn default() -> Self {
        Self::with_limits(SESSION_TTL, MAX_OPEN_SESSIONS)
    }
}

impl QuizSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&self, session: QuizSession) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.lock();

        let before = sessions.len();
        sessions.retain(|_, open| now.duration_since(open.touched_at) < self.ttl);
        if sessions.len() < before {
            debug!("Expired {} idle quiz sessions", before - sessions.len());
        }

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, open)| open.touched_at)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    debug!("Evicted quiz session {oldest}: too many open sessions");
                }
                None => break,
            }
        }

        sessions.insert(
            id,
            OpenSession {
                session,
                touched_at: now,
            },
        );
        id
    }

    /// Runs `f` against the session, if it exists and has not expired.
    /// Access counts as activity.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> R) -> Option<R> {
        let now = Instant::now();
        let mut sessions = self.lock();
        let expired = sessions
            .get(&id)
            .is_some_and(|open| now.duration_since(open.touched_at) >= self.ttl);
        if expired {
            sessions.remove(&id);
            debug!("Quiz session {id} expired");
            return None;
        }

        let open = sessions.get_mut(&id)?;
        open.touched_at = now;
        Some(f(&mut open.session))
    }

    pub fn remove(&self, id: Uuid) -> Option<QuizSession> {
        self.lock().remove(&id).map(|open| open.session)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, OpenSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::questions::QUESTIONS;

    #[test]
    fn test_sessions_insert_update_remove() {
        let sessions = QuizSessions::new();
        let id = sessions.insert(QuizSession {
            user_id: "u".to_string(),
            flow: QuizFlow::new(QUESTIONS).unwrap(),
        });

        let index = sessions
            .with_session(id, |session| {
                session.flow.select_option("Oily").unwrap();
                session.flow.current_index()
            })
            .unwrap();
        assert_eq!(index, 1);

        let removed = sessions.remove(id).unwrap();
        assert_eq!(removed.flow.current_index(), 1);
        assert!(sessions.with_session(id, |_| ()).is_none());
    }

    fn new_session() -> QuizSession {
        QuizSession {
            user_id: "u".to_string(),
            flow: QuizFlow::new(QUESTIONS).unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let sessions = QuizSessions::with_limits(Duration::from_secs(60), 10);
        let id = sessions.insert(new_session());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(sessions.with_session(id, |_| ()).is_some());

        // The access above refreshed the session.
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(sessions.with_session(id, |_| ()).is_some());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(sessions.with_session(id, |_| ()).is_none());
        assert_eq!(sessions.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_sweeps_expired_sessions() {
        let sessions = QuizSessions::with_limits(Duration::from_secs(60), 10);
        for _ in 0..5 {
            sessions.insert(new_session());
        }
        tokio::time::advance(Duration::from_secs(61)).await;

        sessions.insert(new_session());
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_least_recently_used() {
        let sessions = QuizSessions::with_limits(Duration::from_secs(600), 2);
        let first = sessions.insert(new_session());
        tokio::time::advance(Duration::from_secs(1)).await;
        let second = sessions.insert(new_session());
        tokio::time::advance(Duration::from_secs(1)).await;
        sessions.with_session(first, |_| ());
        tokio::time::advance(Duration::from_secs(1)).await;

        let third = sessions.insert(new_session());
        assert_eq!(sessions.len(), 2);
        assert!(sessions.with_session(second, |_| ()).is_none());
        assert!(sessions.with_session(first, |_| ()).is_some());
        assert!(sessions.with_session(third, |_| ()).is_some());
    }
}
