use std::sync::Arc;

use tracing::{debug, warn};

use crate::history::store::{KvStore, StoreError};
use crate::models::routine::Routine;

pub const ACTIVE_ROUTINE_KEY: &str = "active_routine";

/// Single-value store holding the routine the presentation layer shows by default.
///
/// Overwritten on every routine generation and when a past entry is reused;
/// cleared only on an explicit reset.
#[derive(Clone)]
pub struct RoutineSlot {
    store: Arc<dyn KvStore>,
}

impl RoutineSlot {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Returns the cached routine. Missing or undecodable values read as `None`.
    pub async fn get(&self) -> Option<Routine> {
        let value = match self.store.get(ACTIVE_ROUTINE_KEY).await {
            Ok(value) => value?,
            Err(e) => {
                warn!("Active routine unreadable, treating as empty: {e}");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(routine) => Some(routine),
            Err(e) => {
                warn!("Active routine is corrupt, treating as empty: {e}");
                None
            }
        }
    }

    pub async fn set(&self, routine: &Routine) -> Result<(), StoreError> {
        let value = serde_json::to_value(routine).map_err(|source| StoreError::Encode {
            key: ACTIVE_ROUTINE_KEY.to_string(),
            source,
        })?;
        self.store.set(ACTIVE_ROUTINE_KEY, &value).await?;
        debug!("Active routine updated");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(ACTIVE_ROUTINE_KEY).await
    }
}
