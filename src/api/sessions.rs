//! Live editing sessions, keyed by id and evicted after an idle period.

use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::error::ApiError;
use crate::certificate::EditingSession;

/// A session shared between requests. The lock is never held across `.await`.
pub type SharedSession = Arc<Mutex<EditingSession>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_ttl)
            .max_capacity(1_000)
            .build();
        Self { sessions }
    }

    pub async fn insert(&self, session: EditingSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone()).await;
        shared
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        self.sessions
            .get(&id)
            .await
            .ok_or(ApiError::SessionNotFound(id))
    }

    pub async fn remove(&self, id: Uuid) {
        self.sessions.invalidate(&id).await;
    }
}
