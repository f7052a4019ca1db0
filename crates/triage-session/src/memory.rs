#![cfg(feature = "memory")]

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use triage_types::{TurnContext, TurnEvent};

use crate::error::SessionError;
use crate::store::{SessionStore, UpdateOutcome};

struct Inner {
    sessions: HashMap<Uuid, TurnContext>,
    events: HashMap<Uuid, Vec<TurnEvent>>,
}

/// In-memory `SessionStore` for local development and tests — not durable across
/// process restarts.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                sessions: HashMap::new(),
                events: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, locale: &str, _input_text: &str) -> Result<TurnContext, SessionError> {
        let context = TurnContext::new(Uuid::new_v4(), locale);
        let mut w = self.inner.write().await;
        w.sessions.insert(context.session_id, context.clone());
        Ok(context)
    }

    async fn get(&self, session_id: Uuid) -> Result<Option<TurnContext>, SessionError> {
        let r = self.inner.read().await;
        Ok(r.sessions.get(&session_id).cloned())
    }

    async fn update(
        &self,
        context: &TurnContext,
        expected_turn_index: u32,
    ) -> Result<UpdateOutcome, SessionError> {
        let mut w = self.inner.write().await;
        let current = w
            .sessions
            .get(&context.session_id)
            .ok_or(SessionError::NotFound(context.session_id))?;
        if current.turn_index != expected_turn_index {
            return Ok(UpdateOutcome::Conflict);
        }
        w.sessions.insert(context.session_id, context.clone());
        Ok(UpdateOutcome::Stored)
    }

    async fn append_event(&self, event: &TurnEvent) -> Result<(), SessionError> {
        let mut w = self.inner.write().await;
        w.events.entry(event.session_id()).or_default().push(event.clone());
        Ok(())
    }

    async fn read_events(&self, session_id: Uuid) -> Result<Vec<TurnEvent>, SessionError> {
        let r = self.inner.read().await;
        Ok(r.events.get(&session_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryStore::new();
        let context = store.create("tr", "basim agriyor").await.unwrap();
        let loaded = store.get(context.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, context.session_id);
        assert_eq!(loaded.turn_index, 0);
    }

    #[tokio::test]
    async fn update_with_stale_turn_index_conflicts() {
        let store = MemoryStore::new();
        let mut context = store.create("tr", "").await.unwrap();
        context.turn_index = 1;
        let outcome = store.update(&context, 5).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Conflict);
    }

    #[tokio::test]
    async fn update_with_matching_turn_index_stores() {
        let store = MemoryStore::new();
        let mut context = store.create("tr", "").await.unwrap();
        context.turn_index = 1;
        let outcome = store.update(&context, 0).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Stored);
        let loaded = store.get(context.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.turn_index, 1);
    }

    #[tokio::test]
    async fn events_accumulate_per_session() {
        let store = MemoryStore::new();
        let context = store.create("tr", "").await.unwrap();
        store
            .append_event(&TurnEvent::SessionCreated {
                session_id: context.session_id,
            })
            .await
            .unwrap();
        let events = store.read_events(context.session_id).await.unwrap();
        assert_eq!(events.len(), 1);
    }
}
