use async_trait::async_trait;
use uuid::Uuid;

use triage_types::{TurnContext, TurnEvent};

use crate::error::SessionError;

/// Outcome of an optimistic-concurrency update: a stored `turn_index` that no longer
/// matches the caller's expectation is a `Conflict`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Stored,
    Conflict,
}

/// Persistence for per-session `TurnContext` state and its append-only event log.
/// The turn pipeline never talks to storage directly — only `TurnService` does,
/// through this trait — so swapping `MemoryStore` for a Postgres-backed store never
/// touches pipeline code.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a brand-new session and returns its initial, empty `TurnContext`.
    /// `input_text` is accepted for parity with the abstract contract (an
    /// implementation may want to log it) but is never folded into the context here —
    /// the first call to the turn pipeline does that.
    async fn create(&self, locale: &str, input_text: &str) -> Result<TurnContext, SessionError>;

    async fn get(&self, session_id: Uuid) -> Result<Option<TurnContext>, SessionError>;

    /// Compare-and-swap on `turn_index`: stores `context` only if the currently
    /// persisted turn_index equals `expected_turn_index`.
    async fn update(
        &self,
        context: &TurnContext,
        expected_turn_index: u32,
    ) -> Result<UpdateOutcome, SessionError>;

    async fn append_event(&self, event: &TurnEvent) -> Result<(), SessionError>;

    async fn read_events(&self, session_id: Uuid) -> Result<Vec<TurnEvent>, SessionError>;
}
