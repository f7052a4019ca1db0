#![cfg(feature = "postgres")]

use async_trait::async_trait;
use uuid::Uuid;

use triage_types::{TurnContext, TurnEvent};

use crate::error::SessionError;
use crate::store::{SessionStore, UpdateOutcome};

/// PostgreSQL-backed `SessionStore`. State is stored as a JSONB blob per session
/// (`TurnContext` round-trips through serde); the event log is append-only rows.
pub struct PostgresSessionStore {
    pool: sqlx::PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, SessionError> {
        let pool = sqlx::PgPool::connect(database_url)
            .await
            .map_err(backend_err)?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), SessionError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| SessionError::Backend(err.to_string()))
    }
}

fn backend_err(err: sqlx::Error) -> SessionError {
    SessionError::Backend(err.to_string())
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, locale: &str, _input_text: &str) -> Result<TurnContext, SessionError> {
        let context = TurnContext::new(Uuid::new_v4(), locale);
        let state = serde_json::to_value(&context)?;

        sqlx::query(
            r#"
            INSERT INTO triage_sessions (session_id, turn_index, state)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(context.session_id)
        .bind(context.turn_index as i32)
        .bind(&state)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;

        Ok(context)
    }

    async fn get(&self, session_id: Uuid) -> Result<Option<TurnContext>, SessionError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT state FROM triage_sessions WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend_err)?;

        match row {
            Some((state,)) => Ok(Some(serde_json::from_value(state)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        context: &TurnContext,
        expected_turn_index: u32,
    ) -> Result<UpdateOutcome, SessionError> {
        let state = serde_json::to_value(context)?;

        let result = sqlx::query(
            r#"
            UPDATE triage_sessions
            SET state = $1, turn_index = $2, updated_at = now()
            WHERE session_id = $3 AND turn_index = $4
            "#,
        )
        .bind(&state)
        .bind(context.turn_index as i32)
        .bind(context.session_id)
        .bind(expected_turn_index as i32)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;

        if result.rows_affected() == 0 {
            if self.get(context.session_id).await?.is_none() {
                return Err(SessionError::NotFound(context.session_id));
            }
            return Ok(UpdateOutcome::Conflict);
        }
        Ok(UpdateOutcome::Stored)
    }

    async fn append_event(&self, event: &TurnEvent) -> Result<(), SessionError> {
        let payload = serde_json::to_value(event)?;
        sqlx::query("INSERT INTO triage_events (session_id, event) VALUES ($1, $2)")
            .bind(event.session_id())
            .bind(&payload)
            .execute(&self.pool)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn read_events(&self, session_id: Uuid) -> Result<Vec<TurnEvent>, SessionError> {
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as(
            "SELECT event FROM triage_events WHERE session_id = $1 ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend_err)?;

        rows.into_iter()
            .map(|(value,)| serde_json::from_value(value).map_err(SessionError::from))
            .collect()
    }
}
