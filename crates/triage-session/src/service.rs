use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use triage_pipeline::stages::envelope_builder;
use triage_reference::ReferenceRuntime;
use triage_types::{AnswerIn, Envelope, Profile, TriageError, TurnEvent};

use crate::store::{SessionStore, UpdateOutcome};

/// Wires a `SessionStore` around the pure pipeline in `triage-pipeline`, implementing
/// the full turn contract: session load-or-create, the `SESSION_COMPLETE` guard,
/// one optimistic-concurrency retry, a caller-supplied deadline, and event-log writes.
pub struct TurnService<S: SessionStore + ?Sized> {
    store: Arc<S>,
    runtime: Arc<ReferenceRuntime>,
}

impl<S: SessionStore + ?Sized> TurnService<S> {
    pub fn new(store: Arc<S>, runtime: Arc<ReferenceRuntime>) -> Self {
        Self { store, runtime }
    }

    pub async fn handle_turn(
        &self,
        session_id: Option<Uuid>,
        locale: &str,
        user_message: &str,
        answer: Option<AnswerIn>,
        profile: Profile,
        deadline: Duration,
    ) -> Envelope {
        match tokio::time::timeout(
            deadline,
            self.run_turn(session_id, locale, user_message, answer, profile),
        )
        .await
        {
            Ok(envelope) => envelope,
            Err(_) => error_envelope(session_id.unwrap_or_else(Uuid::nil), TriageError::DeadlineExceeded),
        }
    }

    async fn run_turn(
        &self,
        session_id: Option<Uuid>,
        locale: &str,
        user_message: &str,
        answer: Option<AnswerIn>,
        profile: Profile,
    ) -> Envelope {
        if user_message.trim().is_empty() && answer.is_none() {
            return error_envelope(session_id.unwrap_or_else(Uuid::nil), TriageError::EmptyInput);
        }

        let mut context = match session_id {
            Some(id) => match self.store.get(id).await {
                Ok(Some(context)) => context,
                Ok(None) => return error_envelope(id, TriageError::SessionNotFound(id)),
                Err(err) => {
                    return error_envelope(id, TriageError::DownstreamFailure(err.to_string()))
                }
            },
            None => match self.store.create(locale, user_message).await {
                Ok(context) => context,
                Err(err) => {
                    return error_envelope(Uuid::nil(), TriageError::DownstreamFailure(err.to_string()))
                }
            },
        };

        if context.is_complete {
            return error_envelope(context.session_id, TriageError::SessionComplete(context.session_id));
        }

        let previous_turn_index = context.turn_index;
        let (envelope, events) = triage_pipeline::handle_turn(
            &mut context,
            user_message,
            answer.clone(),
            &profile,
            &self.runtime,
        );

        match self.store.update(&context, previous_turn_index).await {
            Ok(UpdateOutcome::Stored) => {}
            Ok(UpdateOutcome::Conflict) => {
                // One retry against freshly reloaded state, per the spec's
                // SessionConflict handling.
                let reloaded = match self.store.get(context.session_id).await {
                    Ok(Some(c)) => c,
                    Ok(None) => {
                        return error_envelope(
                            context.session_id,
                            TriageError::SessionNotFound(context.session_id),
                        )
                    }
                    Err(err) => {
                        return error_envelope(
                            context.session_id,
                            TriageError::DownstreamFailure(err.to_string()),
                        )
                    }
                };
                if reloaded.is_complete {
                    return error_envelope(
                        reloaded.session_id,
                        TriageError::SessionComplete(reloaded.session_id),
                    );
                }
                let retry_previous_turn_index = reloaded.turn_index;
                let mut retry_context = reloaded;
                let (retry_envelope, retry_events) = triage_pipeline::handle_turn(
                    &mut retry_context,
                    user_message,
                    answer,
                    &profile,
                    &self.runtime,
                );
                match self.store.update(&retry_context, retry_previous_turn_index).await {
                    Ok(UpdateOutcome::Stored) => {
                        self.persist_events(retry_context.session_id, retry_events).await;
                        return retry_envelope;
                    }
                    _ => {
                        return error_envelope(
                            retry_context.session_id,
                            TriageError::SessionConflict(retry_context.session_id),
                        )
                    }
                }
            }
            Err(err) => {
                return error_envelope(
                    context.session_id,
                    TriageError::DownstreamFailure(err.to_string()),
                )
            }
        }

        self.persist_events(context.session_id, events).await;
        envelope
    }

    /// Event-log writes are non-critical per the spec's `DownstreamFailure` handling:
    /// a failed append is logged and swallowed rather than surfaced to the caller.
    async fn persist_events(&self, session_id: Uuid, events: Vec<TurnEvent>) {
        for event in events {
            if let Err(err) = self.store.append_event(&event).await {
                tracing::warn!(%session_id, %err, "failed to append turn event, continuing");
            }
        }
    }
}

fn error_envelope(session_id: Uuid, error: TriageError) -> Envelope {
    envelope_builder::build_error(session_id, 0, error.code(), error.to_string(), error.retryable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use triage_types::EnvelopeKind;

    fn bare_runtime() -> ReferenceRuntime {
        ReferenceRuntime {
            locale: "tr".to_string(),
            synonym_index: Default::default(),
            disease_symptom_matrix: Default::default(),
            severity_weights: Default::default(),
            reference_to_canonical: Default::default(),
            canonical_to_reference: Default::default(),
            disease_to_specialty: Default::default(),
            fallback_specialty_id: "general_internal_medicine".to_string(),
            specialty_by_id: Default::default(),
            scoring: Default::default(),
            question_bank: Default::default(),
            emergency_rules: triage_reference::EmergencyRules {
                hard_triggers: vec![],
                soft_triggers: vec![],
                age_risk: triage_reference::AgeRisk {
                    min: 0,
                    max: 0,
                    min2: 0,
                    max2: 0,
                },
            },
            risk_rules: triage_reference::RiskRules {
                high: triage_reference::rules::HighRiskBand {
                    canonicals_any: vec![],
                    same_day_required: false,
                },
                medium: triage_reference::rules::MediumRiskBand {
                    canonicals_any: vec![],
                    same_day_if_true: true,
                },
            },
            stop_rules: triage_reference::StopRules {
                max_questions: 5,
                high_confidence_disease_score: 0.8,
                min_specialty_score_gap: 0.3,
            },
            candidate_config: Default::default(),
            question_effectiveness: Default::default(),
        }
    }

    #[tokio::test]
    async fn empty_input_without_session_is_error() {
        let service = TurnService::new(Arc::new(MemoryStore::new()), Arc::new(bare_runtime()));
        let envelope = service
            .handle_turn(None, "tr", "", None, Profile::default(), Duration::from_secs(1))
            .await;
        assert_eq!(envelope.kind, EnvelopeKind::Error);
    }

    #[tokio::test]
    async fn unknown_session_is_error() {
        let service = TurnService::new(Arc::new(MemoryStore::new()), Arc::new(bare_runtime()));
        let envelope = service
            .handle_turn(
                Some(Uuid::new_v4()),
                "tr",
                "basim agriyor",
                None,
                Profile::default(),
                Duration::from_secs(1),
            )
            .await;
        assert_eq!(envelope.kind, EnvelopeKind::Error);
    }

    #[tokio::test]
    async fn fresh_session_yields_non_error_envelope() {
        let service = TurnService::new(Arc::new(MemoryStore::new()), Arc::new(bare_runtime()));
        let envelope = service
            .handle_turn(
                None,
                "tr",
                "basim agriyor",
                None,
                Profile::default(),
                Duration::from_secs(1),
            )
            .await;
        assert_ne!(envelope.kind, EnvelopeKind::Error);
    }

    #[tokio::test]
    async fn completed_session_rejects_further_turns() {
        let store = Arc::new(MemoryStore::new());
        let service = TurnService::new(store.clone(), Arc::new(bare_runtime()));
        let first = service
            .handle_turn(
                None,
                "tr",
                "basim agriyor",
                None,
                Profile::default(),
                Duration::from_secs(1),
            )
            .await;
        // With an empty reference runtime, no discriminative question exists, so the
        // very first turn already terminates the session.
        assert_eq!(first.kind, EnvelopeKind::Result);

        let second = service
            .handle_turn(
                Some(first.session_id),
                "tr",
                "basim hala agriyor",
                None,
                Profile::default(),
                Duration::from_secs(1),
            )
            .await;
        assert_eq!(second.kind, EnvelopeKind::Error);
    }
}
