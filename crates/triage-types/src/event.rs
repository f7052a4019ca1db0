use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An append-only event emitted once per stage decision. The event log is an
/// external collaborator (multi-writer, uncoordinated); this type only models what
/// gets appended to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnEvent {
    SessionCreated {
        session_id: Uuid,
    },
    CanonicalsExtracted {
        session_id: Uuid,
        turn_index: u32,
        canonicals: Vec<String>,
    },
    AnswerRecorded {
        session_id: Uuid,
        turn_index: u32,
        canonical: String,
        value: String,
    },
    EmergencyTriggered {
        session_id: Uuid,
        turn_index: u32,
        rule_id: String,
    },
    SpecialtyScored {
        session_id: Uuid,
        turn_index: u32,
        top_specialty: Option<String>,
    },
    DiseaseCandidatesGenerated {
        session_id: Uuid,
        turn_index: u32,
        count: usize,
    },
    StopEvaluated {
        session_id: Uuid,
        turn_index: u32,
        stopped: bool,
        reason: Option<String>,
    },
    QuestionEmitted {
        session_id: Uuid,
        turn_index: u32,
        canonical: String,
    },
    EnvelopeResult {
        session_id: Uuid,
        turn_index: u32,
        envelope_type: String,
    },
    SessionConflictRetried {
        session_id: Uuid,
        turn_index: u32,
    },
}

impl TurnEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            TurnEvent::SessionCreated { session_id }
            | TurnEvent::CanonicalsExtracted { session_id, .. }
            | TurnEvent::AnswerRecorded { session_id, .. }
            | TurnEvent::EmergencyTriggered { session_id, .. }
            | TurnEvent::SpecialtyScored { session_id, .. }
            | TurnEvent::DiseaseCandidatesGenerated { session_id, .. }
            | TurnEvent::StopEvaluated { session_id, .. }
            | TurnEvent::QuestionEmitted { session_id, .. }
            | TurnEvent::EnvelopeResult { session_id, .. }
            | TurnEvent::SessionConflictRetried { session_id, .. } => *session_id,
        }
    }
}
