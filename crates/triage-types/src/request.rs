use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical::Canonical;
use crate::profile::Profile;

/// A structured answer to a previously-asked question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerIn {
    pub canonical: Canonical,
    pub value: String,
}

/// Inbound request for `POST /triage/turn`, and the argument shape of
/// `TurnOrchestrator::handle_turn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub locale: String,
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub answer: Option<AnswerIn>,
    #[serde(default)]
    pub profile: Profile,
}

impl TurnRequest {
    pub fn is_empty_input(&self) -> bool {
        self.user_message.trim().is_empty() && self.answer.is_none()
    }
}
