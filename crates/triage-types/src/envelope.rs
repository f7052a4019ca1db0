use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::risk::RiskAssessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeKind {
    Question,
    Result,
    Emergency,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    YesNo,
    Number,
    MultiChoice,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub canonical: String,
    pub text: String,
    pub answer_type: AnswerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    ErNow,
    SameDay,
    Within3Days,
    Routine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSpecialty {
    pub id: String,
    pub display_name: String,
    pub final_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub disease_label: String,
    pub score_0_1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub urgency: Urgency,
    pub recommended_specialty: RecommendedSpecialty,
    pub top_conditions: Vec<ConditionSummary>,
    pub summary_lines: Vec<String>,
    pub safety_notes: Vec<String>,
    pub risk: RiskAssessment,
    pub stop_reason: String,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyPayload {
    pub rule_id: String,
    pub reason: String,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_info_to_confirm: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopePayload {
    Question(QuestionPayload),
    Result(ResultPayload),
    Emergency(EmergencyPayload),
    Error(ErrorPayload),
}

impl EnvelopePayload {
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            EnvelopePayload::Question(_) => EnvelopeKind::Question,
            EnvelopePayload::Result(_) => EnvelopeKind::Result,
            EnvelopePayload::Emergency(_) => EnvelopeKind::Emergency,
            EnvelopePayload::Error(_) => EnvelopeKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub timestamp: DateTime<Utc>,
    pub disclaimer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_discovery: Option<serde_json::Value>,
}

impl EnvelopeMeta {
    pub fn now(disclaimer: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            disclaimer: disclaimer.into(),
            facility_discovery: None,
        }
    }
}

/// The tagged, boundary-crossing output of a single turn. Field order is part of the
/// wire contract: `type`, `session_id`, `turn_index`, `payload`, `meta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub session_id: Uuid,
    pub turn_index: u32,
    pub payload: EnvelopePayload,
    pub meta: EnvelopeMeta,
}

pub const DISCLAIMER: &str =
    "This is not a medical diagnosis. For emergencies, contact local emergency services.";

impl Envelope {
    pub fn new(session_id: Uuid, turn_index: u32, payload: EnvelopePayload) -> Self {
        Self {
            kind: payload.kind(),
            session_id,
            turn_index,
            payload,
            meta: EnvelopeMeta::now(DISCLAIMER),
        }
    }
}
