//! Envelope Builder (C10): deterministic assembly of the four envelope payloads.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use triage_types::{
    Canonical, ConditionSummary, DiseaseCandidate, EmergencyPayload, Envelope, EnvelopePayload,
    ErrorPayload, FinalScoreEntry, QuestionPayload, RecommendedSpecialty, ResultPayload,
    RiskAssessment, RiskLevel, SpecialtyId, StopReason, Urgency,
};

const FIXED_SAFETY_NOTES: &[&str] = &[
    "This assessment is not a medical diagnosis.",
    "If symptoms worsen suddenly, seek emergency care immediately.",
    "Bring a list of current medications to your appointment.",
];

use super::final_merge::top_specialty;

pub fn build_question(session_id: Uuid, turn_index: u32, question: QuestionPayload) -> Envelope {
    Envelope::new(session_id, turn_index, EnvelopePayload::Question(question))
}

fn urgency_for(level: RiskLevel) -> Urgency {
    match level {
        RiskLevel::High => Urgency::SameDay,
        RiskLevel::Medium => Urgency::Within3Days,
        RiskLevel::Low => Urgency::Routine,
    }
}

fn safety_notes_for(display_name: &str) -> Vec<String> {
    let mut notes: Vec<String> = FIXED_SAFETY_NOTES.iter().map(|s| s.to_string()).collect();
    let lowered = display_name.to_lowercase();
    if lowered.contains("neurolog") {
        notes.push(
            "Seek immediate care for sudden weakness, confusion, or difficulty speaking.".to_string(),
        );
    }
    if lowered.contains("cardiolog") {
        notes.push(
            "Seek immediate care for chest pain, pressure, or shortness of breath at rest."
                .to_string(),
        );
    }
    notes
}

#[allow(clippy::too_many_arguments)]
pub fn build_result(
    session_id: Uuid,
    turn_index: u32,
    final_scores: &BTreeMap<SpecialtyId, FinalScoreEntry>,
    disease_candidates: &[DiseaseCandidate],
    known_symptoms: &BTreeSet<Canonical>,
    answers: &BTreeMap<Canonical, String>,
    risk: RiskAssessment,
    stop_reason: StopReason,
    low_confidence: bool,
) -> Envelope {
    let (specialty_id, entry) = top_specialty(final_scores)
        .map(|(id, e)| (id.clone(), e.clone()))
        .unwrap_or_else(|| {
            (
                SpecialtyId::new("general_internal_medicine"),
                FinalScoreEntry {
                    final_score: 0.0,
                    rules_score: 0.0,
                    prior_score: 0.0,
                    keyword_score: 0,
                    display_name: "General internal medicine".to_string(),
                },
            )
        });

    let top_conditions: Vec<ConditionSummary> = disease_candidates
        .iter()
        .take(3)
        .map(|c| ConditionSummary {
            disease_label: c.disease_label.clone(),
            score_0_1: c.score_0_1,
        })
        .collect();

    let mut summary_keys: BTreeSet<Canonical> = known_symptoms.clone();
    summary_keys.extend(answers.keys().cloned());
    let summary_lines: Vec<String> = summary_keys
        .into_iter()
        .map(|canonical| match answers.get(&canonical) {
            Some(value) => format!("{canonical}: {value}"),
            None => format!("{canonical}: present"),
        })
        .collect();

    let safety_notes = safety_notes_for(&entry.display_name);

    let payload = ResultPayload {
        urgency: urgency_for(risk.level),
        recommended_specialty: RecommendedSpecialty {
            id: specialty_id.to_string(),
            display_name: entry.display_name,
            final_score: entry.final_score,
        },
        top_conditions,
        summary_lines,
        safety_notes,
        risk,
        stop_reason: stop_reason_code(stop_reason),
        low_confidence,
    };

    Envelope::new(session_id, turn_index, EnvelopePayload::Result(payload))
}

pub fn build_emergency(
    session_id: Uuid,
    turn_index: u32,
    rule_id: String,
    reason: String,
    instructions: Vec<String>,
    missing_info_to_confirm: Vec<String>,
) -> Envelope {
    Envelope::new(
        session_id,
        turn_index,
        EnvelopePayload::Emergency(EmergencyPayload {
            rule_id,
            reason,
            instructions,
            missing_info_to_confirm,
        }),
    )
}

pub fn build_error(session_id: Uuid, turn_index: u32, code: &str, message: String, retryable: bool) -> Envelope {
    Envelope::new(
        session_id,
        turn_index,
        EnvelopePayload::Error(ErrorPayload {
            code: code.to_string(),
            message,
            retryable,
        }),
    )
}

fn stop_reason_code(reason: StopReason) -> String {
    match reason {
        StopReason::MaxQuestionsReached => "MAX_QUESTIONS_REACHED",
        StopReason::HighConfidenceSingleDisease => "HIGH_CONFIDENCE_SINGLE_DISEASE",
        StopReason::ClearSpecialtyWinner => "CLEAR_SPECIALTY_WINNER",
        StopReason::NoMoreDiscriminativeQuestions => "NO_MORE_DISCRIMINATIVE_QUESTIONS",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_types::RiskLevel;

    fn risk(level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            level,
            score_0_1: 0.5,
            reasons: vec![],
            advice: "advice".to_string(),
        }
    }

    #[test]
    fn result_envelope_has_stable_kind() {
        let envelope = build_result(
            Uuid::nil(),
            1,
            &BTreeMap::new(),
            &[],
            &BTreeSet::new(),
            &BTreeMap::new(),
            risk(RiskLevel::Low),
            StopReason::NoMoreDiscriminativeQuestions,
            false,
        );
        assert_eq!(envelope.kind, triage_types::EnvelopeKind::Result);
    }

    #[test]
    fn summary_lines_are_canonical_sorted() {
        let mut known = BTreeSet::new();
        known.insert(Canonical::new("ates"));
        known.insert(Canonical::new("bas agrisi"));
        let envelope = build_result(
            Uuid::nil(),
            1,
            &BTreeMap::new(),
            &[],
            &known,
            &BTreeMap::new(),
            risk(RiskLevel::Low),
            StopReason::NoMoreDiscriminativeQuestions,
            false,
        );
        if let EnvelopePayload::Result(payload) = envelope.payload {
            assert_eq!(payload.summary_lines, vec!["ates: present", "bas agrisi: present"]);
        } else {
            panic!("expected result payload");
        }
    }

    #[test]
    fn high_risk_maps_to_same_day_urgency() {
        let envelope = build_result(
            Uuid::nil(),
            1,
            &BTreeMap::new(),
            &[],
            &BTreeSet::new(),
            &BTreeMap::new(),
            risk(RiskLevel::High),
            StopReason::HighConfidenceSingleDisease,
            false,
        );
        if let EnvelopePayload::Result(payload) = envelope.payload {
            assert_eq!(payload.urgency, Urgency::SameDay);
        } else {
            panic!("expected result payload");
        }
    }
}
