//! Turn Orchestrator (C11): wires C1-C10 around a single `TurnContext`, excluding the
//! session-store handoff (owned by the caller — see `triage-session`).

use triage_reference::ReferenceRuntime;
use triage_types::{
    AnswerIn, Canonical, Envelope, Profile, StopReason, TurnContext, TurnEvent,
};

use crate::duration::extract_duration_days;
use crate::stages::{
    canonical_extractor, disease_candidates, envelope_builder, final_merge, question_selector,
    risk_stratifier, safety_guard, specialty_scorer, stop_controller,
};

const AFFIRMATIVE_TOKENS: &[&str] = &["evet", "var", "yes"];
const NEGATIVE_TOKENS: &[&str] = &["hayir", "yok", "no"];

fn is_negative_answer(value: &str, locale: &str) -> bool {
    let normalized = triage_types::normalize(value, locale);
    NEGATIVE_TOKENS.iter().any(|tok| normalized == *tok || normalized.contains(tok))
        && !AFFIRMATIVE_TOKENS.iter().any(|tok| normalized == *tok)
}

/// Runs one turn to completion against an already loaded, non-terminal `context`.
/// Preconditions (empty-input rejection, `SessionComplete` rejection) are the
/// caller's responsibility, since they depend on the session store.
pub fn handle_turn(
    context: &mut TurnContext,
    user_message: &str,
    answer: Option<AnswerIn>,
    profile: &Profile,
    runtime: &ReferenceRuntime,
) -> (Envelope, Vec<TurnEvent>) {
    let mut events = Vec::new();
    context.turn_index += 1;

    if !user_message.trim().is_empty() {
        if !context.raw_text_accumulated.is_empty() {
            context.raw_text_accumulated.push(' ');
        }
        context.raw_text_accumulated.push_str(user_message);
    }

    let mut new_evidence_text = triage_types::normalize(user_message, &context.locale);

    if let Some(answer) = &answer {
        context
            .answers
            .insert(answer.canonical.clone(), answer.value.clone());
        if is_negative_answer(&answer.value, &context.locale) {
            context.mark_denied(answer.canonical.clone());
        } else {
            context.mark_known(answer.canonical.clone());
            if !new_evidence_text.is_empty() {
                new_evidence_text.push(' ');
            }
            new_evidence_text.push_str(answer.canonical.as_str());
        }
        events.push(TurnEvent::AnswerRecorded {
            session_id: context.session_id,
            turn_index: context.turn_index,
            canonical: answer.canonical.to_string(),
            value: answer.value.clone(),
        });
    }

    let normalized_accumulated = triage_types::normalize(&context.raw_text_accumulated, &context.locale);

    let extracted = canonical_extractor::extract(
        &normalized_accumulated,
        context.answers.keys().cloned(),
        &runtime.synonym_index,
    );
    for canonical in extracted {
        // A denied canonical can still surface here (it's an answer key fed back into
        // the extractor), but a denial must never be overturned by re-extraction.
        if context.denied_symptoms.contains(&canonical) {
            context.asked_canonicals.insert(canonical);
            continue;
        }
        context.known_symptoms.insert(canonical.clone());
        context.asked_canonicals.insert(canonical);
    }

    events.push(TurnEvent::CanonicalsExtracted {
        session_id: context.session_id,
        turn_index: context.turn_index,
        canonicals: context.known_symptoms.iter().map(|c| c.to_string()).collect(),
    });

    if let Some(days) = extract_duration_days(&normalized_accumulated) {
        context.duration_days = Some(days);
    }

    if let safety_guard::GuardOutcome::Emergency {
        rule_id,
        reason,
        instructions,
        missing_info_to_confirm,
    } = safety_guard::check(&normalized_accumulated, profile, &runtime.emergency_rules)
    {
        context.is_complete = true;
        events.push(TurnEvent::EmergencyTriggered {
            session_id: context.session_id,
            turn_index: context.turn_index,
            rule_id: rule_id.clone(),
        });
        let envelope = envelope_builder::build_emergency(
            context.session_id,
            context.turn_index,
            rule_id,
            reason,
            instructions,
            missing_info_to_confirm,
        );
        events.push(TurnEvent::EnvelopeResult {
            session_id: context.session_id,
            turn_index: context.turn_index,
            envelope_type: "EMERGENCY".to_string(),
        });
        return (envelope, events);
    }

    specialty_scorer::score(&new_evidence_text, &mut context.specialty_scores, runtime);
    events.push(TurnEvent::SpecialtyScored {
        session_id: context.session_id,
        turn_index: context.turn_index,
        top_specialty: final_merge::top_specialty(&context.final_scores).map(|(id, _)| id.to_string()),
    });

    context.disease_candidates = disease_candidates::generate(&context.known_symptoms, runtime);
    events.push(TurnEvent::DiseaseCandidatesGenerated {
        session_id: context.session_id,
        turn_index: context.turn_index,
        count: context.disease_candidates.len(),
    });

    context.final_scores = final_merge::merge(&context.specialty_scores, &context.disease_candidates, runtime);

    let top1 = context.disease_candidates.first().map(|c| c.score_0_1).unwrap_or(0.0);
    let top2 = context.disease_candidates.get(1).map(|c| c.score_0_1).unwrap_or(0.0);
    context.confidence_0_1 = (0.75 * top1 + 0.6 * (top1 - top2).max(0.0)).min(1.0);

    let candidate_question = question_selector::select(
        &context.disease_candidates,
        &context.known_symptoms,
        &context.denied_symptoms,
        &context.asked_canonicals,
        runtime,
    );

    let (mut stop, mut reason) = stop_controller::should_stop(
        context.turn_index,
        top1,
        &context.final_scores,
        candidate_question.is_some(),
        &runtime.stop_rules,
    );

    events.push(TurnEvent::StopEvaluated {
        session_id: context.session_id,
        turn_index: context.turn_index,
        stopped: stop,
        reason: reason.map(stop_reason_code),
    });

    if !stop && candidate_question.is_none() {
        stop = true;
        reason = Some(StopReason::NoMoreDiscriminativeQuestions);
    }

    let envelope = if stop {
        let risk = risk_stratifier::risk(
            &context.known_symptoms,
            context.confidence_0_1,
            context.duration_days,
            profile,
            &runtime.risk_rules,
            false,
        );
        let low_confidence = reason == Some(StopReason::MaxQuestionsReached) || context.confidence_0_1 < 0.35;
        context.stop_reason = reason;
        context.is_complete = true;
        envelope_builder::build_result(
            context.session_id,
            context.turn_index,
            &context.final_scores,
            &context.disease_candidates,
            &context.known_symptoms,
            &context.answers,
            risk,
            reason.unwrap(),
            low_confidence,
        )
    } else {
        let question = candidate_question.unwrap();
        context.asked_canonicals.insert(Canonical::new(question.canonical.clone()));
        events.push(TurnEvent::QuestionEmitted {
            session_id: context.session_id,
            turn_index: context.turn_index,
            canonical: question.canonical.clone(),
        });
        envelope_builder::build_question(context.session_id, context.turn_index, question)
    };

    events.push(TurnEvent::EnvelopeResult {
        session_id: context.session_id,
        turn_index: context.turn_index,
        envelope_type: format!("{:?}", envelope.kind).to_uppercase(),
    });

    (envelope, events)
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
    use crate::test_support::bare_runtime;
    use triage_reference::question_bank::QuestionDef;
    use triage_reference::synonym::{SynonymEntry, SynonymsFile};
    use triage_types::{AnswerType, ReferenceSymptom};
    use uuid::Uuid;

    fn urology_runtime() -> ReferenceRuntime {
        let mut runtime = bare_runtime();
        let synonyms = SynonymsFile {
            synonyms: vec![SynonymEntry {
                canonical: "idrar yanmasi".into(),
                variants: vec!["idrar yaparken yaniyor".into()],
            }],
        };
        runtime.synonym_index = triage_reference::SynonymIndex::build(&synonyms, "tr");
        runtime.reference_to_canonical.insert(
            ReferenceSymptom::new("dysuria"),
            Some(Canonical::new("idrar yanmasi")),
        );
        runtime.canonical_to_reference.insert(
            Canonical::new("idrar yanmasi"),
            vec![ReferenceSymptom::new("dysuria")],
        );
        runtime.disease_symptom_matrix.insert(
            "Urinary tract infection".to_string(),
            vec![ReferenceSymptom::new("dysuria")],
        );
        runtime.disease_to_specialty.insert(
            "Urinary tract infection".to_string(),
            triage_reference::DiseaseSpecialtyMapping {
                specialty_id: "urology_internal".to_string(),
                display_name: "Urology".to_string(),
                confidence: 0.9,
            },
        );
        runtime.specialty_by_id.insert(
            "urology_internal".to_string(),
            triage_reference::SpecialtyDef {
                display_name: "Urology".to_string(),
                keywords: vec!["idrar yanmasi".to_string()],
                negative_keywords: vec![],
            },
        );
        runtime.question_bank.insert(
            Canonical::new("idrar yanmasi"),
            QuestionDef {
                text: "Does it burn when you urinate?".to_string(),
                answer_type: AnswerType::YesNo,
                choices: None,
                priority_when_known: vec![],
                skip_if_denied: vec![],
            },
        );
        runtime
    }

    #[test]
    fn single_symptom_turn_yields_question_or_result_never_panics() {
        let runtime = urology_runtime();
        let mut context = TurnContext::new(Uuid::nil(), "tr");
        let (envelope, events) = handle_turn(
            &mut context,
            "idrar yaparken yaniyor",
            None,
            &Profile::default(),
            &runtime,
        );
        assert!(!events.is_empty());
        assert_ne!(envelope.kind, triage_types::EnvelopeKind::Emergency);
        assert!(context.invariants_hold());
    }

    #[test]
    fn emergency_text_short_circuits() {
        let mut runtime = bare_runtime();
        runtime.emergency_rules.hard_triggers.push(triage_reference::HardTrigger {
            id: "cardiac".to_string(),
            label: "possible cardiac event".to_string(),
            keywords: vec!["gogus agrisi".to_string()],
            regex: None,
            instructions: vec!["Call emergency services.".to_string()],
        });
        let mut context = TurnContext::new(Uuid::nil(), "tr");
        let (envelope, _events) = handle_turn(
            &mut context,
            "gogus agrisi var nefes almakta zorlaniyorum",
            None,
            &Profile::default(),
            &runtime,
        );
        assert_eq!(envelope.kind, triage_types::EnvelopeKind::Emergency);
        assert!(context.is_complete);
    }

    #[test]
    fn turn_index_increments_and_invariants_hold() {
        let runtime = urology_runtime();
        let mut context = TurnContext::new(Uuid::nil(), "tr");
        handle_turn(&mut context, "idrar yanmasi var", None, &Profile::default(), &runtime);
        assert_eq!(context.turn_index, 1);
        assert!(context.invariants_hold());
    }

    #[test]
    fn denied_answer_is_not_resurrected_by_canonical_extraction() {
        let runtime = urology_runtime();
        let mut context = TurnContext::new(Uuid::nil(), "tr");
        // The denied canonical's own text is present in the turn's message, which is
        // exactly the case that previously fed it back into known_symptoms via the
        // answer-key union passed to the extractor.
        let (_, _) = handle_turn(
            &mut context,
            "idrar yanmasi var mi diye sordunuz",
            Some(AnswerIn {
                canonical: Canonical::new("idrar yanmasi"),
                value: "hayir".to_string(),
            }),
            &Profile::default(),
            &runtime,
        );
        assert!(context.denied_symptoms.contains(&Canonical::new("idrar yanmasi")));
        assert!(!context.known_symptoms.contains(&Canonical::new("idrar yanmasi")));
        assert!(context.invariants_hold());
    }
}
