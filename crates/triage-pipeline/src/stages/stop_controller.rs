//! Stop Controller (C9): decides QUESTION vs RESULT, checked in priority order.

use triage_reference::StopRules;
use triage_types::{FinalScoreEntry, SpecialtyId, StopReason};
use std::collections::BTreeMap;

/// `should_stop(turn_index, top_disease_score, final_scores, question_available,
/// stop_rules) -> (bool, Option<StopReason>)`.
pub fn should_stop(
    turn_index: u32,
    top_disease_score: f64,
    final_scores: &BTreeMap<SpecialtyId, FinalScoreEntry>,
    question_available: bool,
    stop_rules: &StopRules,
) -> (bool, Option<StopReason>) {
    if turn_index >= stop_rules.max_questions {
        return (true, Some(StopReason::MaxQuestionsReached));
    }

    if top_disease_score >= stop_rules.high_confidence_disease_score {
        return (true, Some(StopReason::HighConfidenceSingleDisease));
    }

    let mut scores: Vec<f64> = final_scores.values().map(|e| e.final_score).collect();
    scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    if scores.len() >= 2 && (scores[0] - scores[1]) >= stop_rules.min_specialty_score_gap {
        return (true, Some(StopReason::ClearSpecialtyWinner));
    }

    if !question_available {
        return (true, Some(StopReason::NoMoreDiscriminativeQuestions));
    }

    (false, None)
}
