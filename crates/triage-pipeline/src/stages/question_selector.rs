//! Question Selector (C8): picks the single most discriminative unasked question.
//! Implements the richer, effectiveness-aware selector only (see the repo's design
//! notes on the Question Selector duplication in the original).

use std::collections::{BTreeMap, BTreeSet};

use triage_reference::{EffectivenessEntry, ReferenceRuntime};
use triage_types::{Canonical, DiseaseCandidate, QuestionPayload};

fn disc_score(count: usize, pool_size: usize) -> f64 {
    if pool_size == 0 {
        return 0.0;
    }
    1.0 - ((count as f64 / pool_size as f64) - 0.5).abs()
}

/// `select(candidates, known, denied, asked, effectiveness) -> Option<QuestionPayload>`.
/// Fewer than two candidates means no discrimination is possible.
pub fn select(
    candidates: &[DiseaseCandidate],
    known: &BTreeSet<Canonical>,
    denied: &BTreeSet<Canonical>,
    asked: &BTreeSet<Canonical>,
    runtime: &ReferenceRuntime,
) -> Option<QuestionPayload> {
    if candidates.len() < 2 {
        return None;
    }

    let mut hit_counts: BTreeMap<Canonical, usize> = BTreeMap::new();
    for candidate in candidates {
        let symptoms_in_candidate: BTreeSet<&String> =
            candidate.matched.iter().chain(candidate.missing.iter()).collect();
        // A candidate's own matched/missing sets never overlap, but guard anyway.
        let mut canonicals_seen: BTreeSet<Canonical> = BTreeSet::new();
        for symptom in symptoms_in_candidate {
            let reference_symptom = triage_types::ReferenceSymptom::new(symptom.clone());
            if let Some(Some(canonical)) = runtime.reference_to_canonical.get(&reference_symptom) {
                canonicals_seen.insert(canonical.clone());
            }
        }
        for canonical in canonicals_seen {
            *hit_counts.entry(canonical).or_insert(0) += 1;
        }
    }

    let pool_size = candidates.len();
    let mut scored: Vec<(f64, Canonical)> = Vec::new();

    for (canonical, count) in &hit_counts {
        if known.contains(canonical) || denied.contains(canonical) || asked.contains(canonical) {
            continue;
        }
        let Some(question) = runtime.question_bank.get(canonical) else {
            continue;
        };
        if question.skip_if_denied.iter().any(|prereq| denied.contains(prereq.as_str())) {
            continue;
        }

        let mut disc = disc_score(*count, pool_size);
        let priority_hit = question
            .priority_when_known
            .iter()
            .any(|token| known.contains(token.as_str()));
        if priority_hit {
            disc += 0.35;
        }

        let score = match runtime.question_effectiveness.get(canonical) {
            Some(eff) => weighted_score(disc, eff),
            None => disc,
        };

        scored.push((score, canonical.clone()));
    }

    scored.sort_by(|(score_a, canon_a), (score_b, canon_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| canon_a.cmp(canon_b))
    });

    let (_, chosen) = scored.into_iter().next()?;
    let def = runtime.question_bank.get(&chosen)?;
    Some(QuestionPayload {
        canonical: chosen.to_string(),
        text: def.text.clone(),
        answer_type: def.answer_type,
        choices: def.choices.clone(),
    })
}

fn weighted_score(boosted_disc: f64, effectiveness: &EffectivenessEntry) -> f64 {
    let coverage_penalty = if effectiveness.asked_count >= 80 && effectiveness.effectiveness_0_1 < 0.35 {
        0.10
    } else {
        0.0
    };
    0.55 * (2.0 * boosted_disc) + 0.35 * effectiveness.effectiveness_0_1 + 0.10 * effectiveness.balance_0_1
        - coverage_penalty
}
