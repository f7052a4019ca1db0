//! Final Decision Merger (C6): combines cumulative specialty scores with
//! disease-candidate priors into one deterministic specialty ranking.

use std::collections::BTreeMap;

use triage_reference::ReferenceRuntime;
use triage_types::{DiseaseCandidate, FinalScoreEntry, SpecialtyId, SpecialtyScoreState};

fn prior_points(rank: usize) -> f64 {
    match rank {
        1 => 4.0,
        2 => 3.0,
        3 => 2.0,
        4 => 1.0,
        _ => 1.0,
    }
}

/// `merge(specialty_scores, disease_candidates) -> final_scores`.
pub fn merge(
    specialty_scores: &BTreeMap<SpecialtyId, SpecialtyScoreState>,
    disease_candidates: &[DiseaseCandidate],
    runtime: &ReferenceRuntime,
) -> BTreeMap<SpecialtyId, FinalScoreEntry> {
    let mut prior_scores: BTreeMap<SpecialtyId, f64> = BTreeMap::new();

    for (idx, candidate) in disease_candidates.iter().enumerate() {
        let rank = idx + 1;
        let (specialty_id, confidence) = match runtime.disease_to_specialty.get(&candidate.disease_label) {
            Some(mapping) => (SpecialtyId::new(mapping.specialty_id.clone()), mapping.confidence),
            None => (SpecialtyId::new(runtime.fallback_specialty_id.clone()), 0.5),
        };
        *prior_scores.entry(specialty_id).or_insert(0.0) += prior_points(rank) * confidence;
    }

    let mut ids: Vec<SpecialtyId> = specialty_scores.keys().cloned().collect();
    for id in prior_scores.keys() {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }

    let mut final_scores = BTreeMap::new();
    for id in ids {
        let state = specialty_scores.get(&id).cloned().unwrap_or_default();
        let rules_score = state.score as f64;
        let prior_score = prior_scores.get(&id).copied().unwrap_or(0.0);
        let display_name = runtime
            .specialty_by_id
            .get(id.as_str())
            .map(|def| def.display_name.clone())
            .or_else(|| {
                runtime
                    .disease_to_specialty
                    .values()
                    .find(|m| m.specialty_id == id.as_str())
                    .map(|m| m.display_name.clone())
            })
            .unwrap_or_else(|| id.to_string());

        final_scores.insert(
            id,
            FinalScoreEntry {
                final_score: rules_score + prior_score,
                rules_score,
                prior_score,
                keyword_score: state.keyword_score,
                display_name,
            },
        );
    }

    if final_scores.values().all(|e| e.final_score == 0.0) {
        let fallback_id = SpecialtyId::new(runtime.fallback_specialty_id.clone());
        final_scores.entry(fallback_id.clone()).or_insert_with(|| FinalScoreEntry {
            final_score: 0.0,
            rules_score: 0.0,
            prior_score: 0.0,
            keyword_score: 0,
            display_name: runtime
                .specialty_by_id
                .get(fallback_id.as_str())
                .map(|def| def.display_name.clone())
                .unwrap_or_else(|| fallback_id.to_string()),
        });
    }

    final_scores
}

/// Strict total order: `(-final_score, -keyword_score, specialty_id_ascending)`.
pub fn top_specialty(
    final_scores: &BTreeMap<SpecialtyId, FinalScoreEntry>,
) -> Option<(&SpecialtyId, &FinalScoreEntry)> {
    final_scores.iter().min_by(|(id_a, a), (id_b, b)| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.keyword_score.cmp(&a.keyword_score))
            .then_with(|| id_a.cmp(id_b))
    })
}
