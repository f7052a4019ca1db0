//! Disease Candidate Generator (C4): weighted-Jaccard score of user canonicals
//! against the disease-symptom matrix.

use std::collections::BTreeSet;

use tracing::debug;
use triage_reference::ReferenceRuntime;
use triage_types::{Canonical, DiseaseCandidate, ReferenceSymptom};

/// Translates a canonical into reference-symptom space via the inverse index. When a
/// canonical has no entry, falls back to its own normalized form (spaces ->
/// underscores) as a direct reference-symptom key — preserved from the original
/// implementation as a documented, observable fallback.
fn canonical_to_reference_symptoms(
    canonical: &Canonical,
    runtime: &ReferenceRuntime,
) -> Vec<ReferenceSymptom> {
    if let Some(symptoms) = runtime.canonical_to_reference.get(canonical) {
        return symptoms.clone();
    }
    let fallback_key = canonical.as_str().replace(' ', "_");
    debug!(%canonical, %fallback_key, "canonical has no inverse-index entry, using direct fallback key");
    vec![ReferenceSymptom::new(fallback_key)]
}

fn symptom_weight(symptom: &ReferenceSymptom, runtime: &ReferenceRuntime) -> f64 {
    let default_weight = runtime.candidate_config.default_symptom_weight;
    match runtime.severity_weights.get(symptom) {
        Some(severity) => default_weight + (*severity as f64) * runtime.candidate_config.severity_weight_multiplier,
        None => default_weight,
    }
}

/// `generate(canonicals) -> candidates`, length <= `top_k`, sorted `(-score, disease_label)`.
pub fn generate(canonicals: &BTreeSet<Canonical>, runtime: &ReferenceRuntime) -> Vec<DiseaseCandidate> {
    let user_symptoms: BTreeSet<ReferenceSymptom> = canonicals
        .iter()
        .flat_map(|c| canonical_to_reference_symptoms(c, runtime))
        .collect();

    let mut candidates: Vec<DiseaseCandidate> = Vec::new();

    for (disease_label, disease_symptoms_vec) in &runtime.disease_symptom_matrix {
        let disease_symptoms: BTreeSet<ReferenceSymptom> =
            disease_symptoms_vec.iter().cloned().collect();

        let union: BTreeSet<&ReferenceSymptom> =
            user_symptoms.union(&disease_symptoms).collect();
        let intersection: BTreeSet<&ReferenceSymptom> =
            user_symptoms.intersection(&disease_symptoms).collect();

        if union.is_empty() {
            continue;
        }

        let union_weight: f64 = union.iter().map(|s| symptom_weight(s, runtime)).sum();
        let intersection_weight: f64 = intersection.iter().map(|s| symptom_weight(s, runtime)).sum();

        let score = if union_weight > 0.0 {
            intersection_weight / union_weight
        } else {
            0.0
        };

        if score < runtime.candidate_config.min_score_to_include {
            continue;
        }

        let mut matched: Vec<String> = intersection.iter().map(|s| s.as_str().to_string()).collect();
        matched.sort();
        let mut missing: Vec<String> = disease_symptoms
            .difference(&user_symptoms)
            .map(|s| s.as_str().to_string())
            .collect();
        missing.sort();

        candidates.push(DiseaseCandidate {
            disease_label: disease_label.clone(),
            score_0_1: score,
            matched,
            missing,
        });
    }

    candidates.sort_by(|a, b| {
        b.score_0_1
            .partial_cmp(&a.score_0_1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.disease_label.cmp(&b.disease_label))
    });

    candidates.truncate(runtime.candidate_config.top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bare_runtime;
    use std::collections::BTreeMap;

    fn tiny_runtime() -> ReferenceRuntime {
        let mut disease_symptom_matrix = BTreeMap::new();
        disease_symptom_matrix.insert(
            "Urinary tract infection".to_string(),
            vec![
                ReferenceSymptom::new("dysuria"),
                ReferenceSymptom::new("urinary_frequency"),
            ],
        );
        disease_symptom_matrix.insert(
            "Unrelated condition".to_string(),
            vec![ReferenceSymptom::new("headache")],
        );

        let mut canonical_to_reference = BTreeMap::new();
        canonical_to_reference.insert(
            Canonical::new("idrar yanmasi"),
            vec![ReferenceSymptom::new("dysuria")],
        );
        canonical_to_reference.insert(
            Canonical::new("sik idrara cikma"),
            vec![ReferenceSymptom::new("urinary_frequency")],
        );

        ReferenceRuntime {
            disease_symptom_matrix,
            canonical_to_reference,
            ..bare_runtime()
        }
    }

    #[test]
    fn scores_exact_match_highest() {
        let runtime = tiny_runtime();
        let canonicals: BTreeSet<Canonical> = [
            Canonical::new("idrar yanmasi"),
            Canonical::new("sik idrara cikma"),
        ]
        .into_iter()
        .collect();

        let candidates = generate(&canonicals, &runtime);
        assert_eq!(candidates[0].disease_label, "Urinary tract infection");
        assert!((candidates[0].score_0_1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn respects_top_k_and_min_score() {
        let mut runtime = tiny_runtime();
        runtime.candidate_config.top_k = 1;
        let canonicals: BTreeSet<Canonical> = [Canonical::new("idrar yanmasi")].into_iter().collect();
        let candidates = generate(&canonicals, &runtime);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn empty_canonicals_yields_zero_scores_below_threshold() {
        let runtime = tiny_runtime();
        let candidates = generate(&BTreeSet::new(), &runtime);
        assert!(candidates.is_empty());
    }
}
