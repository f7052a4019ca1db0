//! Specialty Scorer (C5): cumulative, multi-signal scoring per specialty —
//! NO_DOUBLE_COUNT_SAME_CANONICAL.

use std::collections::BTreeMap;

use triage_reference::ReferenceRuntime;
use triage_types::{Canonical, SpecialtyId, SpecialtyScoreState};

use super::canonical_extractor::find_whole_word;

#[derive(Debug, Clone, Copy)]
enum Tier {
    Phrase,
    Keyword,
}

fn award(state: &mut SpecialtyScoreState, tier: Tier, scoring: &triage_reference::ScoringConstants) {
    match tier {
        Tier::Phrase => {
            state.phrase_score += scoring.phrase_match_points;
            state.score += scoring.phrase_match_points;
        }
        Tier::Keyword => {
            state.keyword_score += scoring.keyword_match_points;
            state.score += scoring.keyword_match_points;
        }
    }
}

/// Scores `new_evidence_text` (just-arrived free text and/or an affirmed answer's
/// representative phrase) against every specialty, mutating `specialty_scores` in
/// place. Cumulative across calls: a canonical or keyword literal already credited to
/// a specialty is never credited again.
pub fn score(
    new_evidence_text: &str,
    specialty_scores: &mut BTreeMap<SpecialtyId, SpecialtyScoreState>,
    runtime: &ReferenceRuntime,
) {
    if new_evidence_text.trim().is_empty() {
        return;
    }

    let mut locked: BTreeMap<Canonical, Tier> = BTreeMap::new();

    for (phrase, canonical) in &runtime.synonym_index.entries {
        if locked.contains_key(canonical) {
            continue;
        }
        if phrase.contains(' ') && find_whole_word(new_evidence_text, phrase).is_some() {
            locked.insert(canonical.clone(), Tier::Phrase);
        }
    }

    for canonical in &runtime.synonym_index.canonical_set {
        if locked.contains_key(canonical) {
            continue;
        }
        if !canonical.as_str().contains(' ') && find_whole_word(new_evidence_text, canonical.as_str()).is_some() {
            locked.insert(canonical.clone(), Tier::Keyword);
        }
    }

    for (specialty_id, specialty_def) in &runtime.specialty_by_id {
        let state = specialty_scores
            .entry(SpecialtyId::new(specialty_id.clone()))
            .or_default();

        for (canonical, tier) in &locked {
            if state.matched_canonicals.contains(canonical) {
                continue;
            }
            if specialty_def.keywords.iter().any(|k| k == canonical.as_str()) {
                award(state, *tier, &runtime.scoring);
                state.matched_canonicals.insert(canonical.clone());
            }
        }

        for keyword in &specialty_def.keywords {
            let credited_as = Canonical::new(keyword.clone());
            if state.matched_canonicals.contains(&credited_as) {
                continue;
            }
            if find_whole_word(new_evidence_text, keyword).is_some() {
                let tier = if keyword.contains(' ') { Tier::Phrase } else { Tier::Keyword };
                award(state, tier, &runtime.scoring);
                state.matched_canonicals.insert(credited_as);
            }
        }

        for negative in &specialty_def.negative_keywords {
            if find_whole_word(new_evidence_text, negative).is_some() {
                state.negative_penalties += runtime.scoring.negative_keyword_penalty;
                state.score += runtime.scoring.negative_keyword_penalty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bare_runtime;
    use triage_reference::specialty::SpecialtySpec;
    use triage_reference::synonym::{SynonymEntry, SynonymsFile};

    fn runtime_with_one_specialty(specialty: SpecialtySpec) -> ReferenceRuntime {
        let synonyms = SynonymsFile {
            synonyms: vec![SynonymEntry {
                canonical: "idrar yanmasi".into(),
                variants: vec!["idrar yaparken yaniyor".into()],
            }],
        };
        let synonym_index = triage_reference::SynonymIndex::build(&synonyms, "tr");

        let mut specialty_by_id = BTreeMap::new();
        specialty_by_id.insert(
            specialty.id.clone(),
            triage_reference::SpecialtyDef {
                display_name: specialty.display_name,
                keywords: specialty.keywords,
                negative_keywords: specialty.negative_keywords,
            },
        );

        ReferenceRuntime {
            synonym_index,
            specialty_by_id,
            ..bare_runtime()
        }
    }

    #[test]
    fn phrase_tier_outscores_keyword_tier() {
        let specialty = SpecialtySpec {
            id: "urology_internal".into(),
            display_name: "Urology".into(),
            keywords: vec!["idrar yanmasi".into()],
            negative_keywords: vec![],
            answer_boosts: Default::default(),
        };
        let runtime = runtime_with_one_specialty(specialty);
        let mut scores = BTreeMap::new();
        score("idrar yaparken yaniyor", &mut scores, &runtime);
        let state = &scores[&SpecialtyId::new("urology_internal")];
        assert_eq!(state.phrase_score, 5);
        assert_eq!(state.keyword_score, 0);
    }

    #[test]
    fn same_canonical_never_credited_twice_across_calls() {
        let specialty = SpecialtySpec {
            id: "urology_internal".into(),
            display_name: "Urology".into(),
            keywords: vec!["idrar yanmasi".into()],
            negative_keywords: vec![],
            answer_boosts: Default::default(),
        };
        let runtime = runtime_with_one_specialty(specialty);
        let mut scores = BTreeMap::new();
        score("idrar yaparken yaniyor", &mut scores, &runtime);
        score("idrar yaparken yaniyor tekrar", &mut scores, &runtime);
        let state = &scores[&SpecialtyId::new("urology_internal")];
        assert_eq!(state.phrase_score, 5);
    }

    #[test]
    fn negative_keyword_penalizes() {
        let specialty = SpecialtySpec {
            id: "urology_internal".into(),
            display_name: "Urology".into(),
            keywords: vec![],
            negative_keywords: vec!["gebelik yok".into()],
            answer_boosts: Default::default(),
        };
        let runtime = runtime_with_one_specialty(specialty);
        let mut scores = BTreeMap::new();
        score("gebelik yok diyor", &mut scores, &runtime);
        let state = &scores[&SpecialtyId::new("urology_internal")];
        assert_eq!(state.negative_penalties, -4);
        assert_eq!(state.score, -4);
    }
}
