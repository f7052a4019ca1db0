use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical::Canonical;
use crate::specialty::{DiseaseCandidate, FinalScoreEntry, SpecialtyId, SpecialtyScoreState};
use crate::stop::StopReason;

/// Per-session pipeline state, monotonically grown turn over turn.
///
/// Invariants (enforced by the orchestrator, not by this type alone):
/// `known ∩ denied = ∅`; `asked ⊇ known ∪ denied`; `turn_index` strictly increases;
/// once `is_complete` is set no further turn may mutate this context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnContext {
    pub session_id: Uuid,
    pub locale: String,
    pub turn_index: u32,

    pub raw_text_accumulated: String,
    pub answers: BTreeMap<Canonical, String>,

    pub known_symptoms: BTreeSet<Canonical>,
    pub denied_symptoms: BTreeSet<Canonical>,
    pub asked_canonicals: BTreeSet<Canonical>,

    pub specialty_scores: BTreeMap<SpecialtyId, SpecialtyScoreState>,

    /// Rebuilt every turn; never carried across turns.
    #[serde(default)]
    pub disease_candidates: Vec<DiseaseCandidate>,
    #[serde(default)]
    pub final_scores: BTreeMap<SpecialtyId, FinalScoreEntry>,

    pub confidence_0_1: f64,
    pub duration_days: Option<u32>,
    pub stop_reason: Option<StopReason>,
    pub is_complete: bool,
}

impl TurnContext {
    pub fn new(session_id: Uuid, locale: impl Into<String>) -> Self {
        Self {
            session_id,
            locale: locale.into(),
            turn_index: 0,
            raw_text_accumulated: String::new(),
            answers: BTreeMap::new(),
            known_symptoms: BTreeSet::new(),
            denied_symptoms: BTreeSet::new(),
            asked_canonicals: BTreeSet::new(),
            specialty_scores: BTreeMap::new(),
            disease_candidates: Vec::new(),
            final_scores: BTreeMap::new(),
            confidence_0_1: 0.0,
            duration_days: None,
            stop_reason: None,
            is_complete: false,
        }
    }

    /// `known ∩ denied = ∅` and both are subsets of `asked` — checked in tests and
    /// available to callers that want to assert it after a mutation.
    pub fn invariants_hold(&self) -> bool {
        self.known_symptoms.is_disjoint(&self.denied_symptoms)
            && self.known_symptoms.is_subset(&self.asked_canonicals)
            && self.denied_symptoms.is_subset(&self.asked_canonicals)
    }

    pub fn mark_known(&mut self, canonical: Canonical) {
        self.denied_symptoms.remove(&canonical);
        self.asked_canonicals.insert(canonical.clone());
        self.known_symptoms.insert(canonical);
    }

    pub fn mark_denied(&mut self, canonical: Canonical) {
        self.known_symptoms.remove(&canonical);
        self.asked_canonicals.insert(canonical.clone());
        self.denied_symptoms.insert(canonical);
    }
}
