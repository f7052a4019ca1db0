//! Shared `ReferenceRuntime` builder for stage unit tests. Not part of the public API.
#![cfg(test)]

use std::collections::BTreeMap;

use triage_reference::{
    AgeRisk, CandidateConfig, EmergencyRules, ReferenceRuntime, RiskRules, ScoringConstants,
    StopRules, SynonymIndex,
};

pub fn bare_runtime() -> ReferenceRuntime {
    ReferenceRuntime {
        locale: "tr".to_string(),
        synonym_index: SynonymIndex::default(),
        disease_symptom_matrix: BTreeMap::new(),
        severity_weights: BTreeMap::new(),
        reference_to_canonical: BTreeMap::new(),
        canonical_to_reference: BTreeMap::new(),
        disease_to_specialty: BTreeMap::new(),
        fallback_specialty_id: "general_internal_medicine".to_string(),
        specialty_by_id: BTreeMap::new(),
        scoring: ScoringConstants::default(),
        question_bank: BTreeMap::new(),
        emergency_rules: EmergencyRules {
            hard_triggers: vec![],
            soft_triggers: vec![],
            age_risk: AgeRisk {
                min: 0,
                max: 0,
                min2: 0,
                max2: 0,
            },
        },
        risk_rules: RiskRules {
            high: triage_reference::rules::HighRiskBand {
                canonicals_any: vec![],
                same_day_required: false,
            },
            medium: triage_reference::rules::MediumRiskBand {
                canonicals_any: vec![],
                same_day_if_true: true,
            },
        },
        stop_rules: StopRules {
            max_questions: 5,
            high_confidence_disease_score: 0.8,
            min_specialty_score_gap: 0.3,
        },
        candidate_config: CandidateConfig::default(),
        question_effectiveness: BTreeMap::new(),
    }
}
