use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, warn};
use triage_types::{Canonical, ReferenceSymptom};

use crate::emergency::{EmergencyRules, EmergencyRulesFile};
use crate::error::ReferenceError;
use crate::question_bank::{QuestionBankFile, QuestionDef};
use crate::rules::{CandidateConfig, EffectivenessEntry, RiskRules, StopRules};
use crate::specialty::{
    DiseaseSpecialtyMapping, DiseaseToSpecialtyFile, ScoringConstants, SpecialtyDef,
    SpecialtyKeywordsFile,
};
use crate::synonym::{SynonymIndex, SynonymsFile};

/// The immutable, load-once index over every static reference file (C12). Handed to
/// every pipeline stage as a read-only value — never exposed through a global, per
/// the "Singletons are load-time values" design note.
#[derive(Debug, Clone)]
pub struct ReferenceRuntime {
    pub locale: String,
    pub synonym_index: SynonymIndex,
    pub disease_symptom_matrix: BTreeMap<String, Vec<ReferenceSymptom>>,
    pub severity_weights: BTreeMap<ReferenceSymptom, i64>,
    pub reference_to_canonical: BTreeMap<ReferenceSymptom, Option<Canonical>>,
    pub canonical_to_reference: BTreeMap<Canonical, Vec<ReferenceSymptom>>,
    pub disease_to_specialty: BTreeMap<String, DiseaseSpecialtyMapping>,
    pub fallback_specialty_id: String,
    pub specialty_by_id: BTreeMap<String, SpecialtyDef>,
    pub scoring: ScoringConstants,
    pub question_bank: BTreeMap<Canonical, QuestionDef>,
    pub emergency_rules: EmergencyRules,
    pub risk_rules: RiskRules,
    pub stop_rules: StopRules,
    pub candidate_config: CandidateConfig,
    pub question_effectiveness: BTreeMap<Canonical, EffectivenessEntry>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReferenceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ReferenceError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ReferenceError> {
    if !path.exists() {
        warn!(path = %path.display(), "optional reference file missing, treating as empty");
        return Ok(None);
    }
    Ok(Some(read_json(path)?))
}

impl ReferenceRuntime {
    /// Load and index every reference file under `dir`. Required files missing or
    /// malformed are startup-fatal (`ReferenceDataMissing`); optional files
    /// (`question_effectiveness.json`, `candidate_generator.json`) default to empty.
    pub fn load(dir: &Path, locale: &str) -> Result<Self, ReferenceError> {
        let path = |name: &str| -> PathBuf { dir.join(name) };

        let synonyms: SynonymsFile = read_json(&path("synonyms.json"))?;
        let synonym_index = SynonymIndex::build(&synonyms, locale);

        let disease_symptom_matrix_raw: BTreeMap<String, Vec<String>> =
            read_json(&path("disease_symptom_matrix.json"))?;
        let disease_symptom_matrix: BTreeMap<String, Vec<ReferenceSymptom>> =
            disease_symptom_matrix_raw
                .into_iter()
                .map(|(disease, syms)| {
                    (disease, syms.into_iter().map(ReferenceSymptom::new).collect())
                })
                .collect();

        let severity_raw: BTreeMap<String, i64> = read_json(&path("severity_weights.json"))?;
        let severity_weights: BTreeMap<ReferenceSymptom, i64> = severity_raw
            .into_iter()
            .map(|(sym, weight)| (ReferenceSymptom::new(sym), weight))
            .collect();

        let ref_to_canonical_raw: BTreeMap<String, Option<String>> =
            read_json(&path("reference_to_canonical.json"))?;
        let reference_to_canonical: BTreeMap<ReferenceSymptom, Option<Canonical>> =
            ref_to_canonical_raw
                .into_iter()
                .map(|(sym, canon)| (ReferenceSymptom::new(sym), canon.map(Canonical::new)))
                .collect();

        let mut canonical_to_reference: BTreeMap<Canonical, Vec<ReferenceSymptom>> =
            BTreeMap::new();
        for (sym, canon) in &reference_to_canonical {
            if let Some(canon) = canon {
                canonical_to_reference
                    .entry(canon.clone())
                    .or_default()
                    .push(sym.clone());
            }
        }
        for syms in canonical_to_reference.values_mut() {
            syms.sort();
        }

        let disease_to_specialty_file: DiseaseToSpecialtyFile =
            read_json(&path("disease_to_specialty.json"))?;
        let fallback_specialty_id = disease_to_specialty_file.fallback_specialty_id.clone();
        let disease_to_specialty: BTreeMap<String, DiseaseSpecialtyMapping> =
            disease_to_specialty_file
                .map
                .into_iter()
                .map(|entry| {
                    (
                        entry.disease_label,
                        DiseaseSpecialtyMapping {
                            specialty_id: entry.specialty_id,
                            display_name: entry.display_name,
                            confidence: entry.confidence,
                        },
                    )
                })
                .collect();

        let specialty_file: SpecialtyKeywordsFile = read_json(&path("specialty_keywords.json"))?;
        let specialty_by_id: BTreeMap<String, SpecialtyDef> = specialty_file
            .specialties
            .into_iter()
            .map(|spec| {
                (
                    spec.id,
                    SpecialtyDef {
                        display_name: spec.display_name,
                        keywords: spec.keywords,
                        negative_keywords: spec.negative_keywords,
                    },
                )
            })
            .collect();

        if !specialty_by_id.contains_key(&fallback_specialty_id) {
            return Err(ReferenceError::UnmappedDisease {
                disease: format!(
                    "fallback_specialty_id '{fallback_specialty_id}' is not a known specialty"
                ),
            });
        }

        let question_bank_file: QuestionBankFile = read_json(&path("question_bank.json"))?;
        let mut question_bank = BTreeMap::new();
        for q in question_bank_file.questions {
            if q.text.trim().is_empty() {
                return Err(ReferenceError::InvalidQuestion {
                    canonical: q.canonical,
                });
            }
            question_bank.insert(
                Canonical::new(q.canonical),
                QuestionDef {
                    text: q.text,
                    answer_type: q.answer_type,
                    choices: q.choices,
                    priority_when_known: q.priority_when_known,
                    skip_if_denied: q.skip_if_denied,
                },
            );
        }

        let emergency_file: EmergencyRulesFile = read_json(&path("emergency_rules.json"))?;
        let emergency_rules = EmergencyRules::compile(emergency_file);

        let risk_rules: RiskRules = read_json(&path("risk_rules.json"))?;
        let stop_rules: StopRules = read_json(&path("stop_rules.json"))?;

        let candidate_config = read_json_optional(&path("candidate_generator.json"))?
            .unwrap_or_default();

        let effectiveness_raw: Option<BTreeMap<String, EffectivenessEntry>> =
            read_json_optional(&path("question_effectiveness.json"))?;
        let question_effectiveness = effectiveness_raw
            .unwrap_or_default()
            .into_iter()
            .map(|(canon, entry)| (Canonical::new(canon), entry))
            .collect();

        info!(
            diseases = disease_symptom_matrix.len(),
            specialties = specialty_by_id.len(),
            questions = question_bank.len(),
            hard_triggers = emergency_rules.hard_triggers.len(),
            "reference runtime loaded"
        );

        Ok(Self {
            locale: locale.to_string(),
            synonym_index,
            disease_symptom_matrix,
            severity_weights,
            reference_to_canonical,
            canonical_to_reference,
            disease_to_specialty,
            fallback_specialty_id,
            specialty_by_id,
            scoring: specialty_file.scoring,
            question_bank,
            emergency_rules,
            risk_rules,
            stop_rules,
            candidate_config,
            question_effectiveness,
        })
    }
}
