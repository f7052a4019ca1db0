use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HighRiskBand {
    #[serde(default)]
    pub canonicals_any: Vec<String>,
    #[serde(default)]
    pub same_day_required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediumRiskBand {
    #[serde(default)]
    pub canonicals_any: Vec<String>,
    #[serde(default = "default_true")]
    pub same_day_if_true: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskRules {
    pub high: HighRiskBand,
    pub medium: MediumRiskBand,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopRules {
    pub max_questions: u32,
    pub high_confidence_disease_score: f64,
    pub min_specialty_score_gap: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateConfig {
    #[serde(default = "default_symptom_weight")]
    pub default_symptom_weight: f64,
    #[serde(default = "default_severity_multiplier")]
    pub severity_weight_multiplier: f64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score_to_include: f64,
}

fn default_symptom_weight() -> f64 {
    1.0
}
fn default_severity_multiplier() -> f64 {
    0.25
}
fn default_top_k() -> usize {
    5
}
fn default_min_score() -> f64 {
    0.05
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            default_symptom_weight: default_symptom_weight(),
            severity_weight_multiplier: default_severity_multiplier(),
            top_k: default_top_k(),
            min_score_to_include: default_min_score(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectivenessEntry {
    pub asked_count: u32,
    pub effectiveness_0_1: f64,
    pub balance_0_1: f64,
}
