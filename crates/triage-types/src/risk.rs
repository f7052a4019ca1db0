use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.70 {
            RiskLevel::High
        } else if score >= 0.40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Output of the Risk Stratifier (C7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score_0_1: f64,
    pub reasons: Vec<String>,
    pub advice: String,
}
