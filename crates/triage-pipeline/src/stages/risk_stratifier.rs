//! Risk Stratifier (C7): accumulates a point schedule into a LOW/MEDIUM/HIGH band.

use std::collections::BTreeSet;

use triage_reference::RiskRules;
use triage_types::{Canonical, Profile, RiskAssessment, RiskLevel};

const LOW_CONFIDENCE_THRESHOLD: f64 = 0.35;

/// `risk(canonicals, confidence, duration_days, profile, risk_rules, same_day_active)
/// -> RiskAssessment`. `same_day_active` is always `false` in this build — there is no
/// same-day rule engine wired into the core (see the repo's design notes); a future
/// caller could still supply `true` from a structured same-day answer.
pub fn risk(
    canonicals: &BTreeSet<Canonical>,
    confidence: f64,
    duration_days: Option<u32>,
    profile: &Profile,
    risk_rules: &RiskRules,
    same_day_active: bool,
) -> RiskAssessment {
    let mut score = 0.0_f64;
    let mut reasons = Vec::new();

    let low_confidence = confidence < LOW_CONFIDENCE_THRESHOLD;
    if low_confidence {
        score += 0.25;
        reasons.push("confidence below 0.35".to_string());
    }

    if same_day_active && risk_rules.medium.same_day_if_true {
        score += 0.35;
        reasons.push("same-day signal active".to_string());
    }

    if let Some(days) = duration_days {
        if days >= 14 {
            score += 0.30;
            reasons.push("symptom duration >= 14 days".to_string());
        } else if days >= 7 {
            score += 0.20;
            reasons.push("symptom duration >= 7 days".to_string());
        } else if days <= 2 {
            score -= 0.05;
            reasons.push("symptom duration <= 2 days".to_string());
        }
    }

    if let Some(age) = profile.age {
        if age <= 2 {
            score += 0.25;
            reasons.push("age <= 2".to_string());
        } else if age >= 65 {
            score += 0.20;
            reasons.push("age >= 65".to_string());
        }
    }

    if profile.pregnant == Some(true) {
        score += 0.20;
        reasons.push("pregnancy".to_string());
    }

    let has_high_hit = risk_rules
        .high
        .canonicals_any
        .iter()
        .any(|c| canonicals.contains(c.as_str()));
    let has_medium_hit = risk_rules
        .medium
        .canonicals_any
        .iter()
        .any(|c| canonicals.contains(c.as_str()));

    if has_high_hit {
        let gated = risk_rules.high.same_day_required && !same_day_active;
        if !gated {
            score += 0.55;
            reasons.push("high-risk canonical present".to_string());
        }
    }

    if has_medium_hit {
        score += 0.25;
        reasons.push("medium-risk canonical present".to_string());
    }

    if low_confidence && (has_high_hit || has_medium_hit) {
        score += 0.20;
        reasons.push("low confidence combined with a risk-banded canonical".to_string());
    }

    let score_0_1 = score.clamp(0.0, 1.0);
    let level = RiskLevel::from_score(score_0_1);
    let advice = match level {
        RiskLevel::High => {
            "Seek in-person medical evaluation today; consider emergency care if symptoms worsen."
                .to_string()
        }
        RiskLevel::Medium => {
            "Arrange a same-day or next-day appointment with a clinician.".to_string()
        }
        RiskLevel::Low => "Routine follow-up is reasonable; monitor for new or worsening symptoms.".to_string(),
    };

    RiskAssessment {
        level,
        score_0_1,
        reasons,
        advice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_reference::rules::{HighRiskBand, MediumRiskBand};

    fn rules() -> RiskRules {
        RiskRules {
            high: HighRiskBand {
                canonicals_any: vec!["gogus agrisi".to_string()],
                same_day_required: false,
            },
            medium: MediumRiskBand {
                canonicals_any: vec!["ates".to_string()],
                same_day_if_true: false,
            },
        }
    }

    #[test]
    fn no_signals_is_low() {
        let assessment = risk(&BTreeSet::new(), 0.9, None, &Profile::default(), &rules(), false);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn high_risk_canonical_pushes_to_high_band() {
        let canonicals: BTreeSet<Canonical> = [Canonical::new("gogus agrisi")].into_iter().collect();
        // 0.55 (high-risk hit) alone lands in Medium; combined with low confidence
        // (0.25) and the low-confidence/high-risk combo bonus (0.20) it reaches High.
        let assessment = risk(&canonicals, 0.1, None, &Profile::default(), &rules(), false);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn same_day_required_gates_high_bonus_off_without_signal() {
        let mut gated_rules = rules();
        gated_rules.high.same_day_required = true;
        let canonicals: BTreeSet<Canonical> = [Canonical::new("gogus agrisi")].into_iter().collect();
        let assessment = risk(&canonicals, 0.9, None, &Profile::default(), &gated_rules, false);
        assert_eq!(assessment.score_0_1, 0.0);
    }

    #[test]
    fn long_duration_and_old_age_accumulate() {
        let mut profile = Profile::default();
        profile.age = Some(70);
        let assessment = risk(&BTreeSet::new(), 0.9, Some(20), &profile, &rules(), false);
        assert!((assessment.score_0_1 - 0.50).abs() < 1e-9);
        assert_eq!(assessment.level, RiskLevel::Medium);
    }

    #[test]
    fn score_clamped_to_one() {
        let mut profile = Profile::default();
        profile.age = Some(1);
        profile.pregnant = Some(true);
        let canonicals: BTreeSet<Canonical> =
            [Canonical::new("gogus agrisi"), Canonical::new("ates")]
                .into_iter()
                .collect();
        let assessment = risk(&canonicals, 0.1, Some(30), &profile, &rules(), true);
        assert_eq!(assessment.score_0_1, 1.0);
    }
}
