//! Safety Guard (C3): ordered, first-hit-wins scan for emergencies. Operates on raw,
//! non-negated text — the negation window only applies to canonical extraction, not
//! to this guard (documented conservative behavior, see the repo's design notes).

use triage_reference::EmergencyRules;
use triage_types::Profile;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Ok,
    Emergency {
        rule_id: String,
        reason: String,
        instructions: Vec<String>,
        missing_info_to_confirm: Vec<String>,
    },
}

/// 1. Hard keyword scan. 2. Hard regex scan (compiled once at load). 3. Soft-trigger
/// scan, escalated only when the profile's age falls in a configured high-risk
/// bracket. First hit wins; no stage below fires if an earlier one already did.
pub fn check(normalized_text: &str, profile: &Profile, rules: &EmergencyRules) -> GuardOutcome {
    for trigger in &rules.hard_triggers {
        if trigger
            .keywords
            .iter()
            .any(|kw| normalized_text.contains(kw.as_str()))
        {
            return GuardOutcome::Emergency {
                rule_id: trigger.id.clone(),
                reason: trigger.label.clone(),
                instructions: trigger.instructions.clone(),
                missing_info_to_confirm: Vec::new(),
            };
        }
    }

    for trigger in &rules.hard_triggers {
        if let Some(re) = &trigger.regex {
            if re.is_match(normalized_text) {
                return GuardOutcome::Emergency {
                    rule_id: trigger.id.clone(),
                    reason: trigger.label.clone(),
                    instructions: trigger.instructions.clone(),
                    missing_info_to_confirm: Vec::new(),
                };
            }
        }
    }

    let soft_hits: Vec<&str> = rules
        .soft_triggers
        .iter()
        .filter(|trigger| {
            trigger
                .keywords
                .iter()
                .any(|kw| normalized_text.contains(kw.as_str()))
        })
        .map(|trigger| trigger.id.as_str())
        .collect();

    if !soft_hits.is_empty() {
        if let Some(age) = profile.age {
            if rules.age_risk.contains(age) {
                return GuardOutcome::Emergency {
                    rule_id: soft_hits.join(","),
                    reason: "age-amplified soft trigger".to_string(),
                    instructions: vec![
                        "Seek in-person evaluation promptly given the patient's age.".to_string(),
                    ],
                    missing_info_to_confirm: soft_hits.iter().map(|s| s.to_string()).collect(),
                };
            }
        }
    }

    GuardOutcome::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_reference::emergency::{
        AgeRiskSpec, EmergencyRulesFile, HardTriggerSpec, SoftTriggerSpec,
    };

    fn rules() -> EmergencyRules {
        EmergencyRules::compile(EmergencyRulesFile {
            hard_triggers: vec![HardTriggerSpec {
                id: "cardiac_chest_pain".into(),
                label: "possible acute cardiac event".into(),
                keywords: vec!["gogus agrisi".into(), "gogusumde baski".into()],
                regex: None,
                instructions: vec!["Call emergency services now.".into()],
            }],
            soft_triggers: vec![SoftTriggerSpec {
                id: "persistent_vomiting".into(),
                label: "persistent vomiting".into(),
                keywords: vec!["surekli kusma".into()],
            }],
            age_risk: AgeRiskSpec {
                min: 0,
                max: 2,
                min2: 65,
                max2: 120,
            },
        })
    }

    #[test]
    fn hard_keyword_fires_unconditionally() {
        let outcome = check("gogusumde baski var nefesim dar", &Profile::default(), &rules());
        assert!(matches!(outcome, GuardOutcome::Emergency { .. }));
    }

    #[test]
    fn raw_text_fires_even_when_negated_in_natural_language() {
        // Documented conservative behavior: the guard does not apply the negation
        // window used by canonical extraction.
        let outcome = check("gogus agrisi yok", &Profile::default(), &rules());
        assert!(matches!(outcome, GuardOutcome::Emergency { .. }));
    }

    #[test]
    fn soft_trigger_without_risk_age_does_not_escalate() {
        let mut profile = Profile::default();
        profile.age = Some(30);
        let outcome = check("surekli kusma var", &profile, &rules());
        assert_eq!(outcome, GuardOutcome::Ok);
    }

    #[test]
    fn soft_trigger_with_risk_age_escalates() {
        let mut profile = Profile::default();
        profile.age = Some(1);
        let outcome = check("surekli kusma var", &profile, &rules());
        assert!(matches!(outcome, GuardOutcome::Emergency { .. }));
    }

    #[test]
    fn clean_text_is_ok() {
        let outcome = check("basim agriyor", &Profile::default(), &rules());
        assert_eq!(outcome, GuardOutcome::Ok);
    }
}
