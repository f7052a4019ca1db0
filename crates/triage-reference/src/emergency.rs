use regex::Regex;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct HardTriggerSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoftTriggerSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgeRiskSpec {
    pub min: u32,
    pub max: u32,
    pub min2: u32,
    pub max2: u32,
}

/// A hard trigger with its regex compiled once at load time. A trigger whose regex
/// fails to compile is logged and kept keyword-only (spec.md §4.3/§7 `MalformedRule`).
#[derive(Debug, Clone)]
pub struct HardTrigger {
    pub id: String,
    pub label: String,
    pub keywords: Vec<String>,
    pub regex: Option<Regex>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SoftTrigger {
    pub id: String,
    pub label: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AgeRisk {
    pub min: u32,
    pub max: u32,
    pub min2: u32,
    pub max2: u32,
}

impl AgeRisk {
    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age) || (self.min2..=self.max2).contains(&age)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmergencyRulesFile {
    #[serde(default)]
    pub hard_triggers: Vec<HardTriggerSpec>,
    #[serde(default)]
    pub soft_triggers: Vec<SoftTriggerSpec>,
    pub age_risk: AgeRiskSpec,
}

#[derive(Debug, Clone)]
pub struct EmergencyRules {
    pub hard_triggers: Vec<HardTrigger>,
    pub soft_triggers: Vec<SoftTrigger>,
    pub age_risk: AgeRisk,
}

impl EmergencyRules {
    pub fn compile(file: EmergencyRulesFile) -> Self {
        let hard_triggers = file
            .hard_triggers
            .into_iter()
            .map(|spec| {
                let regex = spec.regex.as_deref().and_then(|pattern| {
                    match Regex::new(pattern) {
                        Ok(re) => Some(re),
                        Err(err) => {
                            warn!(rule_id = %spec.id, %pattern, %err, "malformed emergency regex, falling back to keywords only");
                            None
                        }
                    }
                });
                HardTrigger {
                    id: spec.id,
                    label: spec.label,
                    keywords: spec.keywords,
                    regex,
                    instructions: spec.instructions,
                }
            })
            .collect();

        let soft_triggers = file
            .soft_triggers
            .into_iter()
            .map(|spec| SoftTrigger {
                id: spec.id,
                label: spec.label,
                keywords: spec.keywords,
            })
            .collect();

        EmergencyRules {
            hard_triggers,
            soft_triggers,
            age_risk: AgeRisk {
                min: file.age_risk.min,
                max: file.age_risk.max,
                min2: file.age_risk.min2,
                max2: file.age_risk.max2,
            },
        }
    }
}
