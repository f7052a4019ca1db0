use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::canonical::Canonical;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialtyId(String);

impl SpecialtyId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SpecialtyId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SpecialtyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecialtyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpecialtyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SpecialtyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Cumulative, per-session evidence accumulated for one specialty by the Specialty
/// Scorer (C5). Carried across turns; `matched_canonicals` enforces
/// NO_DOUBLE_COUNT_SAME_CANONICAL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyScoreState {
    pub score: i64,
    pub phrase_score: i64,
    pub keyword_score: i64,
    pub negative_penalties: i64,
    pub matched_canonicals: BTreeSet<Canonical>,
}

/// A disease candidate produced by the Disease Candidate Generator (C4). Rebuilt
/// fresh every turn, never carried forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseCandidate {
    pub disease_label: String,
    pub score_0_1: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// The result of merging specialty scores with disease-candidate priors (C6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScoreEntry {
    pub final_score: f64,
    pub rules_score: f64,
    pub prior_score: f64,
    pub keyword_score: i64,
    pub display_name: String,
}
