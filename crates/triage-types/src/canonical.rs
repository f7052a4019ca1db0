//! Canonical symptom keys.
//!
//! A canonical symptom is a lowercase, language-tagged string key and the join
//! identifier across synonyms, the question bank, the disease-symptom matrix, and
//! specialty keywords. It never changes shape after load, so it is a thin newtype
//! over `String` rather than an enum — the actual vocabulary lives in reference data,
//! not in the type system.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Canonical(String);

impl Canonical {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Canonical {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Canonical {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Canonical {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Canonical {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A reference symptom key as it appears in the external disease-symptom matrix and
/// severity file — a foreign alphabet bridged to canonicals via `reference_to_canonical`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceSymptom(String);

impl ReferenceSymptom {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ReferenceSymptom {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ReferenceSymptom {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceSymptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReferenceSymptom {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ReferenceSymptom {
    fn from(s: String) -> Self {
        Self(s)
    }
}
