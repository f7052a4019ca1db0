use std::collections::BTreeSet;

use serde::Deserialize;
use triage_types::{normalize, Canonical};

#[derive(Debug, Clone, Deserialize)]
pub struct SynonymEntry {
    pub canonical: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynonymsFile {
    pub synonyms: Vec<SynonymEntry>,
}

/// `(variant_phrase, canonical)` pairs sorted by descending phrase length, then
/// lexicographically — the order the longest-match contract in spec.md §4.2 depends
/// on. A sorted `Vec`, not a map: the contract is about iteration order, not lookup.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    pub entries: Vec<(String, Canonical)>,
    pub canonical_set: BTreeSet<Canonical>,
}

impl SynonymIndex {
    pub fn build(file: &SynonymsFile, locale: &str) -> Self {
        let mut entries: Vec<(String, Canonical)> = Vec::new();
        let mut canonical_set = BTreeSet::new();
        let mut seen = BTreeSet::new();

        for entry in &file.synonyms {
            let canonical_norm = normalize(&entry.canonical, locale);
            if canonical_norm.is_empty() {
                continue;
            }
            let canonical = Canonical::new(canonical_norm.clone());
            canonical_set.insert(canonical.clone());

            // The canonical phrase itself is always a matchable variant.
            let mut phrases: Vec<String> = vec![canonical_norm];
            for variant in &entry.variants {
                let v = normalize(variant, locale);
                if !v.is_empty() {
                    phrases.push(v);
                }
            }

            for phrase in phrases {
                let key = (canonical.as_str().to_string(), phrase.clone());
                if seen.insert(key) {
                    entries.push((phrase, canonical.clone()));
                }
            }
        }

        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            entries,
            canonical_set,
        }
    }
}
