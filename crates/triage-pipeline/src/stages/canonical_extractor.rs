//! Canonical Extractor (C2): maps normalized text plus prior structured answers onto
//! a deterministic, lexicographically sorted set of canonical symptoms.

use std::collections::BTreeSet;

use triage_reference::SynonymIndex;
use triage_types::Canonical;

const NEGATION_WINDOW: usize = 18;
const NEGATION_TOKENS: &[&str] = &["yok", "degil", "hayir", "olmuyor", "olmadi", "degilim"];

/// Longest-match-first scan over `index.entries` (already sorted by descending
/// phrase length). A match is rejected when a negation token appears in the
/// `NEGATION_WINDOW`-character slice immediately preceding the match start.
/// A canonical is credited at most once, first win.
pub fn extract(
    normalized_text: &str,
    answers: impl Iterator<Item = Canonical>,
    index: &SynonymIndex,
) -> Vec<Canonical> {
    let mut found: BTreeSet<Canonical> = BTreeSet::new();

    for (phrase, canonical) in &index.entries {
        if found.contains(canonical) {
            continue;
        }
        if let Some(start) = find_whole_word(normalized_text, phrase) {
            if !negated_before(normalized_text, start) {
                found.insert(canonical.clone());
            }
        }
    }

    for canonical in answers {
        if index.canonical_set.contains(&canonical) {
            found.insert(canonical);
        }
    }

    found.into_iter().collect()
}

/// First byte offset of a whole-word occurrence of `phrase` in `text`, or `None`.
/// "Whole word" means the byte immediately before and after the match (if any) is
/// not alphanumeric — both `text` and `phrase` are already normalized/lowercased.
pub(crate) fn find_whole_word(text: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let bytes = text.as_bytes();
    let plen = phrase.len();
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find(phrase) {
        let start = search_from + rel;
        let end = start + plen;
        let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
        let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(start);
        }
        search_from = start + 1;
        if search_from >= text.len() {
            break;
        }
    }
    None
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b >= 0x80
}

fn negated_before(text: &str, match_start: usize) -> bool {
    let window_start = match_start.saturating_sub(NEGATION_WINDOW);
    // Slice on a char boundary to avoid panicking on multi-byte UTF-8.
    let mut start = window_start;
    while start < match_start && !text.is_char_boundary(start) {
        start += 1;
    }
    let window = &text[start..match_start];
    NEGATION_TOKENS
        .iter()
        .any(|token| find_whole_word(window, token).is_some())
}
