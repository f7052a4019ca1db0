//! Locale-aware text normalization (C1 in the pipeline, but a leaf utility here so
//! both the Reference Runtime — which must normalize variant phrases the same way at
//! load time — and the pipeline's canonical extractor agree on one implementation).

/// Deterministic text normalization: Turkish-aware casefolding, punctuation stripped
/// to whitespace, runs of whitespace collapsed, result trimmed. Pure and total —
/// empty input yields an empty string.
pub fn normalize(text: &str, locale: &str) -> String {
    let folded = if locale.starts_with("tr") {
        tr_casefold(text)
    } else {
        text.to_lowercase()
    };

    let mut out = String::with_capacity(folded.len());
    let mut last_was_space = true; // collapse leading whitespace too
    for ch in folded.chars() {
        let mapped = if is_punctuation(ch) { ' ' } else { ch };
        if mapped == ' ' || mapped.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(mapped);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Turkish-specific case folding applied before generic lowercasing:
/// `İ` (capital I with dot) -> `i`, `I` (capital dotless I) -> `ı`.
fn tr_casefold(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            'İ' => 'i',
            'I' => 'ı',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '{' | '}' | '[' | ']' | '"' | '\'' | '`' | '~' | '-' | '/' | '\\' | '|'
    )
}
