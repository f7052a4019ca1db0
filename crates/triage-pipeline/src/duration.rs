//! Duration-signal extraction. `spec.md` threads a `duration_days` into the Risk
//! Stratifier but never says how it's produced; the original Python service derives
//! it from free text with a handful of regexes. Reimplemented here as a pure function
//! over the already-normalized turn text.

use regex::Regex;
use std::sync::OnceLock;

struct DurationPatterns {
    gundur: Regex,
    gun: Regex,
    gunluk: Regex,
    hafta: Regex,
}

fn patterns() -> &'static DurationPatterns {
    static PATTERNS: OnceLock<DurationPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DurationPatterns {
        gundur: Regex::new(r"(\d+)\s*g\u{fc}nd\u{fc}r").unwrap(),
        gun: Regex::new(r"(\d+)\s*g\u{fc}n\b").unwrap(),
        gunluk: Regex::new(r"(\d+)\s*g\u{fc}nl\u{fc}k").unwrap(),
        hafta: Regex::new(r"(\d+)\s*hafta").unwrap(),
    })
}

/// Extracts a day count from normalized text ("3 gundur", "1 haftadir" -> 7 days).
/// Bounded to `0 < days < 365`; out-of-range or unparseable input yields `None`.
pub fn extract_duration_days(normalized_text: &str) -> Option<u32> {
    let p = patterns();

    let captured = p
        .gundur
        .captures(normalized_text)
        .or_else(|| p.gunluk.captures(normalized_text))
        .or_else(|| p.gun.captures(normalized_text));

    if let Some(caps) = captured {
        let days: u32 = caps.get(1)?.as_str().parse().ok()?;
        if days > 0 && days < 365 {
            return Some(days);
        }
        return None;
    }

    if let Some(caps) = p.hafta.captures(normalized_text) {
        let weeks: u32 = caps.get(1)?.as_str().parse().ok()?;
        if weeks > 0 && weeks < 52 {
            return Some(weeks * 7);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gundur() {
        assert_eq!(extract_duration_days("3 g\u{fc}nd\u{fc}r ba\u{15f}\u{131}m a\u{11f}r\u{131}yor"), Some(3));
    }

    #[test]
    fn parses_gunluk() {
        assert_eq!(extract_duration_days("14 g\u{fc}nl\u{fc}k \u{f6}ks\u{fc}r\u{fc}k var"), Some(14));
    }

    #[test]
    fn parses_hafta_as_weeks() {
        assert_eq!(extract_duration_days("2 haftadir devam ediyor"), Some(14));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(extract_duration_days("400 g\u{fc}nd\u{fc}r"), None);
        assert_eq!(extract_duration_days("60 haftadir"), None);
    }

    #[test]
    fn no_match_yields_none() {
        assert_eq!(extract_duration_days("ba\u{15f}\u{131}m a\u{11f}r\u{131}yor"), None);
    }
}
