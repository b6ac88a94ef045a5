//! Text folding shared by every comparison in the detector.
//!
//! - Control characters are dropped.
//! - Zero-width characters (ZWS/ZWNJ/ZWJ/WJ/BOM) are dropped, so Indic spellings with and
//!   without joiners compare equal.
//! - Unicode-aware lowercasing.

/// Fold `text` for case- and joiner-insensitive comparison.
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        for lc in ch.to_lowercase() {
            match lc {
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => {}
                _ => out.push(lc),
            }
        }
    }
    out
}
