//! Character-level helpers: OCR repair, whitespace collapsing and name
//! simplification for dictionary lookups.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::build;

/// Apostrophe forms found in OCR output.
pub const APOS: &str = r"['’]";

/// Inline whitespace (no line break).
pub const HSPACE: &str = r"[ \t]";

static SPACED_DEGREE_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b([nN])[ \t]+°"));

static SPACED_POSTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b(\d)[ \t](\d)[ \t](\d)[ \t](\d)[ \t](\d)\b"));

static SPLIT_POSTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"\b(\d{2})[ \t](\d{3})([ \t]+\p{Lu})"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| build(r"\s+"));

static SAINT_RE: LazyLock<Regex> = LazyLock::new(|| build(r"\b(st|ste)\b"));

/// Repairs common OCR artefacts in an extracted value.
///
/// Folds typographic apostrophes and non-breaking spaces, expands
/// ligatures, glues `n °` back to `n°` and rejoins postal codes split by
/// stray spaces (`1 3 0 0 1`, `13 001 Marseille`). The result is whitespace
/// collapsed; never apply it to a page body whose offsets matter.
#[must_use]
pub fn repair_ocr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2019}' | '\u{2018}' | '`' | '\u{b4}' => out.push('\''),
            '\u{a0}' | '\u{202f}' | '\u{2009}' => out.push(' '),
            '\u{fb01}' => out.push_str("fi"),
            '\u{fb02}' => out.push_str("fl"),
            '\u{fb00}' => out.push_str("ff"),
            '\u{fb03}' => out.push_str("ffi"),
            '\u{fb04}' => out.push_str("ffl"),
            '\u{2010}' | '\u{2011}' | '\u{2013}' => out.push('-'),
            _ => out.push(c),
        }
    }
    let out = SPACED_DEGREE_RE.replace_all(&out, "${1}°");
    let out = SPACED_POSTCODE_RE.replace_all(&out, "${1}${2}${3}${4}${5}");
    let out = SPLIT_POSTCODE_RE.replace_all(&out, "${1}${2}${3}");
    collapse_whitespace(&out)
}

/// Replaces every whitespace run (line breaks included) by one space and
/// trims both ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Trims whitespace and the punctuation left over around extracted values.
#[must_use]
pub fn trim_value(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '.'))
}

/// Lookup key for names: accents stripped, lowercase, hyphens and
/// apostrophes turned into spaces, `St`/`Ste` expanded.
///
/// `"Saint-Rémy-de-Provence"`, `"ST REMY DE PROVENCE"` and
/// `"St-Rémy-de-Provence"` share the key `"saint remy de provence"`.
#[must_use]
pub fn simplify(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            '-' | '\'' | '’' | '_' | '.' => ' ',
            _ => c,
        })
        .collect::<String>()
        .to_lowercase();
    let expanded = SAINT_RE.replace_all(&folded, |caps: &regex::Captures<'_>| {
        if &caps[1] == "st" { "saint" } else { "sainte" }
    });
    collapse_whitespace(&expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_ocr_artefacts() {
        assert_eq!(repair_ocr("l’immeuble  n °12"), "l'immeuble n°12");
        assert_eq!(repair_ocr("1 3 0 0 1 Marseille"), "13001 Marseille");
        assert_eq!(repair_ocr("13 001 Marseille"), "13001 Marseille");
        assert_eq!(repair_ocr("ofﬁce"), "office");
    }

    #[test]
    fn leaves_dates_alone() {
        assert_eq!(repair_ocr("12 mars 2021"), "12 mars 2021");
    }

    #[test]
    fn collapses_line_breaks() {
        assert_eq!(collapse_whitespace("  12 rue\n  X  "), "12 rue X");
    }

    #[test]
    fn trims_punctuation() {
        assert_eq!(trim_value(" Aubagne, "), "Aubagne");
        assert_eq!(trim_value("SCI Les Pins."), "SCI Les Pins");
    }

    #[test]
    fn simplifies_names() {
        assert_eq!(simplify("Saint-Rémy-de-Provence"), "saint remy de provence");
        assert_eq!(simplify("ST REMY DE PROVENCE"), "saint remy de provence");
        assert_eq!(simplify("L'Isle-sur-la-Sorgue"), "l isle sur la sorgue");
        assert_eq!(simplify("Gémenos"), "gemenos");
    }
}
