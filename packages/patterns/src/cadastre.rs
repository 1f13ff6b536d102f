//! Cadastral reference grammar.
//!
//! References are only trusted after a cadastral left context
//! (`cadastré`, `parcelle`, `références cadastrales`), except for the long
//! Marseille form whose shape is distinctive enough on its own.

use std::sync::LazyLock;

use regex::Regex;

use crate::{address::street_type, build};

/// Marseille arrondissement codes `201`..=`216`.
pub const DISTRICT: &str = r"2(?:0[1-9]|1[0-6])";

/// Cadastral left context.
pub static LEFT_CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:\bcadastr[ée]e?s?|\br[ée]f[ée]rences?\s+cadastrales?|\bparcelles?(?:\s+cadastrales?)?|\bau\s+cadastre)\b\s*:?",
    )
});

/// Marseille reference right after a left context, anchored. Named groups:
/// `district`, `quarter`, `section`, `parcel`.
pub static MARSEILLE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^[^\d;.\n]{{0,40}}?\b(?i:quartier\s+)?(?P<district>{DISTRICT})\s*(?P<quarter>\d{{3}})\s*(?i:section\s+)?(?P<section>(?-i:[A-Z]{{1,2}}))\s*(?i:n[°o]\s*)?(?P<parcel>\d{{1,4}})\b"
    ))
});

/// Generic `section + parcel` reference right after a left context,
/// anchored. Named groups: `section`, `parcel`.
pub static GENERIC_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"^[^\d;.\n]{0,40}?(?i:section\s+)?\b(?P<section>(?-i:[A-Z]{1,2}))\s*(?i:n[°o]s?\s*|num[ée]ros?\s*)?(?P<parcel>\d{1,4})\b",
    )
});

/// Enumerated continuation (`, 43`, `et AB 12`, `et 201 015 C 7`),
/// anchored. Missing parts are inherited from the previous reference.
/// Named groups: `district`, `quarter`, `section`, `parcel`.
pub static CONTINUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^\s*(?:,|&|/|(?i:et)\b)\s*(?i:(?:la\s+)?parcelles?\s+)?(?:(?P<district>{DISTRICT})\s*(?P<quarter>\d{{3}})\s*)?(?:(?P<section>(?-i:[A-Z]{{1,2}}))\s*)?(?i:n[°o]s?\s*)?(?P<parcel>\d{{1,4}})\b"
    ))
});

/// A number followed by a street type is an address, not a parcel.
pub static ADDRESS_AHEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^\s*(?:(?i:bis|ter|quater)\b\s*)?,?\s*{}",
        street_type()
    ))
});

/// Marseille reference without left context: requires the 4-digit parcel
/// form. Named groups: `district`, `quarter`, `section`, `parcel`.
pub static UNPREFIXED_MARSEILLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"\b(?P<district>{DISTRICT})[ \t]?(?P<quarter>\d{{3}})[ \t]?(?P<section>[A-Z]{{1,2}})[ \t]?(?P<parcel>\d{{4}})\b"
    ))
});

#[cfg(test)]
mod tests {
    use super::*;

    fn after_context(text: &str) -> &str {
        let m = LEFT_CONTEXT_RE.find(text).unwrap();
        &text[m.end()..]
    }

    #[test]
    fn marseille_reference() {
        let rest = after_context("parcelle cadastrée sous le n° 201 015 B 42 au");
        let caps = MARSEILLE_REF_RE.captures(rest).unwrap();
        assert_eq!(&caps["district"], "201");
        assert_eq!(&caps["quarter"], "015");
        assert_eq!(&caps["section"], "B");
        assert_eq!(&caps["parcel"], "42");
    }

    #[test]
    fn generic_reference() {
        let rest = after_context("cadastrée section AB n° 123,");
        assert!(MARSEILLE_REF_RE.captures(rest).is_none());
        let caps = GENERIC_REF_RE.captures(rest).unwrap();
        assert_eq!(&caps["section"], "AB");
        assert_eq!(&caps["parcel"], "123");
    }

    #[test]
    fn generic_reference_needs_parcel() {
        let rest = after_context("parcelle de la Ville de Marseille");
        assert!(GENERIC_REF_RE.captures(rest).is_none());
    }

    #[test]
    fn continuation_inherits_parts() {
        let caps = CONTINUATION_RE.captures(" et 43 ").unwrap();
        assert!(caps.name("section").is_none());
        assert_eq!(&caps["parcel"], "43");
        let caps = CONTINUATION_RE.captures(", C 7").unwrap();
        assert_eq!(&caps["section"], "C");
        assert!(ADDRESS_AHEAD_RE.is_match(" rue X"));
    }

    #[test]
    fn unprefixed_marseille_reference() {
        let caps = UNPREFIXED_MARSEILLE_RE.captures("immeuble 206824AB0012 sis").unwrap();
        assert_eq!(&caps["district"], "206");
        assert_eq!(&caps["parcel"], "0012");
        assert!(UNPREFIXED_MARSEILLE_RE.captures("206 824 AB 12").is_none());
    }
}
