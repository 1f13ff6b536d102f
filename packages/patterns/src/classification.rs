//! Vocabulary of the legal order types.
//!
//! Matchers are case-insensitive and tolerate line breaks between words,
//! so they apply equally to titles and to paragraph bodies.

use std::sync::LazyLock;

use regex::Regex;

use crate::build;

/// `occuper`, `habiter` or `occupation` after `d'`.
const OCCUPANCY: &str = r"d['’]\s*(?:occuper|habiter|occupation)";

/// Partial lifting of a previous order.
pub static MAINLEVEE_PARTIELLE_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i:main[ \t-]?lev[ée]e\s+partielle)"));

/// Lifting of a previous order, or repeal of a danger/safety order.
pub static MAINLEVEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:main[ \t-]?lev[ée]e|abrog\w*\s+(?:de\s+)?(?:l['’]\s*)?arr[êe]t[ée]\s+(?:de\s+)?(?:p[ée]ril|mise\s+en\s+s[ée]curit[ée]))",
    )
});

/// Repeal of a ban on occupancy.
pub static ABROGATION_INTERDICTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?i:abrog\w*[^\n.]{{0,60}}?interdiction\s+(?:\w+\s+)?{OCCUPANCY})"
    ))
});

/// Amendment of a ban on occupancy.
pub static MODIFICATIF_INTERDICTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?i:modifica\w*[^\n.]{{0,60}}?interdiction\s+(?:\w+\s+)?{OCCUPANCY})"
    ))
});

/// Deconstruction or demolition order.
pub static DECONSTRUCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:arr[êe]t[ée]\s+(?:de|portant|ordonnant|prescrivant)\s+(?:la\s+)?d[ée](?:construction|molition))",
    )
});

/// Serious and imminent danger.
pub static PERIL_GRAVE_IMMINENT_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i:p[ée]ril\s+(?:grave\s+et\s+)?imminent)"));

/// Shared-equipment safety.
pub static EQUIPEMENTS_COMMUNS_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i:(?:s[ée]curit[ée]|ins[ée]curit[ée])\s+des\s+[ée]quipements\s+communs)")
});

/// Safety order.
pub static MISE_EN_SECURITE_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i:mise\s+en\s+s[ée]curit[ée])"));

/// Ordinary danger, or danger without qualifier.
pub static PERIL_ORDINAIRE_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i:p[ée]ril\s+(?:ordinaire|simple|non\s+imminent)|\bp[ée]ril\b)"));

/// Ban on occupancy.
pub static INTERDICTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?i:interdiction\s+(?:\w+\s+)?{OCCUPANCY}|interdi\w*\s+(?:à\s+l['’]\s*(?:habitation|occupation)|{OCCUPANCY}))"
    ))
});

/// Urgent procedure, explicit or through article L511-19.
pub static URGENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i:proc[ée]dure\s+urgente|\burgen(?:ce|te|t)\b|\bL\.?[ \t]*511[ \t]*-[ \t]*19\b)")
});

/// Ordinary procedure.
pub static ORDINARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i:proc[ée]dure\s+ordinaire|\bnon\s+urgente?\b|\bp[ée]ril\s+(?:ordinaire|simple))")
});

/// Demolition prescribed.
pub static DEMOLITION_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i:\bd[ée]moli(?:tion|r)\b|\bd[ée]constru(?:ction|ire)\b)"));
