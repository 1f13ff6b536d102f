//! Owners, syndics and managing agents.
//!
//! Each role has its own left context; the identity that follows is read
//! with one shared grammar that stops at the first clause boundary.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    address::{COMPLEMENT_KEYWORD, street_type, zone_stop},
    build,
};

/// Owner left context (`appartenant à`, `propriété de`, `le propriétaire
/// est`).
pub static OWNER_LEFT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:(?:appartien(?:t|nent)|appartenant)\s+(?:en\s+(?:toute\s+propri[ée]t[ée]|copropri[ée]t[ée]|indivision)\s+)?(?:à|a|aux)\s+|propri[ée]t[ée]\s+(?:de|du|des)\s+|(?:le|la|les)\s+propri[ée]taires?\s+(?:(?:de\s+l['’]\s*immeuble|du\s+bien|de\s+la\s+parcelle)\s+)?(?:(?:est|sont)\s+|:\s*|identifi[ée]e?s?\s+(?:est|sont)\s+))",
    )
});

/// Syndic left context (`pris en la personne de`, `représenté par son
/// syndic`, `syndic :`).
pub static SYNDIC_LEFT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:pris(?:e)?\s+en\s+la\s+personne\s+d(?:e|u)\s+(?:son\s+syndic\s*,?\s*(?:en\s+exercice\s*,?\s*)?)?|repr[ée]sent[ée]e?s?\s+par\s+(?:son|le)\s+syndic\s*(?:en\s+exercice)?\s*,?\s*|syndic\s+(?:de\s+(?:la\s+)?copropri[ée]t[ée]\s*)?:\s*|(?:ayant\s+pour|dont\s+le)\s+syndic\s+(?:est\s+)?)(?:(?:le\s+)?cabinet\s+|l['’]\s*agence\s+|la\s+soci[ée]t[ée]\s+)?",
    )
});

/// Managing-agent left context (`géré par`, `gestionnaire :`).
pub static MANAGER_LEFT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:g[ée]r[ée]e?s?\s+par\s+|gestionnaire\s*(?:de\s+l['’]\s*immeuble)?\s*(?::|est)\s*|administr[ée]e?s?\s+par\s+|mandataire\s*(?:de\s+gestion)?\s*:\s*|(?:dont|ayant\s+pour)\s+(?:le\s+)?gestionnaire\s+(?:est\s+)?)(?:(?:le\s+)?cabinet\s+|l['’]\s*agence\s+|la\s+soci[ée]t[ée]\s+)?",
    )
});

/// Identity after a left context, anchored. Named groups: `name`, `stop`.
///
/// A leading civility abbreviation keeps its dot (`M. DUPONT`).
pub static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"^\s*(?P<name>(?:(?i:m|mme|mlle|mr|me|mm)\.\s*)?[^,;:\n()]{2,120}?)(?P<stop>\s*$|\s*[,;:\n(]|\.(?:\s|$)|\s(?i:domicili\w*|demeurant|r[ée]sidant|sis|sise|situ[ée]\w*|dont|qui|repr[ée]sent\w*|pris|prise|ayant|en\s+sa\s+qualit[ée]|et\s+(?:à|au|aux)|pour|immatricul\w*|n[ée]e?\s+le)\b)",
    )
});

/// Address of a party right after its identity, anchored. Named groups:
/// `zone`, `stop`.
pub static PARTY_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^\s*,?\s*(?i:domicili[ée]e?s?|demeurant|r[ée]sidant|sise?|situ[ée]e?s?|dont\s+le\s+si[èe]ge(?:\s+social)?\s+est(?:\s+situ[ée])?|ayant\s+(?:son\s+)?si[èe]ge(?:\s+social)?)\s*(?:(?i:au|à|:)\s+)?(?P<zone>(?:\d{{1,4}}[^\d\n]|{street}|{COMPLEMENT_KEYWORD})[^;]{{0,200}}?){stop}",
        street = street_type(),
        stop = zone_stop()
    ))
});
