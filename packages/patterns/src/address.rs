//! Street address grammar.
//!
//! An address zone is the raw text naming the targeted building
//! (`10-12-14 boulevard National, bâtiment B, 13003 Marseille`). It is
//! decomposed as: optional leading complement, one or more street groups
//! (number list + street type + name), optional trailing complement,
//! optional postal code and commune.

use std::sync::LazyLock;

use regex::Regex;

use crate::{build, commune::COMMUNE};

/// Street types written out or abbreviated with an optional dot.
const STREET_TYPE_WORDS: &str = r"rue|boulevard|bd|bld|blvd|bvd|avenue|ave|av|chemin|impasse|imp|traverse|trav|tse|place|cours|quai|all[ée]es?|mont[ée]e|route|rte|lotissement|cit[ée]|passage|square|rond[- ]point|parvis|esplanade|corniche|domaine|hameau|faubourg|descente|rampe|voie|grand['’ -]rue|promenade|sentier|carrefour";

/// Abbreviations that only count as street types with their dot.
const STREET_TYPE_DOTTED: &str = r"ch|pl|sq|fg";

/// A street type, case-insensitive.
#[must_use]
pub fn street_type() -> String {
    format!(r"(?i:(?:{STREET_TYPE_WORDS})\b\.?|(?:{STREET_TYPE_DOTTED})\.)")
}

/// A repetition indicator: `bis`, `ter`, `quater` or a single capital
/// letter. Keeping the letter case-sensitive and word-bounded keeps the
/// `E` of an uppercase `ET` out.
pub const INDICATOR: &str = r"(?:(?i:bis|ter|quater|quinquies)\b|(?-i:[A-Z])\b)";

/// One indicator or a parenthesised list of them (`(A, B)`).
#[must_use]
pub fn indicator_list() -> String {
    format!(
        r"(?:{INDICATOR}|\(\s*{INDICATOR}(?:\s*(?:,|;|/|-|&|(?i:et)\b)\s*{INDICATOR})*\s*\))"
    )
}

/// Separator inside a number list: `,` `/` `-` `&` `et` `à` `au`.
pub const NUMBER_SEPARATOR: &str = r"\s*(?:,|/|-|&|(?i:et|à|au)\b)\s*";

/// A list of street numbers with their indicators (`10-12-14`,
/// `12 bis et 14`, `12 (A, B)`).
#[must_use]
pub fn number_list() -> String {
    let item = format!(r"\d{{1,4}}(?:\s*{})?", indicator_list());
    format!("(?:{item}(?:{NUMBER_SEPARATOR}{item})*)")
}

/// Building designations that can precede or follow the street.
pub const COMPLEMENT_KEYWORD: &str = r"(?i:r[ée]sidence|immeuble|b[aâ]timent|b[aâ]t\b\.?|villa|copropri[ée]t[ée]|ensemble\s+immobilier|escaliers?\b|esc\b\.?|lots?\b|appartements?|appt\b\.?|logements?\b|entr[ée]e|porte\b|maison|hangar|locaux|local\b|parking)";

/// Words that end a street name: building designations, cadastral
/// context and locality markers.
const NAME_STOPWORDS: &str = r"b[aâ]timent|b[aâ]t\b|r[ée]sidence|immeuble|escaliers?|esc\b|lots?|appartements?|appt|logements?|copropri[ée]t[ée]|cadastr\w*|parcelles?|section|quartier|r[ée]f[ée]rences?|appartena\w*|appartien\w*|propri[ée]t\w*|dont|qui|pris|prise|repr[ée]sent\w*";

/// Right boundary of a street group. Never consumed: callers resume at the
/// start of the `stop` group.
#[must_use]
pub fn group_stop() -> String {
    format!(
        r"(?P<stop>\s*\.?\s*$|\s*[,;()/]|\s+-\s|\s+\d{{5}}\b|\s+(?i:et|&|à|au)\s+\d|\s+\d{{1,4}}\s*(?:(?i:bis|ter|quater)\b\s*)?,?\s*{street}|\s+(?i:{NAME_STOPWORDS})\b|\s+(?i:à)\s+(?-i:\p{{Lu}}))",
        street = street_type()
    )
}

/// Words that end an address zone in running text.
const ZONE_STOPWORDS: &str = r"cadastr\w*|parcelles?|r[ée]f[ée]rences?|section|appartena\w*|appartien\w*|propri[ée]t[ée]\s+d\w*|propri[ée]taires?|pris(?:e)?\s+en|repr[ée]sent\w*|dont|qui|est|sont|ainsi|au\s+motif|en\s+raison|pr[ée]sent\w*|en\s+application|conform[ée]ment|dans\s+(?:le|la|les|l['’]|son|sa|ses)|afin|pour|susceptibles?|justifi\w*|consid[ée]rant|vu|article|code|ayant|faisant|fait|lequel|laquelle|lesquels|depuis|suite|compte\s+tenu|constat\w*|selon|sur\s+(?:la|le|les|l['’])\s*(?:commune|territoire|base|parcelle)|et\s+(?:de|des|du|notamment|qui|que|dont|sur|en)\b|ont|a\s+(?:[ée]t[ée]|fait)|il|elle|ils|par\s+(?:le|la|les|l['’]|un|une)|mettant|pouvant|occup[ée]\w*|occupant\w*|signal\w*|lors|mais|comme|en\s+(?:date|vue|cas|particulier|outre|effet|mauvais|bon|p[ée]ril)|mena[çc]\w*|se\s+trouv\w*|vis[ée]\w*|d[ée]sign\w*";

/// Right boundary of an address zone in running text. Named group: `stop`.
#[must_use]
pub fn zone_stop() -> String {
    format!(
        r"(?P<stop>\s*$|\s*;|\s*\.[ \t]*(?:\n|$)|\s*\.\s+(?i:le|la|les|il|elle|ce|cette|en|un|une|dans|par|l['’]|d['’])\b|\n[ \t]*\n|[,\s]\s*\(?\s*(?i:{ZONE_STOPWORDS})\b)"
    )
}

/// First token of an address zone: a street number (not a postal code), a
/// street type or a building designation.
#[must_use]
pub fn zone_start() -> String {
    format!(r"(?:\d{{1,4}}[^\d\n]|{}|{COMPLEMENT_KEYWORD})", street_type())
}

/// Phrases introducing the address of the targeted building.
const ZONE_LEFT: &str = r"(?i:situ[ée]e?s?|sise?s?|sis[ée]s?|localis[ée]e?s?|[àa]\s+l['’]adresse|adresse\s*:|immeuble|b[aâ]timent|maison|propri[ée]t[ée]|parcelle\s+b[aâ]tie)";

/// Address zone in running text, after an introducing phrase. Named
/// groups: `zone`, `stop`.
pub static ZONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"\b{ZONE_LEFT}\s*(?:(?i:au|aux|à|:)\s+)?(?P<zone>{start}[^;]{{0,300}}?){stop}",
        start = zone_start(),
        stop = zone_stop()
    ))
});

/// Start of an address inside a title, numbered form.
pub static TITLE_NUMBERED_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"\b{numbers}\s*,?\s*{street}\s",
        numbers = number_list(),
        street = street_type()
    ))
});

/// Start of an address inside a title, street type only.
pub static TITLE_STREET_START_RE: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"\b{}\s", street_type())));

/// Separators and joining words allowed before a street group.
const GROUP_LEAD: &str = r"^(?:[\s,/&-]|(?i:et)\b)*";

/// One street group, anchored. Named groups: `numbers`, `type`, `name`,
/// `stop`.
pub static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"{GROUP_LEAD}(?:(?P<numbers>{numbers})\s*,?\s*)?(?P<type>{street})(?:\s+(?P<name>[^,;()/\n]{{1,80}}?))?{stop}",
        numbers = number_list(),
        street = street_type(),
        stop = group_stop()
    ))
});

/// A numbered street without street type (`5 La Canebière`), anchored.
/// Named groups: `numbers`, `name`, `stop`.
pub static UNTYPED_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"{GROUP_LEAD}(?P<numbers>{numbers})\s+(?P<name>(?-i:\p{{Lu}})[^,;()/\n]{{1,60}}?){stop}",
        numbers = number_list(),
        stop = group_stop()
    ))
});

/// One number and its indicators inside a number list. Named groups:
/// `num`, `ind`.
pub static NUMBER_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?P<num>\d{{1,4}})(?:\s*(?P<ind>{}))?",
        indicator_list()
    ))
});

/// One indicator inside an indicator list.
pub static INDICATOR_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| build(INDICATOR));

/// Leading building designation, anchored. Named groups: `pre`, `stop`.
pub static LEADING_COMPLEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^[\s,/-]*(?P<pre>{COMPLEMENT_KEYWORD}[^\d]{{0,80}}?)[\s,-]*(?P<stop>\d|{street})",
        street = street_type()
    ))
});

/// Trailing building designation, anchored. Named groups: `compl`, `stop`.
pub static TRAILING_COMPLEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^[\s,-]*(?P<compl>{COMPLEMENT_KEYWORD}[^,;()]{{0,80}}?)(?P<stop>\s*(?:$|[,;()]|\s\d{{5}}\b|\s-\s))"
    ))
});

/// Cadastral aside inside an address zone, anchored. Named group: `stop`.
pub static CADASTRAL_ASIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"^[\s,-]*\(?\s*(?i:cadastr\w*|parcelles?|r[ée]f[ée]rences?\s+cadastrales?|section)\b[^,)]*?(?:\)|(?P<stop>\s*,|\s+\d{5}\b|\s*$))",
    )
});

/// Postal code and commune, anchored. Named groups: `cp`/`commune`,
/// `commune2`/`cp2` or `commune3`/`cp3`.
pub static LOCALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^[\s,-]*(?:(?P<cp>\d{{5}})(?:\s*,?\s*(?P<commune>{COMMUNE}))?|(?i:à)\s+(?P<commune2>{COMMUNE})(?:\s*,?\s*(?P<cp2>\d{{5}}))?|(?P<commune3>{COMMUNE})\s*\(?\s*(?P<cp3>\d{{5}})\)?)"
    ))
});

/// `/` between two full addresses, anchored.
pub static PAIR_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| build(r"^\s*/\s*"));
