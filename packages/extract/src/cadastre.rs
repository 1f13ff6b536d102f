//! Cadastral references.
//!
//! The Marseille form is always tried before the generic one: read as
//! generic, `201 015 B 42` would lose its district and quarter codes.

use arretes_document_models::{CadastralForm, CadastralReference};
use arretes_gazetteer::MARSEILLE_INSEE;
use arretes_patterns::cadastre::{
    ADDRESS_AHEAD_RE, CONTINUATION_RE, GENERIC_REF_RE, LEFT_CONTEXT_RE, MARSEILLE_REF_RE,
    UNPREFIXED_MARSEILLE_RE,
};
use regex::Captures;

/// Parses one written reference (`201 015 B 0042`, `AB 123`) or a key
/// produced by [`normalize_cadastral`].
#[must_use]
pub fn parse_cadastral(text: &str) -> Option<CadastralReference> {
    let text = text.trim();
    MARSEILLE_REF_RE
        .captures(text)
        .map(|caps| marseille(&caps))
        .or_else(|| GENERIC_REF_RE.captures(text).map(|caps| generic(&caps)))
        .flatten()
        .or_else(|| CadastralReference::from_normalized_key(text).map(|(reference, _)| reference))
}

/// Fixed-width key of a reference for a commune.
///
/// A Marseille reference whose district disagrees with `insee` is logged;
/// the key still uses `insee`.
#[must_use]
pub fn normalize_cadastral(reference: &CadastralReference, insee: &str) -> String {
    if let Some(district) = reference.district_insee()
        && district != insee
    {
        if insee == MARSEILLE_INSEE {
            log::debug!("Cadastral reference {reference} narrows {insee} to {district}");
        } else {
            log::warn!("Cadastral reference {reference} is in {district}, not in {insee}");
        }
    }
    reference.normalized_key(insee)
}

/// Every cadastral reference of `text`, in order of appearance, without
/// duplicates.
#[must_use]
pub fn find_cadastral_references(text: &str) -> Vec<CadastralReference> {
    scan(text).references
}

/// Raw text of the first cadastral mention, from its left context to the
/// end of its last enumerated reference.
#[must_use]
pub fn cadastral_mention(text: &str) -> Option<&str> {
    scan(text).first_mention.map(|(b, e)| text[b..e].trim())
}

struct Scan {
    references: Vec<CadastralReference>,
    first_mention: Option<(usize, usize)>,
}

fn scan(text: &str) -> Scan {
    let mut references: Vec<CadastralReference> = Vec::new();
    let mut first_mention = None;
    let mut consumed = 0;

    for context in LEFT_CONTEXT_RE.find_iter(text) {
        if context.start() < consumed {
            continue;
        }
        let mut pos = context.end();
        let rest = &text[pos..];
        let first = MARSEILLE_REF_RE
            .captures(rest)
            .and_then(|caps| Some((marseille(&caps)?, caps.get(0)?.end())))
            .or_else(|| {
                let caps = GENERIC_REF_RE.captures(rest)?;
                Some((generic(&caps)?, caps.get(0)?.end()))
            });
        let Some((mut previous, end)) = first else {
            continue;
        };
        pos += end;
        push_unique(&mut references, previous.clone());

        while let Some(caps) = CONTINUATION_RE.captures(&text[pos..]) {
            let Some(end) = caps.get(0).map(|m| m.end()) else {
                break;
            };
            if ADDRESS_AHEAD_RE.is_match(&text[pos + end..]) {
                break;
            }
            let Some(next) = continuation(&caps, &previous) else {
                break;
            };
            pos += end;
            push_unique(&mut references, next.clone());
            previous = next;
        }

        first_mention.get_or_insert((context.start(), pos));
        consumed = pos;
    }

    for caps in UNPREFIXED_MARSEILLE_RE.captures_iter(text) {
        if let Some(reference) = marseille(&caps) {
            push_unique(&mut references, reference);
        }
    }

    Scan {
        references,
        first_mention,
    }
}

fn marseille(caps: &Captures<'_>) -> Option<CadastralReference> {
    Some(CadastralReference::marseille(
        caps.name("district")?.as_str(),
        caps.name("quarter")?.as_str(),
        caps.name("section")?.as_str(),
        caps.name("parcel")?.as_str(),
    ))
}

fn generic(caps: &Captures<'_>) -> Option<CadastralReference> {
    Some(CadastralReference::generic(
        caps.name("section")?.as_str(),
        caps.name("parcel")?.as_str(),
    ))
}

/// Reference of an enumerated continuation, inheriting the parts it
/// leaves out from the previous reference.
fn continuation(caps: &Captures<'_>, previous: &CadastralReference) -> Option<CadastralReference> {
    let parcel = caps.name("parcel")?.as_str();
    let section = caps
        .name("section")
        .map_or(previous.section.as_str(), |m| m.as_str());
    match (caps.name("district"), caps.name("quarter"), &previous.form) {
        (Some(district), Some(quarter), _) => Some(CadastralReference::marseille(
            district.as_str(),
            quarter.as_str(),
            section,
            parcel,
        )),
        (_, _, CadastralForm::Marseille { district, quarter }) => Some(
            CadastralReference::marseille(district, quarter, section, parcel),
        ),
        (_, _, CadastralForm::Generic) => Some(CadastralReference::generic(section, parcel)),
    }
}

fn push_unique(references: &mut Vec<CadastralReference>, reference: CadastralReference) {
    if !references.contains(&reference) {
        references.push(reference);
    }
}
