//! Owner, syndic and managing-agent identification.

use arretes_document_models::{Address, Party, PartyRole};
use arretes_gazetteer::Gazetteers;
use arretes_patterns::{
    entities::{IDENTITY_RE, MANAGER_LEFT_RE, OWNER_LEFT_RE, PARTY_ADDRESS_RE, SYNDIC_LEFT_RE},
    text::collapse_whitespace,
};
use regex::Regex;

use crate::address::parse_address_zone;

/// First owner named in `text`.
#[must_use]
pub fn extract_owner(text: &str, gazetteers: &Gazetteers) -> Option<Party> {
    first(PartyRole::Proprio, text, gazetteers)
}

/// First syndic named in `text`.
#[must_use]
pub fn extract_syndic(text: &str, gazetteers: &Gazetteers) -> Option<Party> {
    first(PartyRole::Syndic, text, gazetteers)
}

/// First managing agent named in `text`.
#[must_use]
pub fn extract_manager(text: &str, gazetteers: &Gazetteers) -> Option<Party> {
    first(PartyRole::Gest, text, gazetteers)
}

/// Every distinct party of a role named in `text`, in order of
/// appearance.
#[must_use]
pub fn find_parties(role: PartyRole, text: &str, gazetteers: &Gazetteers) -> Vec<Party> {
    let mut parties: Vec<Party> = Vec::new();
    for context in left_context(role).find_iter(text) {
        let Some(party) = party_at(role, &text[context.end()..], gazetteers) else {
            continue;
        };
        if !parties.iter().any(|p| p.name == party.name) {
            parties.push(party);
        }
    }
    parties
}

fn first(role: PartyRole, text: &str, gazetteers: &Gazetteers) -> Option<Party> {
    let mut parties = find_parties(role, text, gazetteers);
    if parties.len() > 1 {
        log::warn!(
            "{} candidates for {role}, keeping {:?}",
            parties.len(),
            parties[0].name
        );
    }
    (!parties.is_empty()).then(|| parties.swap_remove(0))
}

fn left_context(role: PartyRole) -> &'static Regex {
    match role {
        PartyRole::Proprio => &*OWNER_LEFT_RE,
        PartyRole::Syndic => &*SYNDIC_LEFT_RE,
        PartyRole::Gest => &*MANAGER_LEFT_RE,
    }
}

/// Party whose identity starts `rest`.
///
/// A known agency is matched first, on the raw text so that a line break
/// inside its name does not cut it, and replaced by its canonical name;
/// anything else is read up to the next clause boundary.
fn party_at(role: PartyRole, rest: &str, gazetteers: &Gazetteers) -> Option<Party> {
    let body = strip_article(rest.trim_start());
    if let Some(agency) = gazetteers.match_agency(body) {
        let tail = &body[agency.end..];
        return Some(Party {
            role,
            name: agency.canonical.to_string(),
            known_entity: true,
            address: party_address(tail).or_else(|| {
                IDENTITY_RE
                    .captures(tail)
                    .and_then(|caps| caps.name("stop"))
                    .and_then(|stop| party_address(&tail[stop.start()..]))
            }),
        });
    }

    let caps = IDENTITY_RE.captures(rest)?;
    let name = strip_article(caps.name("name")?.as_str().trim());
    if !name.chars().any(char::is_alphabetic) {
        return None;
    }
    let address = caps
        .name("stop")
        .and_then(|stop| party_address(&rest[stop.start()..]));

    Some(Party {
        role,
        name: collapse_whitespace(name),
        known_entity: false,
        address,
    })
}

fn strip_article(text: &str) -> &str {
    ["la ", "le ", "les ", "l'", "l’"]
        .iter()
        .find_map(|article| text.strip_prefix(article))
        .unwrap_or(text)
        .trim_start()
}

fn party_address(text: &str) -> Option<Address> {
    let zone = PARTY_ADDRESS_RE.captures(text)?.name("zone")?.as_str();
    parse_address_zone(zone)
        .into_addresses()
        .into_iter()
        .find(|address| !address.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteers() -> Gazetteers {
        Gazetteers::bundled().unwrap()
    }

    #[test]
    fn owner_with_address() {
        let owner = extract_owner(
            "l'immeuble appartenant à la SCI LES PINS, domiciliée 3 rue Y, 13006 Marseille, représentée par",
            &gazetteers(),
        )
        .unwrap();
        assert_eq!(owner.role, PartyRole::Proprio);
        assert_eq!(owner.name, "SCI LES PINS");
        assert!(!owner.known_entity);
        let address = owner.address.unwrap();
        assert_eq!(address.number.as_deref(), Some("3"));
        assert_eq!(address.postal_code.as_deref(), Some("13006"));
    }

    #[test]
    fn known_syndic_is_canonical() {
        let syndic = extract_syndic(
            "syndicat des copropriétaires pris en la personne de son syndic, le cabinet FONCIA, sis 12 rue Z",
            &gazetteers(),
        )
        .unwrap();
        assert_eq!(syndic.name, "Foncia");
        assert!(syndic.known_entity);
    }

    #[test]
    fn agency_with_legal_form_keeps_its_address() {
        let syndic = extract_syndic(
            "représenté par son syndic, la Foncia Marseille S.A., sise 1 rue Y, 13006 Marseille",
            &gazetteers(),
        )
        .unwrap();
        assert_eq!(syndic.name, "Foncia");
        assert!(syndic.known_entity);
        let address = syndic.address.unwrap();
        assert_eq!(address.number.as_deref(), Some("1"));
        assert_eq!(address.street.as_deref(), Some("rue Y"));
    }

    #[test]
    fn agency_name_across_a_line_break() {
        let syndic = extract_syndic(
            "représenté par son syndic, Immo de\nFrance Provence, sis 4 rue Z",
            &gazetteers(),
        )
        .unwrap();
        assert_eq!(syndic.name, "Immo de France");
        assert!(syndic.known_entity);
        assert_eq!(syndic.address.unwrap().number.as_deref(), Some("4"));
    }

    #[test]
    fn manager_agency_variant() {
        let manager =
            extract_manager("immeuble géré par l'agence Laforêt Immobilier;", &gazetteers()).unwrap();
        assert_eq!(manager.name, "Laforêt");
        assert_eq!(manager.role, PartyRole::Gest);
    }

    #[test]
    fn first_of_several_owners() {
        let text = "le lot 1 appartenant à M. Jean DUPONT, et le lot 2 appartenant à Mme Claire MARTIN, demeurant";
        let owners = find_parties(PartyRole::Proprio, text, &gazetteers());
        assert_eq!(owners.len(), 2);
        assert_eq!(
            extract_owner(text, &gazetteers()).map(|p| p.name).as_deref(),
            Some("M. Jean DUPONT")
        );
    }

    #[test]
    fn no_role_phrase() {
        assert!(extract_owner("Vu le code de la construction", &gazetteers()).is_none());
    }
}
