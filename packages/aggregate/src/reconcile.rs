//! Commune, INSEE code and postal code reconciliation through the
//! gazetteers.

use arretes_document_models::{Address, CadastralReference};
use arretes_extract::normalize_cadastral;
use arretes_gazetteer::{Gazetteers, MARSEILLE_INSEE, is_marseille_district};

/// Display name of a commune as spelled in the gazetteer, or the name as
/// written.
#[must_use]
pub fn canonical_commune(name: &str, gazetteers: &Gazetteers) -> String {
    gazetteers
        .canonical_commune(name)
        .map_or_else(|| name.to_string(), ToString::to_string)
}

/// INSEE code of the order.
///
/// The address is more precise than the authority for Marseille, whose
/// mayor signs for every arrondissement. When the two disagree otherwise,
/// the authority wins and a warning is returned.
#[must_use]
pub fn resolve_insee(
    commune_maire: Option<&str>,
    addresses: &[Address],
    gazetteers: &Gazetteers,
) -> (Option<String>, Option<String>) {
    let from_mayor = commune_maire.and_then(|c| gazetteers.insee_for_commune(c));
    let from_address = addresses.iter().find_map(|address| {
        address
            .postal_code
            .as_deref()
            .and_then(|cp| gazetteers.insee_for_postcode(cp))
            .or_else(|| {
                address
                    .commune
                    .as_deref()
                    .and_then(|c| gazetteers.insee_for_commune(c))
                    .map(ToString::to_string)
            })
    });

    match (from_mayor, from_address) {
        (Some(mayor), Some(address))
            if mayor == address || (mayor == MARSEILLE_INSEE && is_marseille_district(&address)) =>
        {
            (Some(address), None)
        }
        (Some(mayor), Some(address)) => (
            Some(mayor.to_string()),
            Some(format!(
                "address INSEE code {address} differs from the authority's {mayor}"
            )),
        ),
        (Some(mayor), None) => (Some(mayor.to_string()), None),
        (None, address) => (address, None),
    }
}

/// Fills the postal code and commune an address leaves out, and spells
/// its commune as the gazetteer does.
pub fn backfill_address(address: &mut Address, insee: Option<&str>, gazetteers: &Gazetteers) {
    if let Some(commune) = &address.commune {
        address.commune = Some(canonical_commune(commune, gazetteers));
    }
    let Some(insee) = insee else {
        return;
    };
    if address.postal_code.is_none() {
        address.postal_code = gazetteers.postcode_for_insee(insee).map(ToString::to_string);
    }
    if address.commune.is_none() && !address.is_empty() {
        let commune = if is_marseille_district(insee) {
            gazetteers.commune_name(MARSEILLE_INSEE)
        } else {
            gazetteers.commune_name(insee)
        };
        address.commune = commune.map(ToString::to_string);
    }
}

/// Normalized key of a cadastral reference, with a warning when its
/// district disagrees with the order's INSEE code.
///
/// Marseille references fall back on their own district when the order
/// only knows the whole-city code. Generic references need an INSEE code.
#[must_use]
pub fn cadastral_key(
    reference: &CadastralReference,
    insee: Option<&str>,
) -> (Option<String>, Option<String>) {
    let district = reference.district_insee();
    let key_insee = match (insee, district.as_deref()) {
        (Some(MARSEILLE_INSEE) | None, Some(district)) => district,
        (Some(insee), _) => insee,
        (None, None) => {
            return (
                None,
                Some(format!("no INSEE code to normalize cadastral reference {reference}")),
            );
        }
    };
    let warning = district
        .as_deref()
        .filter(|d| *d != key_insee)
        .map(|d| format!("cadastral reference {reference} is in {d}, not in {key_insee}"));
    (Some(normalize_cadastral(reference, key_insee)), warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteers() -> Gazetteers {
        Gazetteers::bundled().unwrap()
    }

    fn address(postal_code: Option<&str>, commune: Option<&str>) -> Address {
        Address {
            number: Some("1".to_string()),
            street: Some("rue X".to_string()),
            postal_code: postal_code.map(ToString::to_string),
            commune: commune.map(ToString::to_string),
            ..Address::default()
        }
    }

    #[test]
    fn marseille_address_narrows_to_arrondissement() {
        let (insee, warning) = resolve_insee(
            Some("Marseille"),
            &[address(Some("13001"), Some("Marseille"))],
            &gazetteers(),
        );
        assert_eq!(insee.as_deref(), Some("13201"));
        assert!(warning.is_none());
    }

    #[test]
    fn authority_wins_on_disagreement() {
        let (insee, warning) = resolve_insee(
            Some("Aubagne"),
            &[address(None, Some("Cassis"))],
            &gazetteers(),
        );
        assert_eq!(insee.as_deref(), Some("13005"));
        assert!(warning.is_some());
    }

    #[test]
    fn whole_marseille_without_address() {
        let (insee, _) = resolve_insee(Some("MARSEILLE"), &[], &gazetteers());
        assert_eq!(insee.as_deref(), Some("13055"));
    }

    #[test]
    fn backfills_postal_code_and_commune() {
        let mut a = address(None, None);
        backfill_address(&mut a, Some("13201"), &gazetteers());
        assert_eq!(a.postal_code.as_deref(), Some("13001"));
        assert_eq!(a.commune.as_deref(), Some("Marseille"));

        let mut b = address(Some("13400"), Some("AUBAGNE"));
        backfill_address(&mut b, Some("13005"), &gazetteers());
        assert_eq!(b.commune.as_deref(), Some("Aubagne"));
    }

    #[test]
    fn cadastral_keys() {
        let marseille = CadastralReference::marseille("201", "015", "B", "42");
        let (key, warning) = cadastral_key(&marseille, Some(MARSEILLE_INSEE));
        assert_eq!(key.as_deref(), Some("132010150B0042"));
        assert!(warning.is_none());

        let (key, warning) = cadastral_key(&marseille, Some("13202"));
        assert_eq!(key.as_deref(), Some("132020150B0042"));
        assert!(warning.is_some());

        let generic = CadastralReference::generic("AB", "12");
        assert_eq!(cadastral_key(&generic, None).0, None);
        assert_eq!(
            cadastral_key(&generic, Some("13005")).0.as_deref(),
            Some("13005000AB0012")
        );
    }
}
