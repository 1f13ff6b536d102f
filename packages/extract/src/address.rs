//! Address zones and their decomposition into [`Address`] records.
//!
//! A zone is decomposed left to right: an optional leading building
//! designation, one or more street groups, an optional trailing
//! designation, an optional cadastral aside and an optional locality.
//! Each street group is matched anchored at the position where the
//! previous one stopped, never where it ended, so the right context that
//! bounded one group is still there to open the next.

use arretes_document_models::{Address, AddressZone};
use arretes_patterns::{
    address::{
        CADASTRAL_ASIDE_RE, GROUP_RE, INDICATOR_ITEM_RE, LEADING_COMPLEMENT_RE, LOCALITY_RE,
        NUMBER_ITEM_RE, PAIR_SEPARATOR_RE, TITLE_NUMBERED_START_RE, TITLE_STREET_START_RE,
        TRAILING_COMPLEMENT_RE, UNTYPED_GROUP_RE, ZONE_RE,
    },
    text::{collapse_whitespace, repair_ocr, trim_value},
};
use regex::Match;

/// First address zone introduced by `sis`, `situé`, `immeuble`... in
/// running text.
#[must_use]
pub fn find_address_zone(text: &str) -> Option<&str> {
    ZONE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.name("zone"))
        .map(|zone| trim_value(zone.as_str()))
        .find(|zone| !zone.is_empty())
}

/// Address zone inside an order title (`Arrêté de péril - 12 rue X -
/// 13001 Marseille`): an introduced zone if there is one, else everything
/// from the first street number or street type.
#[must_use]
pub fn address_zone_from_title(title: &str) -> Option<&str> {
    if let Some(zone) = find_address_zone(title) {
        return Some(zone);
    }
    let start = TITLE_NUMBERED_START_RE
        .find(title)
        .or_else(|| TITLE_STREET_START_RE.find(title))?
        .start();
    Some(trim_value(&title[start..])).filter(|zone| !zone.is_empty())
}

/// Decomposes a zone, keeping two `/`-separated addresses apart.
///
/// A `/` between two street groups always splits the zone, even when only
/// the second half carries a locality. That locality is not copied onto
/// the first half.
#[must_use]
pub fn parse_address_zone(zone: &str) -> AddressZone {
    let text = repair_ocr(zone);
    let first = parse_half(&text, 0);
    if let Some(separator) = PAIR_SEPARATOR_RE.find(&text[first.end..]) {
        let second = parse_half(&text, first.end + separator.end());
        if !second.addresses.is_empty() {
            log::warn!("Address zone names two buildings, needs review: {zone}");
            return AddressZone::Pair {
                first: first.addresses,
                second: second.addresses,
            };
        }
    }
    AddressZone::Single(first.addresses)
}

/// Decomposes a zone into at least one address.
///
/// A missing or undecomposable zone yields one record with every field
/// empty.
#[must_use]
pub fn decompose_address(zone: Option<&str>) -> Vec<Address> {
    let addresses = zone
        .map(|zone| parse_address_zone(zone).into_addresses())
        .unwrap_or_default();
    if addresses.is_empty() {
        vec![Address::default()]
    } else {
        addresses
    }
}

/// One address of a zone, before fan-out.
struct Half {
    addresses: Vec<Address>,
    /// Offset after the last consumed token.
    end: usize,
}

struct StreetGroup {
    numbers: Option<String>,
    street: String,
}

fn parse_half(text: &str, start: usize) -> Half {
    let mut pos = start;
    let mut complement = None;

    if let Some(caps) = LEADING_COMPLEMENT_RE.captures(&text[pos..]) {
        complement = value(caps.name("pre"));
        pos += caps.name("stop").map_or(0, |m| m.start());
    }

    let mut groups = Vec::new();
    loop {
        let rest = &text[pos..];
        if !groups.is_empty() && PAIR_SEPARATOR_RE.is_match(rest) {
            break;
        }
        let caps = GROUP_RE.captures(rest).or_else(|| {
            if groups.is_empty() {
                UNTYPED_GROUP_RE.captures(rest)
            } else {
                None
            }
        });
        let Some(caps) = caps else {
            break;
        };
        let Some(stop) = caps.name("stop").filter(|m| m.start() > 0) else {
            break;
        };
        let street = [caps.name("type"), caps.name("name")]
            .into_iter()
            .flatten()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        groups.push(StreetGroup {
            numbers: caps.name("numbers").map(|m| m.as_str().to_string()),
            street: collapse_whitespace(trim_value(&street)),
        });
        pos += stop.start();
    }

    if let Some(caps) = TRAILING_COMPLEMENT_RE.captures(&text[pos..]) {
        if complement.is_none() {
            complement = value(caps.name("compl"));
        }
        pos += caps.name("stop").map_or(0, |m| m.start());
    }
    if let Some(caps) = CADASTRAL_ASIDE_RE.captures(&text[pos..]) {
        pos += match caps.name("stop") {
            Some(stop) => stop.start(),
            None => caps.get(0).map_or(0, |m| m.end()),
        };
    }

    let mut postal_code = None;
    let mut commune = None;
    if let Some(caps) = LOCALITY_RE.captures(&text[pos..]) {
        postal_code = value(["cp", "cp2", "cp3"].iter().find_map(|n| caps.name(n)));
        commune = value(["commune", "commune2", "commune3"].iter().find_map(|n| caps.name(n)));
        pos += caps.get(0).map_or(0, |m| m.end());
    }

    let template = Address {
        complement,
        postal_code,
        commune,
        ..Address::default()
    };
    let addresses = if groups.is_empty() {
        if template.is_empty() {
            Vec::new()
        } else {
            vec![template]
        }
    } else {
        groups.iter().flat_map(|group| fan_out(group, &template)).collect()
    };

    Half {
        addresses,
        end: pos,
    }
}

/// One record per (number, indicator) of a street group.
fn fan_out(group: &StreetGroup, template: &Address) -> Vec<Address> {
    let with = |number: Option<&str>, indicator: Option<String>| Address {
        number: number.map(str::to_string),
        indicator,
        street: Some(group.street.clone()).filter(|s| !s.is_empty()),
        ..template.clone()
    };

    let Some(numbers) = group.numbers.as_deref() else {
        return vec![with(None, None)];
    };
    let mut addresses = Vec::new();
    for caps in NUMBER_ITEM_RE.captures_iter(numbers) {
        let Some(number) = caps.name("num").map(|m| m.as_str()) else {
            continue;
        };
        match caps.name("ind").map(|m| m.as_str()) {
            Some(list) if list.starts_with('(') => {
                for indicator in INDICATOR_ITEM_RE.find_iter(list) {
                    addresses.push(with(Some(number), Some(indicator_form(indicator.as_str()))));
                }
            }
            Some(indicator) => addresses.push(with(Some(number), Some(indicator_form(indicator)))),
            None => addresses.push(with(Some(number), None)),
        }
    }
    if addresses.is_empty() {
        addresses.push(with(None, None));
    }
    addresses
}

/// `bis`, `ter`... in lowercase, letters in uppercase.
fn indicator_form(indicator: &str) -> String {
    let indicator = indicator.trim();
    if indicator.len() == 1 {
        indicator.to_uppercase()
    } else {
        indicator.to_lowercase()
    }
}

fn value(m: Option<Match<'_>>) -> Option<String> {
    let text = collapse_whitespace(trim_value(m?.as_str()));
    (!text.is_empty()).then_some(text)
}
