//! Per-page and per-document output records.
//!
//! Field names follow the column names of the tabular interchange format
//! shared with the surrounding pipeline stages; renaming a field here
//! breaks those stages.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{Address, AddressZone, CadastralReference, Classification, Party, PartyRole, Urgency};

/// Structural flags and extracted values for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PageRecord {
    pub pdf: String,
    pub page_num: u32,
    pub exclude: bool,
    pub has_stamp: bool,
    pub is_accusedereception_page: bool,
    pub has_vu: bool,
    pub has_considerant: bool,
    pub has_arrete: bool,
    pub has_article: bool,
    pub has_cgct: bool,
    pub has_cgct_art: bool,
    pub has_cch: bool,
    pub has_cch_l111: bool,
    pub has_cch_l511: bool,
    pub has_cch_l521: bool,
    pub has_cch_l541: bool,
    pub has_cch_r511: bool,
    pub has_cc: bool,
    pub commune_maire: Option<String>,
    pub num_arr: Option<String>,
    pub nom_arr: Option<String>,
    pub arr_date: Option<String>,
    pub adr_ad_brute: Option<String>,
    pub adr_num: Option<String>,
    pub adr_ind: Option<String>,
    pub adr_voie: Option<String>,
    pub adr_compl: Option<String>,
    pub adr_cpostal: Option<String>,
    pub adr_ville: Option<String>,
    pub adr_adresse: Option<String>,
    pub adr_pair: bool,
    pub par_ref_cad: Option<String>,
    pub cad_refs: Option<String>,
    pub proprio: Option<String>,
    pub syndic: Option<String>,
    pub gest: Option<String>,
    pub classe: Option<Classification>,
    pub urgence: Option<Urgency>,
    pub demo: bool,
    pub int_hab: bool,
    /// Every address decomposed from `adr_ad_brute`.
    #[serde(skip)]
    pub addresses: Vec<Address>,
    /// Every cadastral reference found on the page.
    #[serde(skip)]
    pub cadastre: Vec<CadastralReference>,
    /// Owner, syndic and manager, when found.
    #[serde(skip)]
    pub parties: Vec<Party>,
}

impl PageRecord {
    /// Creates an empty record for a page.
    #[must_use]
    pub fn new(pdf: impl Into<String>, page_num: u32) -> Self {
        Self {
            pdf: pdf.into(),
            page_num,
            ..Self::default()
        }
    }

    /// Stores a decomposed address zone and mirrors its first address into
    /// the flat `adr_*` columns.
    pub fn set_address_zone(&mut self, raw: &str, zone: AddressZone) {
        self.adr_ad_brute = Some(raw.to_string());
        self.adr_pair = zone.needs_review();
        self.addresses = zone.into_addresses();
        if let Some(first) = self.addresses.first() {
            self.adr_num.clone_from(&first.number);
            self.adr_ind.clone_from(&first.indicator);
            self.adr_voie.clone_from(&first.street);
            self.adr_compl.clone_from(&first.complement);
            self.adr_cpostal.clone_from(&first.postal_code);
            self.adr_ville.clone_from(&first.commune);
        }
        let normalized: Vec<String> = self.addresses.iter().filter_map(Address::normalized).collect();
        self.adr_adresse = (!normalized.is_empty()).then(|| normalized.join(" | "));
    }

    /// Stores a party and mirrors its name into the matching column.
    pub fn set_party(&mut self, party: Party) {
        let column = match party.role {
            PartyRole::Proprio => &mut self.proprio,
            PartyRole::Syndic => &mut self.syndic,
            PartyRole::Gest => &mut self.gest,
        };
        *column = Some(party.name.clone());
        self.parties.push(party);
    }

    /// Whether the page carries any extracted value or structural flag.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.has_vu
            || self.has_considerant
            || self.has_arrete
            || self.has_article
            || self.commune_maire.is_some()
            || self.nom_arr.is_some()
    }
}

/// Presence flags aggregated as page-number lists.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PresenceField {
    HasStamp,
    IsAccusedereceptionPage,
    HasVu,
    HasConsiderant,
    HasArrete,
    HasArticle,
    HasCgct,
    HasCchL511,
    HasCchL521,
    HasCchL541,
}

impl PresenceField {
    /// Every field, in output column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::HasStamp,
            Self::IsAccusedereceptionPage,
            Self::HasVu,
            Self::HasConsiderant,
            Self::HasArrete,
            Self::HasArticle,
            Self::HasCgct,
            Self::HasCchL511,
            Self::HasCchL521,
            Self::HasCchL541,
        ]
    }

    /// Reads the flag from a page record.
    #[must_use]
    pub const fn of(self, page: &PageRecord) -> bool {
        match self {
            Self::HasStamp => page.has_stamp,
            Self::IsAccusedereceptionPage => page.is_accusedereception_page,
            Self::HasVu => page.has_vu,
            Self::HasConsiderant => page.has_considerant,
            Self::HasArrete => page.has_arrete,
            Self::HasArticle => page.has_article,
            Self::HasCgct => page.has_cgct || page.has_cgct_art,
            Self::HasCchL511 => page.has_cch_l511,
            Self::HasCchL521 => page.has_cch_l521,
            Self::HasCchL541 => page.has_cch_l541,
        }
    }

    /// Whether a gap in the page list is suspicious for this field.
    ///
    /// Structural paragraphs run over consecutive pages; stamps and
    /// citations legitimately appear on scattered pages.
    #[must_use]
    pub const fn expects_contiguous(self) -> bool {
        matches!(
            self,
            Self::HasVu | Self::HasConsiderant | Self::HasArticle
        )
    }
}

/// Page numbers on which each presence flag was set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresencePages {
    pages: Vec<(PresenceField, Vec<u32>)>,
}

impl PresencePages {
    /// Records that `field` is present on `page`.
    pub fn push(&mut self, field: PresenceField, page: u32) {
        if let Some((_, pages)) = self.pages.iter_mut().find(|(f, _)| *f == field) {
            if !pages.contains(&page) {
                pages.push(page);
            }
        } else {
            self.pages.push((field, vec![page]));
        }
    }

    /// Page numbers for `field`, in insertion order.
    #[must_use]
    pub fn get(&self, field: PresenceField) -> &[u32] {
        self.pages
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(&[], |(_, pages)| pages.as_slice())
    }

    /// Whether the pages for `field` form one run without gaps.
    ///
    /// An empty list is not contiguous.
    #[must_use]
    pub fn is_contiguous(&self, field: PresenceField) -> bool {
        let pages = self.get(field);
        !pages.is_empty() && pages.windows(2).all(|w| w[1] == w[0] + 1)
    }
}

/// Comma-joined page list (`"1,2,3"`).
#[must_use]
pub fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Data-quality conditions surfaced in the review report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityFlag {
    MissingDate,
    MissingClassification,
    MissingInsee,
    /// INSEE code is the "whole Marseille" placeholder `13055`.
    InseeWholeMarseille,
    MissingCadastralParcel,
    MissingAddress,
    MissingStreetNumber,
    MissingPostalCode,
    MissingCommune,
    /// The address zone names two buildings.
    AddressPairNeedsReview,
    /// The structural parser stopped on a fatal condition.
    ParseFailed,
    /// A structural presence list is empty or has gaps.
    NonContiguousPages(PresenceField),
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDate => f.write_str("missing_date"),
            Self::MissingClassification => f.write_str("missing_classification"),
            Self::MissingInsee => f.write_str("missing_insee"),
            Self::InseeWholeMarseille => f.write_str("insee_whole_marseille"),
            Self::MissingCadastralParcel => f.write_str("missing_cadastral_parcel"),
            Self::MissingAddress => f.write_str("missing_address"),
            Self::MissingStreetNumber => f.write_str("missing_street_number"),
            Self::MissingPostalCode => f.write_str("missing_postal_code"),
            Self::MissingCommune => f.write_str("missing_commune"),
            Self::AddressPairNeedsReview => f.write_str("address_pair_needs_review"),
            Self::ParseFailed => f.write_str("parse_failed"),
            Self::NonContiguousPages(field) => write!(f, "non_contiguous_pages:{field}"),
        }
    }
}

/// One document after aggregation of its pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub pdf: String,
    pub nb_pages: u32,
    pub arr_date: Option<String>,
    pub num_arr: Option<String>,
    pub nom_arr: Option<String>,
    pub classe: Option<Classification>,
    pub urgence: Option<Urgency>,
    pub demo: bool,
    pub int_hab: bool,
    pub commune_maire: Option<String>,
    pub codeinsee: Option<String>,
    pub adr_ad_brute: Option<String>,
    pub addresses: Vec<Address>,
    pub adr_pair: bool,
    pub par_ref_cad: Option<String>,
    pub cadastre: Vec<CadastralReference>,
    /// Normalized cadastral keys, one per reference.
    pub ref_cad: Vec<String>,
    pub proprio: Option<String>,
    pub syndic: Option<String>,
    pub gest: Option<String>,
    pub presence: PresencePages,
    pub parse_error: Option<String>,
    pub warnings: Vec<String>,
    pub quality: Vec<QualityFlag>,
}

impl DocumentRecord {
    /// Flattens the record into one row per address.
    ///
    /// A record without address still yields one row.
    #[must_use]
    pub fn rows(&self) -> Vec<DocumentRow> {
        let empty = Address::default();
        let addresses: Vec<&Address> = if self.addresses.is_empty() {
            vec![&empty]
        } else {
            self.addresses.iter().collect()
        };
        addresses
            .into_iter()
            .map(|address| self.row(address))
            .collect()
    }

    fn row(&self, address: &Address) -> DocumentRow {
        let pages = |field| join_pages(self.presence.get(field));
        DocumentRow {
            pdf: self.pdf.clone(),
            nb_pages: self.nb_pages,
            arr_date: self.arr_date.clone(),
            num_arr: self.num_arr.clone(),
            nom_arr: self.nom_arr.clone(),
            classe: self.classe,
            urgence: self.urgence,
            demo: self.demo,
            int_hab: self.int_hab,
            commune_maire: self.commune_maire.clone(),
            codeinsee: self.codeinsee.clone(),
            adr_ad_brute: self.adr_ad_brute.clone(),
            adr_num: address.number.clone(),
            adr_ind: address.indicator.clone(),
            adr_voie: address.street.clone(),
            adr_compl: address.complement.clone(),
            adr_cpostal: address.postal_code.clone(),
            adr_ville: address.commune.clone(),
            adr_adresse: address.normalized(),
            adr_pair: self.adr_pair,
            par_ref_cad: self.par_ref_cad.clone(),
            ref_cad: self.ref_cad.join(","),
            proprio: self.proprio.clone(),
            syndic: self.syndic.clone(),
            gest: self.gest.clone(),
            has_stamp: pages(PresenceField::HasStamp),
            is_accusedereception_page: pages(PresenceField::IsAccusedereceptionPage),
            has_vu: pages(PresenceField::HasVu),
            has_considerant: pages(PresenceField::HasConsiderant),
            has_arrete: pages(PresenceField::HasArrete),
            has_article: pages(PresenceField::HasArticle),
            has_cgct: pages(PresenceField::HasCgct),
            has_cch_l511: pages(PresenceField::HasCchL511),
            has_cch_l521: pages(PresenceField::HasCchL521),
            has_cch_l541: pages(PresenceField::HasCchL541),
            parse_error: self.parse_error.clone(),
            warnings: self.warnings.join(" ; "),
        }
    }
}

/// Flat, CSV-serializable view of a [`DocumentRecord`] for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DocumentRow {
    pub pdf: String,
    pub nb_pages: u32,
    pub arr_date: Option<String>,
    pub num_arr: Option<String>,
    pub nom_arr: Option<String>,
    pub classe: Option<Classification>,
    pub urgence: Option<Urgency>,
    pub demo: bool,
    pub int_hab: bool,
    pub commune_maire: Option<String>,
    pub codeinsee: Option<String>,
    pub adr_ad_brute: Option<String>,
    pub adr_num: Option<String>,
    pub adr_ind: Option<String>,
    pub adr_voie: Option<String>,
    pub adr_compl: Option<String>,
    pub adr_cpostal: Option<String>,
    pub adr_ville: Option<String>,
    pub adr_adresse: Option<String>,
    pub adr_pair: bool,
    pub par_ref_cad: Option<String>,
    pub ref_cad: String,
    pub proprio: Option<String>,
    pub syndic: Option<String>,
    pub gest: Option<String>,
    pub has_stamp: String,
    pub is_accusedereception_page: String,
    pub has_vu: String,
    pub has_considerant: String,
    pub has_arrete: String,
    pub has_article: String,
    pub has_cgct: String,
    pub has_cch_l511: String,
    pub has_cch_l521: String,
    pub has_cch_l541: String,
    pub parse_error: Option<String>,
    pub warnings: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_pages_track_contiguity() {
        let mut presence = PresencePages::default();
        presence.push(PresenceField::HasVu, 1);
        presence.push(PresenceField::HasVu, 2);
        presence.push(PresenceField::HasVu, 2);
        presence.push(PresenceField::HasArticle, 2);
        presence.push(PresenceField::HasArticle, 4);
        assert_eq!(presence.get(PresenceField::HasVu), &[1, 2]);
        assert!(presence.is_contiguous(PresenceField::HasVu));
        assert!(!presence.is_contiguous(PresenceField::HasArticle));
        assert!(!presence.is_contiguous(PresenceField::HasConsiderant));
    }

    #[test]
    fn joins_page_lists() {
        assert_eq!(join_pages(&[1, 2, 3]), "1,2,3");
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn address_zone_fills_flat_columns() {
        let mut page = PageRecord::new("a.pdf", 1);
        let zone = AddressZone::Single(vec![
            Address {
                number: Some("10".to_string()),
                street: Some("rue X".to_string()),
                ..Address::default()
            },
            Address {
                number: Some("12".to_string()),
                street: Some("rue X".to_string()),
                ..Address::default()
            },
        ]);
        page.set_address_zone("10-12 rue X", zone);
        assert_eq!(page.adr_num.as_deref(), Some("10"));
        assert_eq!(page.adr_adresse.as_deref(), Some("10 rue X | 12 rue X"));
        assert!(!page.adr_pair);
        assert_eq!(page.addresses.len(), 2);
    }

    #[test]
    fn record_without_address_yields_one_row() {
        let record = DocumentRecord {
            pdf: "a.pdf".to_string(),
            ..DocumentRecord::default()
        };
        let rows = record.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].adr_voie, None);
    }

    #[test]
    fn quality_flag_display() {
        assert_eq!(QualityFlag::MissingDate.to_string(), "missing_date");
        assert_eq!(
            QualityFlag::NonContiguousPages(PresenceField::HasVu).to_string(),
            "non_contiguous_pages:has_vu"
        );
    }
}
