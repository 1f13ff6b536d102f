#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Reduces the page records of a document to one document record.
//!
//! Values come from the first page that has one, presence flags become
//! page-number lists, and the commune, INSEE code and cadastral keys are
//! reconciled through the gazetteers.

mod quality;
mod reconcile;

use arretes_document_models::{DocumentRecord, PageRecord, PresenceField};
use arretes_extract::ExtractedDocument;
use arretes_gazetteer::Gazetteers;
use arretes_parser::ParsedDocument;

pub use quality::quality_flags;
pub use reconcile::{backfill_address, cadastral_key, canonical_commune, resolve_insee};

/// Builds the document record of a parsed and extracted document.
#[must_use]
pub fn aggregate(
    parsed: &ParsedDocument,
    extracted: &ExtractedDocument,
    gazetteers: &Gazetteers,
) -> DocumentRecord {
    let pages = &extracted.pages;
    let id = &parsed.document_id;
    let mut warnings: Vec<String> = parsed
        .warnings
        .iter()
        .map(ToString::to_string)
        .chain(extracted.warnings.iter().map(ToString::to_string))
        .collect();

    let mut record = DocumentRecord {
        pdf: id.clone(),
        nb_pages: u32::try_from(parsed.pages.len()).unwrap_or(u32::MAX),
        arr_date: first(pages, |p| p.arr_date.as_ref()),
        num_arr: first(pages, |p| p.num_arr.as_ref()),
        nom_arr: first(pages, |p| p.nom_arr.as_ref()),
        commune_maire: first(pages, |p| p.commune_maire.as_ref())
            .map(|c| canonical_commune(&c, gazetteers)),
        par_ref_cad: first(pages, |p| p.par_ref_cad.as_ref()),
        proprio: first(pages, |p| p.proprio.as_ref()),
        syndic: first(pages, |p| p.syndic.as_ref()),
        gest: first(pages, |p| p.gest.as_ref()),
        demo: pages.iter().any(|p| p.demo),
        int_hab: pages.iter().any(|p| p.int_hab),
        parse_error: parsed.fatal.as_ref().map(ToString::to_string),
        ..DocumentRecord::default()
    };

    if let Some(page) = pages.iter().find(|p| p.classe.is_some()) {
        record.classe = page.classe;
        record.urgence = page.urgence;
    }
    if let Some(page) = pages.iter().find(|p| p.adr_ad_brute.is_some()) {
        record.adr_ad_brute.clone_from(&page.adr_ad_brute);
        record.addresses.clone_from(&page.addresses);
        record.adr_pair = page.adr_pair;
    }
    for page in pages {
        for reference in &page.cadastre {
            if !record.cadastre.contains(reference) {
                record.cadastre.push(reference.clone());
            }
        }
        for &field in PresenceField::all() {
            if field.of(page) {
                record.presence.push(field, page.page_num);
            }
        }
    }

    let (codeinsee, warning) =
        resolve_insee(record.commune_maire.as_deref(), &record.addresses, gazetteers);
    warnings.extend(warning);
    record.codeinsee = codeinsee;
    // The locality of a pair is left as written: which half it belongs to
    // is for review.
    if !record.adr_pair {
        for address in &mut record.addresses {
            backfill_address(address, record.codeinsee.as_deref(), gazetteers);
        }
    }
    for reference in &record.cadastre {
        let (key, warning) = cadastral_key(reference, record.codeinsee.as_deref());
        record.ref_cad.extend(key);
        warnings.extend(warning);
    }

    for warning in warnings.iter().skip(parsed.warnings.len() + extracted.warnings.len()) {
        log::warn!("[{id}] {warning}");
    }
    record.warnings = warnings;
    record.quality = quality_flags(&record);
    log::debug!(
        "[{id}] aggregated {} pages, {} quality flags",
        record.nb_pages,
        record.quality.len()
    );
    record
}

/// First value of a column over the pages, in page order.
fn first<'a>(
    pages: &'a [PageRecord],
    column: impl Fn(&'a PageRecord) -> Option<&'a String>,
) -> Option<String> {
    pages.iter().find_map(column).cloned()
}
