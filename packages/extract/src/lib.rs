#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Entity extraction over parsed building-safety orders.
//!
//! Every extractor is a pure function of its input text and the
//! [`Gazetteers`] passed in; [`extract_document`] runs them over each
//! page the parser walked and builds the per-page records.

pub mod address;
pub mod cadastre;
pub mod classification;
pub mod page;
pub mod parties;

use arretes_document_models::{PageRecord, PartyRole};
use arretes_gazetteer::Gazetteers;
use arretes_parser::ParsedDocument;
use thiserror::Error;

pub use address::{decompose_address, parse_address_zone};
pub use cadastre::{find_cadastral_references, normalize_cadastral, parse_cadastral};
pub use classification::classify;
pub use page::page_record;
pub use parties::{extract_manager, extract_owner, extract_syndic};

/// A value that could only be partly extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractWarning {
    #[error("page {page}: address zone {zone:?} yields no address field")]
    EmptyAddress { page: u32, zone: String },
    #[error("page {page}: {count} candidates for {role}, first one kept")]
    MultipleParties {
        page: u32,
        role: PartyRole,
        count: usize,
    },
    #[error("no classification matched")]
    MissingClassification,
}

/// Page records of a parsed document, with the warnings raised while
/// building them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub pages: Vec<PageRecord>,
    pub warnings: Vec<ExtractWarning>,
}

/// Builds the record of every page of `document`.
#[must_use]
pub fn extract_document(document: &ParsedDocument, gazetteers: &Gazetteers) -> ExtractedDocument {
    let mut pages = Vec::with_capacity(document.pages.len());
    let mut warnings = Vec::new();
    for page in &document.pages {
        let (record, page_warnings) = page_record(&document.document_id, page, gazetteers);
        pages.push(record);
        warnings.extend(page_warnings);
    }
    if pages.iter().all(|p| p.classe.is_none()) {
        log::warn!("[{}] no classification matched", document.document_id);
        warnings.push(ExtractWarning::MissingClassification);
    }
    ExtractedDocument { pages, warnings }
}

#[cfg(test)]
mod tests {
    use arretes_document_models::Page;
    use arretes_parser::{ParseOptions, parse_document};

    use super::*;

    #[test]
    fn one_record_per_page() {
        let pages = [
            Page::new("b.pdf", 1, "Le Maire de Cassis,\nVu le code civil,\nConsidérant le péril,\n"),
            Page::without_text("b.pdf", 2),
            Page::new("b.pdf", 3, "ARRÊTE\nArticle 1er : démolition du mur.\nFait à Cassis, le 3 juin 2019\n"),
        ];
        let parsed = parse_document(&pages, &ParseOptions::default());
        let extracted = extract_document(&parsed, &Gazetteers::bundled().unwrap());
        let numbers: Vec<u32> = extracted.pages.iter().map(|p| p.page_num).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(extracted.pages[2].demo);
        assert_eq!(extracted.pages[2].arr_date.as_deref(), Some("03/06/2019"));
        assert!(!extracted.warnings.contains(&ExtractWarning::MissingClassification));
    }

    #[test]
    fn unclassified_document_is_reported() {
        let pages = [Page::new("c.pdf", 1, "Le Maire de Cassis,\nVu le code civil,\n")];
        let parsed = parse_document(&pages, &ParseOptions::default());
        let extracted = extract_document(&parsed, &Gazetteers::bundled().unwrap());
        assert_eq!(extracted.warnings, vec![ExtractWarning::MissingClassification]);
    }
}
