#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Data types shared by every stage of the arrêté extraction pipeline.
//!
//! A document flows through the stages as:
//!
//! 1. [`Page`]s of plain text produced by the (external) PDF/OCR front-end,
//! 2. typed [`Span`]s emitted by the template stripper and the structural
//!    parser, threaded by a [`ParseState`],
//! 3. one [`PageRecord`] per page once entities are extracted,
//! 4. one [`DocumentRecord`] per source file after aggregation.
//!
//! Entity values ([`Address`], [`CadastralReference`], [`Party`]) and the
//! legal taxonomy ([`Classification`], [`Urgency`]) are explicit types
//! rather than free-form strings so that each stage can rely on their
//! shape.

pub mod address;
pub mod cadastre;
pub mod classification;
pub mod party;
pub mod record;
pub mod span;

pub use address::{Address, AddressZone};
pub use cadastre::{CadastralForm, CadastralReference};
pub use classification::{Classification, Urgency};
pub use party::{Party, PartyRole};
pub use record::{
    DocumentRecord, DocumentRow, PageRecord, PresenceField, PresencePages, QualityFlag,
    join_pages,
};
pub use span::{ParseState, Span, SpanKind};

/// One page of a source document, as produced by text extraction.
///
/// Pages are immutable once created and are consumed by the structural
/// parser in `page_number` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Identifier of the source document (usually the PDF file name).
    pub document_id: String,
    /// 1-based page number.
    pub page_number: u32,
    /// Page text, or `None` when text extraction failed.
    pub raw_text: Option<String>,
    /// Whether the page is outside corpus scope (annexes, diagnostics).
    pub exclude: bool,
}

impl Page {
    /// Creates a page with extracted text.
    #[must_use]
    pub fn new(document_id: impl Into<String>, page_number: u32, raw_text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            raw_text: Some(raw_text.into()),
            exclude: false,
        }
    }

    /// Creates a page whose text could not be extracted.
    #[must_use]
    pub fn without_text(document_id: impl Into<String>, page_number: u32) -> Self {
        Self {
            document_id: document_id.into(),
            page_number,
            raw_text: None,
            exclude: false,
        }
    }

    /// Returns the page text when it exists and the page is in scope.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        if self.exclude {
            return None;
        }
        self.raw_text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_page_has_no_text() {
        let mut page = Page::new("a.pdf", 1, "Vu le code");
        assert_eq!(page.text(), Some("Vu le code"));
        page.exclude = true;
        assert_eq!(page.text(), None);
    }

    #[test]
    fn page_without_text() {
        let page = Page::without_text("a.pdf", 2);
        assert!(page.text().is_none());
        assert_eq!(page.page_number, 2);
    }
}
