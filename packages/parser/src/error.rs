//! Fatal parse conditions and document-level warnings.

use arretes_document_models::{ParseState, SpanKind};
use arretes_template::TemplateWarning;
use thiserror::Error;

/// A condition that stops the structural parse of one document.
///
/// Spans collected before the failure are kept; the rest of the document
/// is only template-stripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("page {page}: no Vu or Considérant on the first page with content")]
    MissingVuConsiderant { page: u32 },
    #[error("page {page}: illegal paragraph transition {from} -> {to}")]
    IllegalTransition {
        from: SpanKind,
        to: SpanKind,
        page: u32,
    },
    #[error("page {page}: leading text cannot continue a {from} paragraph")]
    IllegalContinuation { from: SpanKind, page: u32 },
    #[error("page {page}: parse state cannot go back from {from} to {to}")]
    StateRegression {
        from: ParseState,
        to: ParseState,
        page: u32,
    },
    #[error("time budget of {budget_ms} ms exceeded before page {page}")]
    TimeBudgetExceeded { budget_ms: u128, page: u32 },
    #[error("parser invariant violated: {0}")]
    Invariant(String),
}

impl ParseError {
    /// Whether the document itself is malformed, as opposed to the engine
    /// breaking one of its own invariants.
    #[must_use]
    pub const fn is_malformed_document(&self) -> bool {
        !matches!(self, Self::Invariant(_))
    }

    /// Page the error was raised on, if any.
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        match self {
            Self::MissingVuConsiderant { page }
            | Self::IllegalTransition { page, .. }
            | Self::IllegalContinuation { page, .. }
            | Self::StateRegression { page, .. }
            | Self::TimeBudgetExceeded { page, .. } => Some(*page),
            Self::Invariant(_) => None,
        }
    }
}

/// A structurally expected element that was not found, or a template
/// anomaly. Parsing carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("page {page}: no mayoral authority in the preamble")]
    MissingAuthority { page: u32 },
    #[error("page {page}: no order number in the preamble")]
    MissingOrderNumber { page: u32 },
    #[error("page {page}: no order title in the preamble")]
    MissingTitle { page: u32 },
    #[error("no Arrête line")]
    MissingArrete,
    #[error("no signature date")]
    MissingSignature,
    #[error("page {page}: {first} and {second} template regions overlap")]
    TemplateOverlap {
        page: u32,
        first: SpanKind,
        second: SpanKind,
    },
    #[error("page {page}: {count} transmission stamps")]
    MultipleStamps { page: u32, count: usize },
}

impl ParseWarning {
    pub(crate) const fn from_template(page: u32, warning: &TemplateWarning) -> Self {
        match *warning {
            TemplateWarning::Overlap { first, second, .. } => Self::TemplateOverlap {
                page,
                first,
                second,
            },
            TemplateWarning::MultipleStamps(count) => Self::MultipleStamps { page, count },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_errors_are_not_document_errors() {
        assert!(ParseError::MissingVuConsiderant { page: 1 }.is_malformed_document());
        assert!(!ParseError::Invariant("span out of bounds".into()).is_malformed_document());
        assert_eq!(ParseError::Invariant(String::new()).page(), None);
    }

    #[test]
    fn messages_name_the_paragraph_kinds() {
        let error = ParseError::IllegalTransition {
            from: SpanKind::ParVu,
            to: SpanKind::ParArticle,
            page: 2,
        };
        assert_eq!(
            error.to_string(),
            "page 2: illegal paragraph transition par_vu -> par_article"
        );
    }

    #[test]
    fn template_warnings_carry_the_page() {
        let warning = ParseWarning::from_template(3, &TemplateWarning::MultipleStamps(2));
        assert_eq!(warning, ParseWarning::MultipleStamps { page: 3, count: 2 });
    }
}
