#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Structural parser for building-safety orders.
//!
//! A document is walked page by page through the states
//! `avant_vucons → avant_articles → avant_signature → apres_signature`.
//! The preamble yields the authority, order number and title; the body is
//! cut into `Vu`, `Considérant`, `Arrête` and `Article` paragraphs whose
//! sequence is checked against a table of legal transitions; text at the
//! top of a page continues the last paragraph of the previous page as a
//! `_suite` span; the signature line closes the order.
//!
//! A malformed document stops being parsed at the first fatal condition
//! but keeps everything found before it, so one bad document never costs
//! more than itself.

mod error;
pub mod paragraphs;
mod preamble;

use std::{
    ops::Range,
    time::{Duration, Instant},
};

use arretes_document_models::{Page, ParseState, Span, SpanKind};
use arretes_template::{is_accusedereception_page, is_bordereau_page, strip_page};
use serde::Serialize;

pub use error::{ParseError, ParseWarning};
use paragraphs::{Marker, find_citations, find_markers, find_signature, first_vu_or_considerant};

/// Default per-document time budget.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(10);

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Wall-clock budget for one document, checked between pages. `None`
    /// disables the check.
    pub time_budget: Option<Duration>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            time_budget: Some(DEFAULT_TIME_BUDGET),
        }
    }
}

/// Why a page produced no content spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSkip {
    /// Text extraction failed.
    NoText,
    /// Page flagged out of scope.
    Excluded,
    /// E-filing acknowledgement page.
    AccuseReception,
    /// Divider slip or nothing but template text.
    TemplateOnly,
    /// After the signature, or after a fatal error.
    NotParsed,
}

/// One page after template stripping and structural parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPage {
    pub page_number: u32,
    /// Header, footer and stamp spans.
    pub template_spans: Vec<Span>,
    /// Page text with template regions blanked; empty when there is no
    /// text.
    pub body: String,
    /// Structural spans and the values nested in them, ordered by start
    /// offset, containers before their contents.
    pub content_spans: Vec<Span>,
    /// Byte range of the preamble, on the page where it ends.
    pub preamble: Option<Range<usize>>,
    pub skip: Option<PageSkip>,
}

impl ParsedPage {
    fn empty(page_number: u32, skip: PageSkip) -> Self {
        Self {
            page_number,
            template_spans: Vec::new(),
            body: String::new(),
            content_spans: Vec::new(),
            preamble: None,
            skip: Some(skip),
        }
    }

    /// Whether a transmission stamp was stripped from this page.
    #[must_use]
    pub fn has_stamp(&self) -> bool {
        self.template_spans.iter().any(|s| s.kind == SpanKind::Stamp)
    }

    #[must_use]
    pub fn is_accusedereception_page(&self) -> bool {
        self.skip == Some(PageSkip::AccuseReception)
    }

    /// Content spans of one kind.
    pub fn spans(&self, kind: SpanKind) -> impl Iterator<Item = &Span> {
        self.content_spans.iter().filter(move |s| s.kind == kind)
    }

    /// Whether any content span has this kind.
    #[must_use]
    pub fn has(&self, kind: SpanKind) -> bool {
        self.spans(kind).next().is_some()
    }
}

/// A whole document after structural parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub document_id: String,
    /// Pages in page-number order.
    pub pages: Vec<ParsedPage>,
    /// State reached at the end of the walk.
    pub state: ParseState,
    /// Condition that stopped the walk early.
    pub fatal: Option<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedDocument {
    /// Whether the walk went through without a fatal condition.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.fatal.is_none()
    }
}

/// Parses a document, keeping whatever was found before a fatal
/// condition.
#[must_use]
pub fn parse_document(pages: &[Page], options: &ParseOptions) -> ParsedDocument {
    let mut ordered: Vec<&Page> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page_number);
    let document_id = ordered
        .first()
        .map(|p| p.document_id.clone())
        .unwrap_or_default();

    let mut walker = Walker::new(&document_id);
    let started = Instant::now();
    let mut parsed_pages = Vec::with_capacity(ordered.len());
    for page in ordered {
        if let Some(budget) = options
            .time_budget
            .filter(|budget| walker.fatal.is_none() && started.elapsed() >= *budget)
        {
            walker.fail(ParseError::TimeBudgetExceeded {
                budget_ms: budget.as_millis(),
                page: page.page_number,
            });
        }
        parsed_pages.push(walker.page(page));
    }
    walker.finish(parsed_pages)
}

/// Parses a document, failing on the first fatal condition.
///
/// # Errors
///
/// * If the document is malformed or the engine breaks an invariant, see
///   [`ParseError`].
pub fn try_parse_document(
    pages: &[Page],
    options: &ParseOptions,
) -> Result<ParsedDocument, ParseError> {
    let mut document = parse_document(pages, options);
    match document.fatal.take() {
        Some(error) => Err(error),
        None => Ok(document),
    }
}

/// Spans and preamble range collected on one page.
#[derive(Default)]
struct PageContent {
    spans: Vec<Span>,
    preamble: Option<Range<usize>>,
}

/// State threaded across the pages of one document.
struct Walker<'a> {
    document_id: &'a str,
    state: ParseState,
    last_paragraph: Option<SpanKind>,
    fatal: Option<ParseError>,
    warnings: Vec<ParseWarning>,
}

impl<'a> Walker<'a> {
    const fn new(document_id: &'a str) -> Self {
        Self {
            document_id,
            state: ParseState::AvantVucons,
            last_paragraph: None,
            fatal: None,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: ParseWarning) {
        log::warn!("[{}] {warning}", self.document_id);
        self.warnings.push(warning);
    }

    fn fail(&mut self, error: ParseError) {
        log::warn!("[{}] parse stopped: {error}", self.document_id);
        self.fatal = Some(error);
    }

    fn page(&mut self, page: &Page) -> ParsedPage {
        let number = page.page_number;
        if page.exclude {
            return ParsedPage::empty(number, PageSkip::Excluded);
        }
        let Some(raw) = page.raw_text.as_deref() else {
            log::debug!("[{}] page {number} has no text", self.document_id);
            return ParsedPage::empty(number, PageSkip::NoText);
        };

        let stripped = strip_page(raw);
        for warning in &stripped.warnings {
            self.warn(ParseWarning::from_template(number, warning));
        }
        let template_only = stripped.is_template_only();
        let mut parsed = ParsedPage {
            page_number: number,
            template_spans: stripped.template_spans,
            body: stripped.body,
            content_spans: Vec::new(),
            preamble: None,
            skip: None,
        };

        if is_accusedereception_page(raw) {
            parsed.skip = Some(PageSkip::AccuseReception);
        } else if is_bordereau_page(raw) || template_only {
            parsed.skip = Some(PageSkip::TemplateOnly);
        } else if self.fatal.is_some() || self.state == ParseState::ApresSignature {
            parsed.skip = Some(PageSkip::NotParsed);
        } else {
            let mut content = PageContent::default();
            if let Err(error) = self.parse_body(number, &parsed.body, &mut content) {
                self.fail(error);
            }
            content
                .spans
                .sort_by_key(|s| (s.begin, std::cmp::Reverse(s.end), !s.kind.is_paragraph()));
            parsed.content_spans = content.spans;
            parsed.preamble = content.preamble;
        }
        log::trace!(
            "[{}] page {number}: {} content spans, state {}",
            self.document_id,
            parsed.content_spans.len(),
            self.state
        );
        parsed
    }

    fn parse_body(
        &mut self,
        page: u32,
        body: &str,
        out: &mut PageContent,
    ) -> Result<(), ParseError> {
        let mut pos = 0;
        if self.state == ParseState::AvantVucons {
            let first = first_vu_or_considerant(body);
            let (spans, warnings) = preamble::extract_preamble(body, first.unwrap_or(body.len()), page);
            out.spans.extend(spans);
            for warning in warnings {
                self.warn(warning);
            }
            let Some(first) = first else {
                return Err(ParseError::MissingVuConsiderant { page });
            };
            out.preamble = Some(0..first);
            pos = first;
        }

        let markers = find_markers(body, pos);
        let first_marker = markers.first().map_or(body.len(), |m| m.start);
        if body[pos..first_marker].chars().any(|c| !c.is_whitespace()) {
            let from = self.last_paragraph.ok_or_else(|| {
                ParseError::Invariant(format!("page {page}: text to continue but no paragraph yet"))
            })?;
            let kind = from
                .continuation()
                .ok_or(ParseError::IllegalContinuation { from, page })?;
            self.paragraph(page, body, pos, first_marker, kind, out)?;
        }

        for (i, &Marker { kind, start }) in markers.iter().enumerate() {
            if self.state == ParseState::ApresSignature {
                break;
            }
            if !paragraphs::is_legal_transition(self.last_paragraph, kind) {
                return Err(ParseError::IllegalTransition {
                    from: self.last_paragraph.unwrap_or(SpanKind::ParAutorite),
                    to: kind,
                    page,
                });
            }
            let next = match kind {
                SpanKind::ParArrete | SpanKind::ParArticle => ParseState::AvantSignature,
                _ => ParseState::AvantArticles,
            };
            self.advance(next, page)?;
            let end = markers.get(i + 1).map_or(body.len(), |m| m.start);
            self.paragraph(page, body, start, end, kind, out)?;
        }
        Ok(())
    }

    /// Emits one paragraph over `body[begin..end]`, cut short by a
    /// signature line when the paragraph is an article.
    fn paragraph(
        &mut self,
        page: u32,
        body: &str,
        begin: usize,
        end: usize,
        kind: SpanKind,
        out: &mut PageContent,
    ) -> Result<(), ParseError> {
        let signature = if kind.base() == SpanKind::ParArticle {
            find_signature(body, begin, end)
        } else {
            None
        };
        let end = signature.as_ref().map_or(end, |s| s.start);

        if let Some(span) = Span::trimmed(body, begin, end, kind) {
            if body.get(span.begin..span.end) != Some(span.text.as_str()) {
                return Err(ParseError::Invariant(format!(
                    "page {page}: {kind} span {}..{} does not match the body",
                    span.begin, span.end
                )));
            }
            out.spans.extend(find_citations(body, &span));
            out.spans.push(span);
            self.last_paragraph = Some(kind);
        }
        if let Some(signature) = signature {
            out.spans.extend(signature.spans);
            self.advance(ParseState::ApresSignature, page)?;
        }
        Ok(())
    }

    fn advance(&mut self, next: ParseState, page: u32) -> Result<(), ParseError> {
        if !self.state.can_advance_to(next) {
            return Err(ParseError::StateRegression {
                from: self.state,
                to: next,
                page,
            });
        }
        if next != self.state {
            log::debug!("[{}] page {page}: {} -> {next}", self.document_id, self.state);
        }
        self.state = next;
        Ok(())
    }

    fn finish(mut self, pages: Vec<ParsedPage>) -> ParsedDocument {
        if self.fatal.is_none() {
            match self.state {
                ParseState::AvantArticles => self.warn(ParseWarning::MissingArrete),
                ParseState::AvantSignature => self.warn(ParseWarning::MissingSignature),
                ParseState::AvantVucons | ParseState::ApresSignature => {}
            }
        }
        ParsedDocument {
            document_id: self.document_id.to_string(),
            pages,
            state: self.state,
            fatal: self.fatal,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(pages: &[&str]) -> Vec<Page> {
        pages
            .iter()
            .zip(1..)
            .map(|(text, number)| Page::new("test.pdf", number, *text))
            .collect()
    }

    fn kinds(page: &ParsedPage) -> Vec<SpanKind> {
        page.content_spans
            .iter()
            .filter(|s| s.kind.is_paragraph())
            .map(|s| s.kind)
            .collect()
    }

    #[test]
    fn preamble_ends_at_first_vu() {
        let text = "Nous, Maire de Gémenos,\nVu le code général des collectivités territoriales,\n";
        let parsed = parse_document(&document(&[text]), &ParseOptions::default());
        let page = &parsed.pages[0];
        let vu = text.find("Vu").unwrap();
        assert_eq!(page.preamble, Some(0..vu));
        let commune = page.spans(SpanKind::AdrVille).next().unwrap();
        assert_eq!(commune.text, "Gémenos");
        let paragraph = page.spans(SpanKind::ParVu).next().unwrap();
        assert_eq!(paragraph.begin, vu);
        assert_eq!(parsed.state, ParseState::AvantArticles);
        assert!(parsed.is_ok());
        assert!(parsed.warnings.contains(&ParseWarning::MissingArrete));
    }

    #[test]
    fn article_after_vu_across_pages_is_fatal() {
        let pages = document(&[
            "Le Maire de Cassis,\nVu le code civil,\n",
            "Article 1er : l'immeuble est interdit.\n",
        ]);
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert_eq!(
            parsed.fatal,
            Some(ParseError::IllegalTransition {
                from: SpanKind::ParVu,
                to: SpanKind::ParArticle,
                page: 2,
            })
        );
        assert!(parsed.pages[0].has(SpanKind::ParVu));
        assert!(try_parse_document(&pages, &ParseOptions::default()).is_err());
    }

    #[test]
    fn missing_vu_on_first_content_page_is_fatal() {
        let pages = vec![
            Page::without_text("test.pdf", 1),
            Page::new("test.pdf", 2, "Le Maire de Cassis\nObjet : péril\n"),
            Page::new("test.pdf", 3, "Vu le code civil"),
        ];
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert_eq!(parsed.fatal, Some(ParseError::MissingVuConsiderant { page: 2 }));
        assert_eq!(parsed.pages[0].skip, Some(PageSkip::NoText));
        assert_eq!(parsed.pages[2].skip, Some(PageSkip::NotParsed));
        assert!(parsed.pages[1].has(SpanKind::AdrVille));
    }

    #[test]
    fn leading_text_continues_previous_paragraph() {
        let pages = document(&[
            "Le Maire de Cassis,\nVu le code de la construction et de l'habitation,\nConsidérant que l'immeuble",
            "menace ruine,\nARRÊTE\nArticle 1er : évacuation.\n",
            "du bâtiment.\nArticle 2 : exécution.\nFait à Cassis, le 3 juin 2019\n",
        ]);
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert!(parsed.is_ok(), "{:?}", parsed.fatal);
        assert_eq!(
            kinds(&parsed.pages[1]),
            vec![SpanKind::ParConsiderantSuite, SpanKind::ParArrete, SpanKind::ParArticle]
        );
        assert_eq!(
            kinds(&parsed.pages[2]),
            vec![SpanKind::ParArticleSuite, SpanKind::ParArticle, SpanKind::ParSignDate]
        );
        assert_eq!(parsed.state, ParseState::ApresSignature);
        let date = parsed.pages[2].spans(SpanKind::ArrDate).next().unwrap();
        assert_eq!(date.text, "3 juin 2019");
    }

    #[test]
    fn continuation_of_arrete_line_is_fatal() {
        let pages = document(&[
            "Le Maire de Cassis,\nVu le code civil,\nARRÊTE\n",
            "texte libre\nArticle 1er : x\n",
        ]);
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert_eq!(
            parsed.fatal,
            Some(ParseError::IllegalContinuation {
                from: SpanKind::ParArrete,
                page: 2,
            })
        );
    }

    #[test]
    fn header_only_page_is_skipped() {
        let pages = vec![
            Page::new("test.pdf", 1, "Le Maire de Cassis,\nVu le code civil,\n"),
            Page::new("test.pdf", 2, "RÉPUBLIQUE FRANÇAISE\n\n2/3\n"),
            Page::new("test.pdf", 3, "ARRÊTE\nArticle 1 : x\n"),
        ];
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert!(parsed.is_ok(), "{:?}", parsed.fatal);
        assert_eq!(parsed.pages[1].skip, Some(PageSkip::TemplateOnly));
        assert!(parsed.pages[1].content_spans.is_empty());
        assert_eq!(
            kinds(&parsed.pages[2]),
            vec![SpanKind::ParArrete, SpanKind::ParArticle]
        );
    }

    #[test]
    fn skipped_pages_keep_the_state() {
        let pages = vec![
            Page::new("test.pdf", 1, "Le Maire de Cassis,\nVu le code civil,\n"),
            Page::new(
                "test.pdf",
                2,
                "Accusé de réception d'un acte en préfecture\nObjet de l'acte : péril",
            ),
            Page::new("test.pdf", 3, "BORDEREAU DE FORMALITÉS\n"),
            Page::new("test.pdf", 4, "et le code rural,\nARRÊTE\nArticle 1 : x\n"),
        ];
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert!(parsed.is_ok(), "{:?}", parsed.fatal);
        assert!(parsed.pages[1].is_accusedereception_page());
        assert_eq!(parsed.pages[2].skip, Some(PageSkip::TemplateOnly));
        assert_eq!(
            kinds(&parsed.pages[3]),
            vec![SpanKind::ParVuSuite, SpanKind::ParArrete, SpanKind::ParArticle]
        );
        assert!(parsed.warnings.contains(&ParseWarning::MissingSignature));
    }

    #[test]
    fn text_after_signature_is_not_parsed() {
        let text = "Le Maire de Cassis,\nVu le code civil,\nARRÊTE\nArticle 1 : x\nFait à Cassis, le 3 juin 2019\nANNEXE\nArticle 1 : copie\n";
        let parsed = parse_document(&document(&[text, "Vu la copie\n"]), &ParseOptions::default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.pages[0].spans(SpanKind::ParArticle).count(), 1);
        assert_eq!(parsed.pages[1].skip, Some(PageSkip::NotParsed));
    }

    #[test]
    fn zero_budget_stops_the_document() {
        let pages = document(&["Le Maire de Cassis,\nVu le code civil,\n"]);
        let options = ParseOptions {
            time_budget: Some(Duration::ZERO),
        };
        let parsed = parse_document(&pages, &options);
        assert_eq!(
            parsed.fatal,
            Some(ParseError::TimeBudgetExceeded {
                budget_ms: 0,
                page: 1,
            })
        );
        assert_eq!(parsed.pages[0].skip, Some(PageSkip::NotParsed));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn pages_are_walked_in_page_order() {
        let mut pages = document(&["Le Maire de Cassis,\nVu le code civil,\n", "ARRÊTE\n"]);
        pages.reverse();
        let parsed = parse_document(&pages, &ParseOptions::default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.pages[0].page_number, 1);
        assert_eq!(parsed.state, ParseState::AvantSignature);
    }
}
