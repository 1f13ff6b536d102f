#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Page template stripping.
//!
//! Letterheads, footers and transmission stamps are located on the raw
//! page text, reported as [`Span`]s and blanked out of the body. Blanking
//! replaces every byte of a matched region (line breaks excepted) with an
//! ASCII space, so the body keeps the byte length of the raw text and
//! every offset computed on the body is valid on the raw text.

use arretes_document_models::{Span, SpanKind};
use arretes_patterns::templates::{
    ACCUSE_RECEPTION_RE, BORDEREAU_RE, FOOTER_RES, HEADER_RES, STAMP_RE,
};

/// Non-fatal conditions met while stripping a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateWarning {
    /// Two template regions of different kinds overlap; both were kept and
    /// their union blanked.
    Overlap {
        /// Kind of the earlier region.
        first: SpanKind,
        /// Kind of the later region.
        second: SpanKind,
        /// Start of the shared bytes.
        begin: usize,
        /// End of the shared bytes.
        end: usize,
    },
    /// More than one transmission stamp on the page.
    MultipleStamps(usize),
}

/// A page with its template regions located and blanked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedPage {
    /// Template spans, ordered by start offset. Offsets and text refer to
    /// the raw page.
    pub template_spans: Vec<Span>,
    /// Raw text with template regions blanked; same byte length.
    pub body: String,
    /// Non-fatal conditions.
    pub warnings: Vec<TemplateWarning>,
}

impl StrippedPage {
    /// Whether a transmission stamp was found.
    #[must_use]
    pub fn has_stamp(&self) -> bool {
        self.template_spans.iter().any(|s| s.kind == SpanKind::Stamp)
    }

    /// Whether nothing but template text remains.
    #[must_use]
    pub fn is_template_only(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Locates and blanks the template regions of a page.
///
/// Blanking can expose a new match (a page counter left alone on its line
/// once the stamp before it is gone), so the patterns are re-applied until
/// nothing matches. Stripping an already stripped body is a no-op.
#[must_use]
pub fn strip_page(raw: &str) -> StrippedPage {
    let mut body = raw.to_string();
    let mut template_spans = Vec::new();
    let mut warnings = Vec::new();

    loop {
        let found = find_template_spans(raw, &body, &mut warnings);
        if found.is_empty() {
            break;
        }
        body = blank(&body, found.iter().map(|s| (s.begin, s.end)));
        template_spans.extend(found);
    }
    template_spans.sort_by_key(|s| (s.begin, s.end));

    let stamps = template_spans
        .iter()
        .filter(|s| s.kind == SpanKind::Stamp)
        .count();
    if stamps > 1 {
        log::warn!("{stamps} transmission stamps on one page");
        warnings.push(TemplateWarning::MultipleStamps(stamps));
    }

    debug_assert_eq!(body.len(), raw.len());
    StrippedPage {
        template_spans,
        body,
        warnings,
    }
}

/// Matches every template pattern on `body`, dropping regions nested in a
/// region of the same kind and reporting overlaps between kinds.
fn find_template_spans(
    raw: &str,
    body: &str,
    warnings: &mut Vec<TemplateWarning>,
) -> Vec<Span> {
    let mut found: Vec<Span> = Vec::new();
    let patterns = HEADER_RES
        .iter()
        .map(|re| (SpanKind::Header, re))
        .chain(FOOTER_RES.iter().map(|re| (SpanKind::Footer, re)))
        .chain(std::iter::once((SpanKind::Stamp, &*STAMP_RE)));
    for (kind, re) in patterns {
        for m in re.find_iter(body) {
            if let Some(span) = Span::from_range(raw, m.start(), m.end(), kind) {
                found.push(span);
            }
        }
    }

    found.sort_by_key(|s| (s.begin, std::cmp::Reverse(s.end)));
    let mut kept: Vec<Span> = Vec::with_capacity(found.len());
    for span in found {
        if kept
            .iter()
            .any(|k| k.kind == span.kind && k.contains(&span))
        {
            continue;
        }
        if let Some(other) = kept.iter().rev().find(|k| k.overlaps(&span)) {
            log::debug!(
                "Template regions overlap: {} {}..{} and {} {}..{}",
                other.kind,
                other.begin,
                other.end,
                span.kind,
                span.begin,
                span.end
            );
            warnings.push(TemplateWarning::Overlap {
                first: other.kind,
                second: span.kind,
                begin: span.begin,
                end: other.end.min(span.end),
            });
        }
        kept.push(span);
    }
    kept
}

/// Replaces every byte inside `ranges` with a space, line breaks
/// excepted.
///
/// Ranges must fall on character boundaries; all bytes of a multi-byte
/// character are blanked together so the result stays valid UTF-8.
#[must_use]
pub fn blank(text: &str, ranges: impl IntoIterator<Item = (usize, usize)>) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for (begin, end) in ranges {
        let end = end.min(bytes.len());
        for byte in bytes.iter_mut().take(end).skip(begin) {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Whether the page is the e-filing acknowledgement page.
#[must_use]
pub fn is_accusedereception_page(raw: &str) -> bool {
    ACCUSE_RECEPTION_RE.is_match(raw)
}

/// Whether the page is a transmission slip.
#[must_use]
pub fn is_bordereau_page(raw: &str) -> bool {
    BORDEREAU_RE.is_match(raw)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: stripping preserves the byte length of the page.
        #[test]
        fn body_length_is_preserved(raw in "(?s).{0,400}") {
            let page = strip_page(&raw);
            prop_assert_eq!(page.body.len(), raw.len());
        }

        /// Property: stripping a stripped body changes nothing.
        #[test]
        fn stripping_is_idempotent(
            lines in prop::collection::vec(
                prop_oneof![
                    Just("RÉPUBLIQUE FRANÇAISE".to_string()),
                    Just("Page 2 / 3".to_string()),
                    Just("Vu le code civil".to_string()),
                    Just("Hôtel de Ville - 13233 MARSEILLE CEDEX 20".to_string()),
                    "[A-Za-z0-9 /:-]{0,40}",
                ],
                0..12,
            )
        ) {
            let raw = lines.join("\n");
            let once = strip_page(&raw);
            let twice = strip_page(&once.body);
            prop_assert_eq!(twice.body, once.body);
            prop_assert!(twice.template_spans.is_empty());
        }

        /// Property: only bytes inside template spans change.
        #[test]
        fn blanking_stays_inside_spans(raw in "(?s).{0,400}") {
            let page = strip_page(&raw);
            for (i, (a, b)) in raw.bytes().zip(page.body.bytes()).enumerate() {
                if a != b {
                    prop_assert!(page.template_spans.iter().any(|s| s.begin <= i && i < s.end));
                }
            }
        }
    }
}
