//! Paragraph markers, the legal transitions between them, and the spans
//! nested inside paragraphs (citations, signature date).

use arretes_document_models::{Span, SpanKind};
use arretes_patterns::{
    codes::CITATION_RES,
    dates::date_from_captures,
    structure::{ARRETE_RE, ARTICLE_RE, CONSIDERANT_RE, SIGN_DATE_RE, VU_RE},
};

/// A paragraph opener found in a page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: SpanKind,
    pub start: usize,
}

/// Every paragraph opener starting at or after `from`, in offset order.
#[must_use]
pub fn find_markers(body: &str, from: usize) -> Vec<Marker> {
    let openers = [
        (SpanKind::ParVu, &*VU_RE),
        (SpanKind::ParConsiderant, &*CONSIDERANT_RE),
        (SpanKind::ParArrete, &*ARRETE_RE),
        (SpanKind::ParArticle, &*ARTICLE_RE),
    ];
    let mut markers: Vec<Marker> = openers
        .into_iter()
        .flat_map(|(kind, re)| {
            re.find_iter(body)
                .filter(move |m| m.start() >= from)
                .map(move |m| Marker {
                    kind,
                    start: m.start(),
                })
        })
        .collect();
    markers.sort_by_key(|m| m.start);
    markers.dedup_by_key(|m| m.start);
    markers
}

/// Offset of the first `Vu` or `Considérant` opener.
#[must_use]
pub fn first_vu_or_considerant(body: &str) -> Option<usize> {
    [&*VU_RE, &*CONSIDERANT_RE]
        .into_iter()
        .filter_map(|re| re.find(body).map(|m| m.start()))
        .min()
}

/// Whether paragraph `to` may directly follow paragraph `from`.
///
/// `None` stands for the start of the document body. Continuations are
/// compared by their base kind.
#[must_use]
pub fn is_legal_transition(from: Option<SpanKind>, to: SpanKind) -> bool {
    use SpanKind::{ParArrete, ParArticle, ParConsiderant, ParVu};

    let Some(from) = from else {
        return matches!(to.base(), ParVu | ParConsiderant);
    };
    matches!(
        (from.base(), to.base()),
        (ParVu | ParConsiderant, ParVu | ParConsiderant | ParArrete)
            | (ParArrete | ParArticle, ParArticle)
    )
}

/// Regulatory-code citations inside a paragraph.
#[must_use]
pub fn find_citations(body: &str, paragraph: &Span) -> Vec<Span> {
    let Some(text) = body.get(paragraph.begin..paragraph.end) else {
        return Vec::new();
    };
    CITATION_RES
        .iter()
        .flat_map(|(kind, re)| {
            re.find_iter(text).filter_map(move |m| {
                Span::from_range(
                    body,
                    paragraph.begin + m.start(),
                    paragraph.begin + m.end(),
                    *kind,
                )
            })
        })
        .collect()
}

/// A signature line with its nested values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Offset where the signature line starts; the paragraph before it
    /// ends here.
    pub start: usize,
    /// `par_sign_date`, then the nested `adr_ville` and `arr_date` when
    /// present.
    pub spans: Vec<Span>,
}

/// First signature line starting in `body[begin..end]`.
#[must_use]
pub fn find_signature(body: &str, begin: usize, end: usize) -> Option<Signature> {
    let caps = SIGN_DATE_RE.captures_at(body, begin)?;
    let whole = caps.get(0)?;
    if whole.start() >= end {
        return None;
    }
    let line = Span::trimmed(body, whole.start(), whole.end(), SpanKind::ParSignDate)?;
    let start = line.begin;
    let mut spans = vec![line];

    if let Some(commune) = caps.name("commune").or_else(|| caps.name("commune2")) {
        spans.extend(Span::from_range(
            body,
            commune.start(),
            commune.end(),
            SpanKind::AdrVille,
        ));
    }
    if date_from_captures(&caps).is_some() {
        let date_start = caps.name("day").or_else(|| caps.name("nday"));
        let date_end = caps.name("year").or_else(|| caps.name("nyear"));
        if let (Some(first), Some(last)) = (date_start, date_end) {
            spans.extend(Span::from_range(
                body,
                first.start(),
                last.end(),
                SpanKind::ArrDate,
            ));
        }
    }
    Some(Signature { start, spans })
}
