//! Typed text spans and the structural parse state.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Closed taxonomy of span kinds.
///
/// Template kinds come from the page template stripper, `par_*` kinds are
/// structural paragraphs emitted by the document parser, and the remaining
/// kinds are values nested inside a paragraph (commune, order number, date,
/// regulatory citations).
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
pub enum SpanKind {
    /// Page header (letterhead, administrative banner).
    Header,
    /// Page footer (page numbering, postal address of the town hall).
    Footer,
    /// @ctes transmission stamp.
    Stamp,
    /// Authority mention (`Nous, Maire de ...`).
    ParAutorite,
    /// Commune named by the authority mention.
    AdrVille,
    /// Line carrying the order number.
    ParNumArr,
    /// Order number value.
    NumArr,
    /// Line or block carrying the order title.
    ParNomArr,
    /// Order title value.
    NomArr,
    /// `Vu` paragraph.
    ParVu,
    /// Continuation of a `Vu` paragraph on a later page.
    ParVuSuite,
    /// `Considérant` paragraph.
    ParConsiderant,
    /// Continuation of a `Considérant` paragraph on a later page.
    ParConsiderantSuite,
    /// `Arrête` / `Arrêtons` marker.
    ParArrete,
    /// `Article` paragraph.
    ParArticle,
    /// Continuation of an `Article` paragraph on a later page.
    ParArticleSuite,
    /// Signature line (`Fait à ..., le ...`).
    ParSignDate,
    /// Signature date value.
    ArrDate,
    /// Code général des collectivités territoriales, generic mention.
    Cgct,
    /// CGCT article on the mayor's police powers (L2212-2, L2212-4, L2213-24).
    CgctArt,
    /// Code de la construction et de l'habitation, generic mention.
    Cch,
    /// CCH L111-6-1.
    CchL111,
    /// CCH L511-x (police of building safety).
    CchL511,
    /// CCH L521-x (occupants' rights).
    CchL521,
    /// CCH L541-2 (joint and several liability).
    CchL541,
    /// CCH R511-x.
    CchR511,
    /// Code civil.
    Cc,
}

impl SpanKind {
    /// Whether this kind is produced by the template stripper.
    #[must_use]
    pub const fn is_template(self) -> bool {
        matches!(self, Self::Header | Self::Footer | Self::Stamp)
    }

    /// Whether this kind is a structural paragraph (`par_*`).
    ///
    /// Paragraph spans of one page never overlap each other.
    #[must_use]
    pub const fn is_paragraph(self) -> bool {
        matches!(
            self,
            Self::ParAutorite
                | Self::ParNumArr
                | Self::ParNomArr
                | Self::ParVu
                | Self::ParVuSuite
                | Self::ParConsiderant
                | Self::ParConsiderantSuite
                | Self::ParArrete
                | Self::ParArticle
                | Self::ParArticleSuite
                | Self::ParSignDate
        )
    }

    /// Kind of the span that continues this paragraph on the next page.
    ///
    /// Only `Vu`, `Considérant` and `Article` paragraphs (and their own
    /// continuations) can straddle a page break.
    #[must_use]
    pub const fn continuation(self) -> Option<Self> {
        match self {
            Self::ParVu | Self::ParVuSuite => Some(Self::ParVuSuite),
            Self::ParConsiderant | Self::ParConsiderantSuite => Some(Self::ParConsiderantSuite),
            Self::ParArticle | Self::ParArticleSuite => Some(Self::ParArticleSuite),
            _ => None,
        }
    }

    /// Paragraph kind with any `_suite` suffix removed.
    #[must_use]
    pub const fn base(self) -> Self {
        match self {
            Self::ParVuSuite => Self::ParVu,
            Self::ParConsiderantSuite => Self::ParConsiderant,
            Self::ParArticleSuite => Self::ParArticle,
            other => other,
        }
    }
}

/// A half-open byte range of a page body, tagged with its kind.
///
/// Offsets are relative to the original page text; template stripping
/// blanks characters out instead of removing them so offsets stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive).
    pub begin: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// `body[begin..end]`.
    pub text: String,
    /// Kind of the span.
    pub kind: SpanKind,
}

impl Span {
    /// Builds a span over `body[begin..end]`.
    ///
    /// Returns `None` if the range is empty, out of bounds, or does not
    /// fall on character boundaries.
    #[must_use]
    pub fn from_range(body: &str, begin: usize, end: usize, kind: SpanKind) -> Option<Self> {
        if begin >= end {
            return None;
        }
        let text = body.get(begin..end)?;
        Some(Self {
            begin,
            end,
            text: text.to_string(),
            kind,
        })
    }

    /// Builds a span over `body[begin..end]` with surrounding whitespace
    /// trimmed off both ends.
    #[must_use]
    pub fn trimmed(body: &str, begin: usize, end: usize, kind: SpanKind) -> Option<Self> {
        let text = body.get(begin..end)?;
        let lead = text.len() - text.trim_start().len();
        let trail = text.len() - text.trim_end().len();
        if lead + trail >= text.len() {
            return None;
        }
        Self::from_range(body, begin + lead, end - trail, kind)
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// Whether both spans share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Whether `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }
}

/// State threaded across the pages of one document by the structural
/// parser.
///
/// The ordering of the variants is the only legal direction of travel.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum ParseState {
    /// Preamble: before the first `Vu` or `Considérant`.
    #[default]
    AvantVucons,
    /// Collecting `Vu` / `Considérant` paragraphs.
    AvantArticles,
    /// Collecting `Article` paragraphs.
    AvantSignature,
    /// After the signature date; the remaining text is not parsed.
    ApresSignature,
}

impl ParseState {
    /// Whether moving from `self` to `next` keeps the state monotonic.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        next >= self
    }
}
