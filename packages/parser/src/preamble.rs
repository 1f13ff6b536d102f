//! Preamble fields: mayoral authority, order number and order title.
//!
//! The preamble is everything before the first `Vu` or `Considérant` of
//! the document. Its fields are located independently; when two of their
//! paragraph spans collide, the authority wins over the title and the
//! title over the order-number line.

use arretes_document_models::{Span, SpanKind};
use arretes_patterns::structure::{
    AUTHORITY_RE, NUM_ARR_FALLBACK_RE, NUM_ARR_RE, OBJET_RE, TITLE_HEADING_RE,
};

use crate::ParseWarning;

/// Spans found in `body[..end]`, with a warning per missing field.
pub(crate) fn extract_preamble(body: &str, end: usize, page: u32) -> (Vec<Span>, Vec<ParseWarning>) {
    let end = end.min(body.len());
    let mut warnings = Vec::new();

    let authority = authority(body, end);
    if authority.is_none() {
        warnings.push(ParseWarning::MissingAuthority { page });
    }
    let number = order_number(body, end);
    if number.is_none() {
        warnings.push(ParseWarning::MissingOrderNumber { page });
    }

    let taken: Vec<&Span> = authority
        .iter()
        .chain(number.iter())
        .map(|(paragraph, _)| paragraph)
        .collect();
    let title = title(body, end, &taken).filter(|(paragraph, _)| {
        authority
            .as_ref()
            .is_none_or(|(a, _)| !a.overlaps(paragraph))
    });
    if title.is_none() {
        warnings.push(ParseWarning::MissingTitle { page });
    }

    let mut spans = Vec::new();
    if let Some((paragraph, commune)) = authority {
        spans.push(paragraph);
        spans.push(commune);
    }
    if let Some((paragraph, value)) = number {
        let collides = spans
            .iter()
            .chain(title.iter().map(|(p, _)| p))
            .any(|s| s.kind.is_paragraph() && s.overlaps(&paragraph));
        if !collides {
            spans.push(paragraph);
        }
        spans.push(value);
    }
    if let Some((paragraph, value)) = title {
        spans.push(paragraph);
        spans.push(value);
    }
    (spans, warnings)
}

/// `par_autorite` and the `adr_ville` it names.
fn authority(body: &str, end: usize) -> Option<(Span, Span)> {
    let caps = AUTHORITY_RE.captures(&body[..end])?;
    let whole = caps.get(0)?;
    let commune = caps.name("commune")?;
    Some((
        Span::trimmed(body, whole.start(), whole.end(), SpanKind::ParAutorite)?,
        Span::from_range(body, commune.start(), commune.end(), SpanKind::AdrVille)?,
    ))
}

/// `par_num_arr` and `num_arr`, from `Arrêté n°` or the bare fallback
/// forms.
fn order_number(body: &str, end: usize) -> Option<(Span, Span)> {
    let region = &body[..end];
    let caps = NUM_ARR_RE
        .captures(region)
        .or_else(|| NUM_ARR_FALLBACK_RE.captures(region))?;
    let whole = caps.get(0)?;
    let value = caps.name("num").or_else(|| caps.name("vdm"))?;
    let value_end = value.start()
        + value
            .as_str()
            .trim_end_matches(['.', '-', '/', '_'])
            .len();
    Some((
        Span::trimmed(body, whole.start(), value_end, SpanKind::ParNumArr)?,
        Span::from_range(body, value.start(), value_end, SpanKind::NumArr)?,
    ))
}

/// `par_nom_arr` and `nom_arr`: the `Objet :` block, else a title heading,
/// else the largest stretch of preamble text left over.
fn title(body: &str, end: usize, taken: &[&Span]) -> Option<(Span, Span)> {
    let region = &body[..end];
    let objet = || {
        let m = OBJET_RE.find(region)?;
        let block = block_end(region, m.end());
        let (b, e) = value_range(body, m.end(), block)?;
        Some((
            Span::trimmed(body, m.start(), e, SpanKind::ParNomArr)?,
            Span::from_range(body, b, e, SpanKind::NomArr)?,
        ))
    };
    let heading = || {
        let m = TITLE_HEADING_RE.find(region)?;
        let (b, e) = value_range(body, m.start(), block_end(region, m.end()))?;
        Some((
            Span::from_range(body, b, e, SpanKind::ParNomArr)?,
            Span::from_range(body, b, e, SpanKind::NomArr)?,
        ))
    };
    let leftover = || {
        let (b, e) = gaps(end, taken)
            .into_iter()
            .filter_map(|(b, e)| value_range(body, b, e))
            .max_by_key(|(b, e)| e - b)?;
        Some((
            Span::from_range(body, b, e, SpanKind::ParNomArr)?,
            Span::from_range(body, b, e, SpanKind::NomArr)?,
        ))
    };
    objet().or_else(heading).or_else(leftover)
}

/// End of the run of non-blank lines starting at `from`, stopping before a
/// line that opens the authority or order-number field.
fn block_end(region: &str, from: usize) -> usize {
    let line_end = |start: usize| region[start..].find('\n').map_or(region.len(), |i| start + i);
    let mut end = line_end(from);
    while end < region.len() {
        let next = line_end(end + 1);
        let line = &region[end + 1..next];
        if line.trim().is_empty() || AUTHORITY_RE.is_match(line) || NUM_ARR_RE.is_match(line) {
            break;
        }
        end = next;
    }
    end
}

/// `body[begin..end]` with whitespace and separating punctuation trimmed
/// from both ends, if any word character is left.
fn value_range(body: &str, begin: usize, end: usize) -> Option<(usize, usize)> {
    let text = body.get(begin..end)?;
    let is_filler = |c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '.');
    let trimmed = text.trim_start_matches(is_filler);
    let b = begin + (text.len() - trimmed.len());
    let e = b + trimmed.trim_end_matches(is_filler).len();
    body[b..e]
        .chars()
        .any(char::is_alphanumeric)
        .then_some((b, e))
}

/// Ranges of `0..end` not covered by `taken`.
fn gaps(end: usize, taken: &[&Span]) -> Vec<(usize, usize)> {
    let mut taken: Vec<(usize, usize)> = taken.iter().map(|s| (s.begin, s.end)).collect();
    taken.sort_unstable();
    let mut gaps = Vec::new();
    let mut cursor = 0;
    for (b, e) in taken {
        if b > cursor {
            gaps.push((cursor, b.min(end)));
        }
        cursor = cursor.max(e);
    }
    if cursor < end {
        gaps.push((cursor, end));
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(spans: &[Span], kind: SpanKind) -> Option<&str> {
        spans.iter().find(|s| s.kind == kind).map(|s| s.text.as_str())
    }

    #[test]
    fn authority_only_preamble() {
        let body = "Nous, Maire de Gémenos,\nVu le code";
        let end = body.find("Vu").unwrap();
        let (spans, warnings) = extract_preamble(body, end, 1);
        assert_eq!(find(&spans, SpanKind::AdrVille), Some("Gémenos"));
        assert_eq!(find(&spans, SpanKind::ParAutorite), Some("Nous, Maire de Gémenos"));
        assert!(warnings.contains(&ParseWarning::MissingOrderNumber { page: 1 }));
        assert!(warnings.contains(&ParseWarning::MissingTitle { page: 1 }));
        assert!(!warnings.contains(&ParseWarning::MissingAuthority { page: 1 }));
    }

    #[test]
    fn objet_block_spans_several_lines() {
        let body = "ARRÊTÉ N° 2021_00737_VDM\nObjet : Arrêté de mise en sécurité\n12 rue de la République - 13001 Marseille\n\nNous, Maire de Marseille,\n";
        let (spans, warnings) = extract_preamble(body, body.len(), 1);
        assert!(warnings.is_empty());
        assert_eq!(find(&spans, SpanKind::NumArr), Some("2021_00737_VDM"));
        assert_eq!(
            find(&spans, SpanKind::NomArr),
            Some("Arrêté de mise en sécurité\n12 rue de la République - 13001 Marseille")
        );
        assert_eq!(find(&spans, SpanKind::AdrVille), Some("Marseille"));
    }

    #[test]
    fn number_line_inside_title_keeps_value_only() {
        let body = "Objet : Arrêté n° 21/104 de péril ordinaire\n\nLe Maire de Cassis\n";
        let (spans, _) = extract_preamble(body, body.len(), 1);
        assert_eq!(find(&spans, SpanKind::NumArr), Some("21/104"));
        assert_eq!(find(&spans, SpanKind::ParNumArr), None);
        let paragraphs: Vec<&Span> = spans.iter().filter(|s| s.kind.is_paragraph()).collect();
        for (i, a) in paragraphs.iter().enumerate() {
            for b in &paragraphs[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn title_heading_without_objet() {
        let body = "ARRÊTÉ DE PÉRIL GRAVE ET IMMINENT\n\nLe Maire de la Commune d'Aubagne,\n";
        let (spans, _) = extract_preamble(body, body.len(), 1);
        assert_eq!(find(&spans, SpanKind::NomArr), Some("ARRÊTÉ DE PÉRIL GRAVE ET IMMINENT"));
        assert_eq!(find(&spans, SpanKind::AdrVille), Some("Aubagne"));
    }

    #[test]
    fn leftover_text_becomes_title() {
        let body = "Immeuble sis 3 rue Longue\n\nNous, Maire de Gémenos,\n";
        let (spans, _) = extract_preamble(body, body.len(), 1);
        assert_eq!(find(&spans, SpanKind::NomArr), Some("Immeuble sis 3 rue Longue"));
    }

    #[test]
    fn gaps_between_taken_ranges() {
        let a = Span::from_range("0123456789", 2, 4, SpanKind::ParAutorite).unwrap();
        let b = Span::from_range("0123456789", 6, 7, SpanKind::ParNumArr).unwrap();
        assert_eq!(gaps(10, &[&b, &a]), vec![(0, 2), (4, 6), (7, 10)]);
    }
}
