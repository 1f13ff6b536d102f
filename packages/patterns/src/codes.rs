//! Citations of the legal codes an order relies on.

use std::sync::LazyLock;

use arretes_document_models::SpanKind;
use regex::Regex;

use crate::build;

/// An article reference `L 511-1`, `L.511-1`, `R511-5`: prefix letter,
/// article root and suffix range.
fn article(letter: char, root: &str, suffix: &str) -> String {
    format!(r"\b{letter}\.?[ \t]*{root}[ \t]*-[ \t]*(?:{suffix})\b")
}

/// Citation matchers, one per span kind.
///
/// Specific article references come before the code names they belong to;
/// both may match the same paragraph.
pub static CITATION_RES: LazyLock<Vec<(SpanKind, Regex)>> = LazyLock::new(|| {
    vec![
        (
            SpanKind::CgctArt,
            build(&format!(
                "(?i:{}|{})",
                article('L', "2212", "[1-4]"),
                article('L', "2213", "24")
            )),
        ),
        (
            SpanKind::Cgct,
            build(r"(?i:code\s+g[ée]n[ée]ral\s+des\s+collectivit[ée]s\s+territoriales|\bCGCT\b)"),
        ),
        (SpanKind::CchL111, build(&format!("(?i:{})", article('L', "111", r"6[ \t]*-[ \t]*1")))),
        (
            SpanKind::CchL511,
            build(&format!("(?i:{})", article('L', "511", "2[0-2]|1[0-9]|[1-9]"))),
        ),
        (SpanKind::CchL521, build(&format!("(?i:{})", article('L', "521", "[1-4]")))),
        (SpanKind::CchL541, build(&format!("(?i:{})", article('L', "541", "[1-3]")))),
        (
            SpanKind::CchR511,
            build(&format!("(?i:{})", article('R', "511", "1[0-2]|[1-9]"))),
        ),
        (
            SpanKind::Cch,
            build(r"(?i:code\s+de\s+la\s+construction\s+et\s+de\s+l['’]\s*habitation|\bCCH\b)"),
        ),
        (SpanKind::Cc, build(r"(?i:code\s+civil)")),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SpanKind> {
        CITATION_RES
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(kind, _)| *kind)
            .collect()
    }

    #[test]
    fn article_references() {
        assert_eq!(kinds("l'article L.2212-2"), vec![SpanKind::CgctArt]);
        assert_eq!(kinds("articles L 511-1 à L 511-6"), vec![SpanKind::CchL511]);
        assert_eq!(kinds("l'article L511-19"), vec![SpanKind::CchL511]);
        assert_eq!(kinds("R 511-5"), vec![SpanKind::CchR511]);
        assert_eq!(kinds("L.521-3-1"), vec![SpanKind::CchL521]);
        assert_eq!(kinds("L111-6-1"), vec![SpanKind::CchL111]);
        assert!(kinds("L511-99").is_empty());
    }

    #[test]
    fn code_names() {
        assert_eq!(
            kinds("Vu le Code Général des Collectivités Territoriales"),
            vec![SpanKind::Cgct]
        );
        assert_eq!(
            kinds("Vu le code de la construction et de l’habitation"),
            vec![SpanKind::Cch]
        );
        assert_eq!(kinds("les articles 2384 du Code civil"), vec![SpanKind::Cc]);
    }
}
