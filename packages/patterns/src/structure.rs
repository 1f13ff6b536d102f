//! Structural markers of an order: preamble fields, paragraph openers and
//! the signature line.
//!
//! Paragraph openers are line-anchored (`(?m)^`): an order starts each
//! "Vu", "Considérant" and "Article" on a new line, which is what separates
//! them from the same words used mid-sentence.

use std::sync::LazyLock;

use regex::Regex;

use crate::{build, commune::COMMUNE, dates::date};

/// "Vu" paragraph opener.
pub static VU_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?m)^[ \t]*(?:Vu|VU|vu)\b"));

/// "Considérant" paragraph opener, singular or plural, any case.
pub static CONSIDERANT_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?m)^[ \t]*(?i:consid[ée]rant)s?\b"));

/// The operative "ARRÊTE" line, including the letter-spaced OCR form
/// `A R R E T E` and the plural `ARRÊTONS`.
pub static ARRETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?m)^[ \t]*(?:(?i:arr[êe]t(?:e|ons))|A[ \t]?R[ \t]?R[ \t]?[ÊE][ \t]?T[ \t]?(?:E|O[ \t]?N[ \t]?S))[ \t]*:?[ \t]*$",
    )
});

/// "Article N" paragraph opener.
pub static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?m)^[ \t]*(?:ARTICLE|Article|ART\.?|Art\.)[ \t]*(?:\d{1,2}(?:[ \t]*(?:er|ER))?|(?i:premier|unique)|[IVX]{1,4})\b",
    )
});

/// Mayoral authority formula. Named group: `commune`.
///
/// `Nous, Maire de Gémenos`, `Nous, Jean Dupont, Maire de Cassis`,
/// `Le Maire de la Ville de Marseille`, `Le Maire de la Commune d'Aubagne`.
pub static AUTHORITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?:(?i:nous)[ \t]*,[ \t]*(?:[^,\n]{{1,60}},[ \t]*)?|(?i:le)[ \t]+)?(?i:maire)(?:[ \t]+(?i:adjoint)\w*)?[ \t]+(?:(?i:de[ \t]+la[ \t]+(?:commune|ville))[ \t]+)?(?:(?i:de)[ \t]+|(?i:d)['’][ \t]*)(?P<commune>{COMMUNE})"
    ))
});

/// Characters allowed in an order number.
const NUMBER: &str = r"(?P<num>[\w/.-]*\d[\w/.-]*)";

/// Order number introduced by `Arrêté n°`. Named group: `num`.
pub static NUM_ARR_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?i:arr[êe]t[ée](?:[ \t]+municipal)?|d[ée]cision)[ \t]*(?i:n[°ºo]|num[ée]ro)[ \t.:]*{NUMBER}"
    ))
});

/// Bare order numbers: a line opening with `N°`, or the Marseille
/// `2021_00737_VDM` form. Named group: `num`.
pub static NUM_ARR_FALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?m)^[ \t]*(?:(?i:n[°º]|num[ée]ro)[ \t]*:?[ \t]*{NUMBER}|(?P<vdm>\d{{4}}_\d{{3,5}}_VDM)\b)"
    ))
});

/// `Objet :` prefix of the title line.
pub static OBJET_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?m)^[ \t]*(?i:objet)[ \t]*:[ \t]*"));

/// Title written as a heading: a line opening with `Arrêté de …`,
/// `Arrêté portant …` or `Arrêté modificatif …`.
pub static TITLE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?m)^[ \t]*(?i:arr[êe]t[ée])[ \t]+(?i:de|d['’]|du|des|portant|modificatif|prescrivant|ordonnant|abrogeant|relatif|mettant)\b[^\n]*$",
    )
});

/// Signature line: `Fait à X, le DATE`, `X, le DATE` or `Signé le DATE`.
///
/// Named groups: `commune` or `commune2`, and the [`date`] groups.
pub static SIGN_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?m)^[ \t]*(?:(?i:fait)[ \t]+(?i:à|a)[ \t]+(?P<commune>{COMMUNE})[ \t]*,?[ \t]*(?:(?i:en[ \t]+l['’]h[ôo]tel[ \t]+de[ \t]+ville)[ \t]*,?[ \t]*)?(?i:le)?|(?P<commune2>{COMMUNE})[ \t]*,[ \t]*(?i:le)|(?i:sign[ée])[ \t]+(?i:le))\s*(?:{date})",
        date = date()
    ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_openers_are_line_anchored() {
        assert!(VU_RE.is_match("Vu le code général"));
        assert!(VU_RE.is_match("texte\n  VU l'arrêté"));
        assert!(!VU_RE.is_match("tel que vu par"));
        assert!(!VU_RE.is_match("Vulcain"));
        assert!(CONSIDERANT_RE.is_match("\nCONSIDÉRANT que"));
        assert!(CONSIDERANT_RE.is_match("Considérants"));
        assert!(ARTICLE_RE.is_match("Article 1er : les"));
        assert!(ARTICLE_RE.is_match("ARTICLE 12"));
        assert!(ARTICLE_RE.is_match("Article premier"));
        assert!(!ARTICLE_RE.is_match("les articles L511-1"));
    }

    #[test]
    fn arrete_line_variants() {
        assert!(ARRETE_RE.is_match("ARRÊTE"));
        assert!(ARRETE_RE.is_match("\n  ARRETE :\n"));
        assert!(ARRETE_RE.is_match("A R R E T E"));
        assert!(ARRETE_RE.is_match("Arrêtons"));
        assert!(!ARRETE_RE.is_match("ARRÊTE DE PÉRIL"));
    }

    #[test]
    fn authority_formulas() {
        let commune = |s: &str| {
            AUTHORITY_RE
                .captures(s)
                .map(|c| c["commune"].to_string())
        };
        assert_eq!(commune("Nous, Maire de Gémenos,").as_deref(), Some("Gémenos"));
        assert_eq!(
            commune("Nous, Roland Giberti, Maire de Gémenos,").as_deref(),
            Some("Gémenos")
        );
        assert_eq!(
            commune("Le Maire de la Ville de Marseille").as_deref(),
            Some("Marseille")
        );
        assert_eq!(
            commune("Le Maire de la Commune d'Aubagne,").as_deref(),
            Some("Aubagne")
        );
        assert_eq!(commune("LE MAIRE DE LA CIOTAT").as_deref(), Some("LA CIOTAT"));
    }

    #[test]
    fn order_numbers() {
        let num = |s: &str| NUM_ARR_RE.captures(s).map(|c| c["num"].to_string());
        assert_eq!(num("Arrêté n° 2021_00737_VDM").as_deref(), Some("2021_00737_VDM"));
        assert_eq!(num("ARRETE N°21/104").as_deref(), Some("21/104"));
        assert_eq!(num("Arrêté municipal n°AP-2020-12").as_deref(), Some("AP-2020-12"));
        let caps = NUM_ARR_FALLBACK_RE.captures("entête\n2020_01234_VDM\n").unwrap();
        assert_eq!(&caps["vdm"], "2020_01234_VDM");
    }

    #[test]
    fn signature_lines() {
        let caps = SIGN_DATE_RE.captures("Fait à Aubagne, le 12 mars 2021").unwrap();
        assert_eq!(&caps["commune"], "Aubagne");
        assert_eq!(&caps["year"], "2021");
        let caps = SIGN_DATE_RE.captures("\nMarseille, le 05/11/2020\n").unwrap();
        assert_eq!(&caps["commune2"], "Marseille");
        assert_eq!(&caps["nyear"], "2020");
        assert!(SIGN_DATE_RE.is_match("Signé le 3 juin 2019"));
        assert!(!SIGN_DATE_RE.is_match("vu l'arrêté du 3 juin 2019"));
    }

    #[test]
    fn title_heading() {
        assert!(TITLE_HEADING_RE.is_match("ARRÊTÉ DE MISE EN SÉCURITÉ - 12 rue X"));
        assert!(TITLE_HEADING_RE.is_match("Arrêté portant interdiction d'occuper"));
        assert!(!TITLE_HEADING_RE.is_match("ARRÊTE"));
    }
}
