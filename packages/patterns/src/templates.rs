//! Page boilerplate: letterheads, footers, transmission stamps and the
//! administrative pages stapled to the orders.

use std::sync::LazyLock;

use regex::Regex;

use crate::build;

/// Letterhead lines repeated at the top of pages.
pub static HEADER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^[ \t]*R[ÉE]PUBLIQUE[ \t]+FRAN[ÇC]AISE[ \t]*$",
        r"(?m)^[ \t]*(?i:libert[ée][ \t]*[-,]?[ \t]*[ée]galit[ée][ \t]*[-,]?[ \t]*fraternit[ée])[ \t]*$",
        r"(?m)^[ \t]*D[ÉE]PARTEMENT[ \t]+DES[ \t]+BOUCHES[- ]DU[- ]RH[ÔO]NE[ \t]*$",
        r"(?m)^[ \t]*(?:Ville|VILLE)[ \t]+(?:de|DE)[ \t]+(?:Marseille|MARSEILLE)[ \t]*$",
        r"(?m)^[ \t]*(?:DGA|D[ée]l[ée]gation[ \t]+[Gg][ée]n[ée]rale)[^\n]{0,80}$(?:\n[ \t]*(?:Direction|DIRECTION|Service|SERVICE|Division|DIVISION|P[ôo]le|P[ÔO]LE)[^\n]{0,80}$){0,3}",
    ]
    .iter()
    .map(|p| build(p))
    .collect()
});

/// Footer lines: page counters, postal boilerplate, switchboard numbers.
pub static FOOTER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^[ \t]*(?i:page)[ \t]*\d{1,3}[ \t]*(?:/|(?i:sur))[ \t]*\d{1,3}[ \t]*$",
        r"(?m)^[ \t]*\d{1,3}[ \t]*/[ \t]*\d{1,3}[ \t]*$",
        r"(?m)^[^\n]*\b13233[ \t]+(?i:marseille)[ \t]+(?i:cedex)[ \t]*20\b[^\n]*$",
        r"(?m)^[ \t]*(?i:h[ôo]tel[ \t]+de[ \t]+ville)\b[^\n]{0,80}\b1\d{4}\b[^\n]*$",
        r"(?m)^[ \t]*(?i:t[ée]l[ée]?(?:phone)?|fax)[ \t.:]*(?:\d{2}[ .]?){5}[^\n]*$",
    ]
    .iter()
    .map(|p| build(p))
    .collect()
});

/// Identifier of an act transmitted to the prefecture
/// (`013-211300058-20210312-2021_00737_VDM-AR`).
const ACT_ID: &str = r"\d{3}-\d{9}-\d{8}-[\w-]+?-(?:AR|AU|DE|CC|AI)\b";

/// Transmission stamps added by the prefecture's e-filing systems.
pub static STAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?:(?i:accus[ée][ \t]+de[ \t]+r[ée]ception[ \t]+en[ \t]+pr[ée]fecture)\s*{ACT_ID}(?:\s*(?i:date[ \t]+de[ \t]+t[ée]l[ée]transmission)[ \t]*:[ \t]*\d{{2}}/\d{{2}}/\d{{4}})?(?:\s*(?i:date[ \t]+de[ \t]+r[ée]ception[ \t]+pr[ée]fecture)[ \t]*:[ \t]*\d{{2}}/\d{{2}}/\d{{4}})?|(?i:envoy[ée][ \t]+en[ \t]+pr[ée]fecture[ \t]+le)[ \t]*\d{{2}}/\d{{2}}/\d{{4}}\s*(?i:re[çc]u[ \t]+en[ \t]+pr[ée]fecture[ \t]+le)[ \t]*\d{{2}}/\d{{2}}/\d{{4}}(?:\s*(?i:affich[ée]|publi[ée])[ \t]+(?i:le)[ \t]*(?:\d{{2}}/\d{{2}}/\d{{4}})?)?\s*ID[ \t]*:[ \t]*{ACT_ID})"
    ))
});

/// Title of the e-filing acknowledgement page ("Accusé de réception d'un
/// acte en préfecture").
pub static ACCUSE_RECEPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i:accus[ée][ \t]+de[ \t]+r[ée]ception[ \t]+d['’][ \t]*un[ \t]+acte[ \t]+en[ \t]+pr[ée]fecture)",
    )
});

/// Transmission slip appended by some town halls.
pub static BORDEREAU_RE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i:bordereau[ \t]+(?:de[ \t]+)?(?:formalit[ée]s|transmission|d['’][ \t]*envoi))"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lines() {
        let matches = |s: &str| HEADER_RES.iter().any(|re| re.is_match(s));
        assert!(matches("RÉPUBLIQUE FRANÇAISE\n"));
        assert!(matches("  DÉPARTEMENT DES BOUCHES-DU-RHÔNE"));
        assert!(matches("Liberté - Égalité - Fraternité"));
        assert!(!matches("la République française a"));
    }

    #[test]
    fn footer_lines() {
        let matches = |s: &str| FOOTER_RES.iter().any(|re| re.is_match(s));
        assert!(matches("Page 2 / 4"));
        assert!(matches("\n3/4\n"));
        assert!(matches("Hôtel de Ville - 13233 MARSEILLE CEDEX 20"));
        assert!(matches("Tél : 04 42 18 19 20"));
        assert!(!matches("Article 2 / les"));
    }

    #[test]
    fn actes_stamps() {
        let stamp = "Accusé de réception en préfecture\n013-211300058-20210312-2021_00737_VDM-AR\nDate de télétransmission : 12/03/2021\nDate de réception préfecture : 12/03/2021";
        let m = STAMP_RE.find(stamp).unwrap();
        assert_eq!(m.as_str(), stamp);

        let stamp = "Envoyé en préfecture le 15/04/2021\nReçu en préfecture le 15/04/2021\nAffiché le\nID : 013-211300421-20210415-AR2021_42-AR";
        let m = STAMP_RE.find(stamp).unwrap();
        assert_eq!(m.as_str(), stamp);
    }

    #[test]
    fn administrative_pages() {
        assert!(ACCUSE_RECEPTION_RE.is_match("ACCUSÉ DE RÉCEPTION D'UN ACTE EN PRÉFECTURE"));
        assert!(BORDEREAU_RE.is_match("Bordereau de formalités"));
    }
}
