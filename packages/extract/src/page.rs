//! Per-page record builder.

use arretes_document_models::{PageRecord, PartyRole, SpanKind};
use arretes_gazetteer::Gazetteers;
use arretes_parser::{PageSkip, ParsedPage};
use arretes_patterns::dates::{format_date, parse_date};

use crate::{
    ExtractWarning,
    address::{address_zone_from_title, find_address_zone, parse_address_zone},
    cadastre::{cadastral_mention, find_cadastral_references},
    classification::{classify, is_demolition, is_habitability_ban},
    parties::find_parties,
};

/// Builds the record of one parsed page.
///
/// Structural flags are always filled; values are only extracted from
/// pages the parser walked.
#[must_use]
pub fn page_record(
    document_id: &str,
    page: &ParsedPage,
    gazetteers: &Gazetteers,
) -> (PageRecord, Vec<ExtractWarning>) {
    let mut record = PageRecord::new(document_id, page.page_number);
    let mut warnings = Vec::new();
    set_flags(&mut record, page);
    if page.skip.is_none() {
        extract_values(&mut record, &mut warnings, document_id, page, gazetteers);
    }
    (record, warnings)
}

fn set_flags(record: &mut PageRecord, page: &ParsedPage) {
    let has_any = |kinds: &[SpanKind]| kinds.iter().any(|kind| page.has(*kind));

    record.exclude = page.skip == Some(PageSkip::Excluded);
    record.has_stamp = page.has_stamp();
    record.is_accusedereception_page = page.is_accusedereception_page();
    record.has_vu = has_any(&[SpanKind::ParVu, SpanKind::ParVuSuite]);
    record.has_considerant = has_any(&[SpanKind::ParConsiderant, SpanKind::ParConsiderantSuite]);
    record.has_arrete = page.has(SpanKind::ParArrete);
    record.has_article = has_any(&[SpanKind::ParArticle, SpanKind::ParArticleSuite]);
    record.has_cgct = page.has(SpanKind::Cgct);
    record.has_cgct_art = page.has(SpanKind::CgctArt);
    record.has_cch = page.has(SpanKind::Cch);
    record.has_cch_l111 = page.has(SpanKind::CchL111);
    record.has_cch_l511 = page.has(SpanKind::CchL511);
    record.has_cch_l521 = page.has(SpanKind::CchL521);
    record.has_cch_l541 = page.has(SpanKind::CchL541);
    record.has_cch_r511 = page.has(SpanKind::CchR511);
    record.has_cc = page.has(SpanKind::Cc);
}

fn extract_values(
    record: &mut PageRecord,
    warnings: &mut Vec<ExtractWarning>,
    document_id: &str,
    page: &ParsedPage,
    gazetteers: &Gazetteers,
) {
    let page_num = page.page_number;
    let title = first_text(page, SpanKind::NomArr);
    let text = paragraph_text(page);
    let articles = joined(page, &[SpanKind::ParArticle, SpanKind::ParArticleSuite]);

    record.commune_maire = commune_in(page, SpanKind::ParAutorite)
        .or_else(|| commune_in(page, SpanKind::ParSignDate))
        .map(ToString::to_string);
    record.num_arr = first_text(page, SpanKind::NumArr).map(ToString::to_string);
    record.nom_arr = title.map(ToString::to_string);
    record.arr_date = first_text(page, SpanKind::ArrDate)
        .and_then(parse_date)
        .map(format_date);

    let zone = title
        .and_then(address_zone_from_title)
        .or_else(|| find_address_zone(&text));
    if let Some(zone) = zone {
        let decomposed = parse_address_zone(zone);
        if decomposed.addresses().iter().all(|a| a.is_empty()) {
            log::warn!("[{document_id}] page {page_num}: no address fields in {zone:?}");
            warnings.push(ExtractWarning::EmptyAddress {
                page: page_num,
                zone: zone.to_string(),
            });
        }
        record.set_address_zone(zone, decomposed);
    }

    let cadastre = find_cadastral_references(&text);
    if !cadastre.is_empty() {
        record.par_ref_cad = cadastral_mention(&text).map(ToString::to_string);
        let refs: Vec<String> = cadastre.iter().map(ToString::to_string).collect();
        record.cad_refs = Some(refs.join(", "));
        record.cadastre = cadastre;
    }

    for role in [PartyRole::Proprio, PartyRole::Syndic, PartyRole::Gest] {
        let mut parties = find_parties(role, &text, gazetteers);
        if parties.len() > 1 {
            log::warn!(
                "[{document_id}] page {page_num}: {} candidates for {role}, keeping {:?}",
                parties.len(),
                parties[0].name
            );
            warnings.push(ExtractWarning::MultipleParties {
                page: page_num,
                role,
                count: parties.len(),
            });
        }
        if !parties.is_empty() {
            record.set_party(parties.swap_remove(0));
        }
    }

    if let Some((classe, urgence)) = title.and_then(classify).or_else(|| classify(&text)) {
        record.classe = Some(classe);
        record.urgence = Some(urgence);
    }
    record.demo = is_demolition(&articles);
    record.int_hab = title.is_some_and(is_habitability_ban) || is_habitability_ban(&articles);
}

fn first_text(page: &ParsedPage, kind: SpanKind) -> Option<&str> {
    page.spans(kind).next().map(|s| s.text.as_str())
}

/// Commune named inside the first paragraph of `container` kind.
fn commune_in(page: &ParsedPage, container: SpanKind) -> Option<&str> {
    let paragraph = page.spans(container).next()?;
    page.spans(SpanKind::AdrVille)
        .find(|s| paragraph.contains(s))
        .map(|s| s.text.as_str())
}

/// Text of every paragraph on the page, one per line.
fn paragraph_text(page: &ParsedPage) -> String {
    page.content_spans
        .iter()
        .filter(|s| s.kind.is_paragraph())
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of the paragraphs of the given kinds, one per line.
fn joined(page: &ParsedPage, kinds: &[SpanKind]) -> String {
    page.content_spans
        .iter()
        .filter(|s| kinds.contains(&s.kind))
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
