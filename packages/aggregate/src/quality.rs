//! Data-quality flags for manual review.

use arretes_document_models::{DocumentRecord, PresenceField, QualityFlag};
use arretes_gazetteer::MARSEILLE_INSEE;

/// Every review flag raised by a document record.
///
/// An empty list only means no check fired, not that the record is
/// complete.
#[must_use]
pub fn quality_flags(record: &DocumentRecord) -> Vec<QualityFlag> {
    let mut flags = Vec::new();
    if record.parse_error.is_some() {
        flags.push(QualityFlag::ParseFailed);
    }
    if record.arr_date.is_none() {
        flags.push(QualityFlag::MissingDate);
    }
    if record.classe.is_none() {
        flags.push(QualityFlag::MissingClassification);
    }
    match record.codeinsee.as_deref() {
        None => flags.push(QualityFlag::MissingInsee),
        Some(MARSEILLE_INSEE) => flags.push(QualityFlag::InseeWholeMarseille),
        Some(_) => {}
    }
    if record.ref_cad.is_empty() {
        flags.push(QualityFlag::MissingCadastralParcel);
    }

    let addresses: Vec<_> = record.addresses.iter().filter(|a| !a.is_empty()).collect();
    if addresses.is_empty() {
        flags.push(QualityFlag::MissingAddress);
    } else {
        if addresses.iter().any(|a| a.number.is_none()) {
            flags.push(QualityFlag::MissingStreetNumber);
        }
        if addresses.iter().any(|a| a.postal_code.is_none()) {
            flags.push(QualityFlag::MissingPostalCode);
        }
        if addresses.iter().any(|a| a.commune.is_none()) {
            flags.push(QualityFlag::MissingCommune);
        }
    }
    if record.adr_pair {
        flags.push(QualityFlag::AddressPairNeedsReview);
    }

    for &field in PresenceField::all() {
        if field.expects_contiguous() && !record.presence.is_contiguous(field) {
            flags.push(QualityFlag::NonContiguousPages(field));
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use arretes_document_models::{Address, Classification, PresencePages};

    use super::*;

    fn complete() -> DocumentRecord {
        let mut presence = PresencePages::default();
        for (field, page) in [
            (PresenceField::HasVu, 1),
            (PresenceField::HasConsiderant, 1),
            (PresenceField::HasConsiderant, 2),
            (PresenceField::HasArticle, 2),
        ] {
            presence.push(field, page);
        }
        DocumentRecord {
            pdf: "a.pdf".to_string(),
            arr_date: Some("12/03/2021".to_string()),
            classe: Some(Classification::PerilOrdinaire),
            codeinsee: Some("13005".to_string()),
            ref_cad: vec!["13005000AB0012".to_string()],
            addresses: vec![Address {
                number: Some("7".to_string()),
                street: Some("rue Longue".to_string()),
                postal_code: Some("13400".to_string()),
                commune: Some("Aubagne".to_string()),
                ..Address::default()
            }],
            presence,
            ..DocumentRecord::default()
        }
    }

    #[test]
    fn complete_record_raises_nothing() {
        assert!(quality_flags(&complete()).is_empty());
    }

    #[test]
    fn missing_fields_are_flagged() {
        let record = DocumentRecord {
            codeinsee: Some(MARSEILLE_INSEE.to_string()),
            addresses: vec![Address {
                street: Some("rue Longue".to_string()),
                ..Address::default()
            }],
            arr_date: None,
            ..complete()
        };
        let flags = quality_flags(&record);
        assert!(flags.contains(&QualityFlag::MissingDate));
        assert!(flags.contains(&QualityFlag::InseeWholeMarseille));
        assert!(flags.contains(&QualityFlag::MissingStreetNumber));
        assert!(flags.contains(&QualityFlag::MissingPostalCode));
        assert!(!flags.contains(&QualityFlag::MissingAddress));
    }

    #[test]
    fn gaps_in_structural_pages() {
        let mut record = complete();
        record.presence.push(PresenceField::HasArticle, 4);
        assert_eq!(
            quality_flags(&record),
            vec![QualityFlag::NonContiguousPages(PresenceField::HasArticle)]
        );
    }

    #[test]
    fn empty_record() {
        let flags = quality_flags(&DocumentRecord::default());
        assert!(flags.contains(&QualityFlag::MissingAddress));
        assert!(flags.contains(&QualityFlag::MissingInsee));
        assert!(flags.contains(&QualityFlag::NonContiguousPages(PresenceField::HasVu)));
    }
}
