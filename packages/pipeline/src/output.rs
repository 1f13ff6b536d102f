//! CSV and JSON writers. Every output file is overwritten.

use std::{fs::File, io::Write, path::Path};

use arretes_document_models::{DocumentRecord, PageRecord};
use arretes_parser::{ParsedDocument, ParsedPage};
use serde::Serialize;

use crate::PipelineError;

/// One row of the review report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub pdf: String,
    pub nb_pages: u32,
    pub parse_error: Option<String>,
    pub nb_flags: usize,
    pub flags: String,
    pub warnings: String,
}

impl From<&DocumentRecord> for ReportRow {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            pdf: record.pdf.clone(),
            nb_pages: record.nb_pages,
            parse_error: record.parse_error.clone(),
            nb_flags: record.quality.len(),
            flags: record
                .quality
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ; "),
            warnings: record.warnings.join(" ; "),
        }
    }
}

#[derive(Serialize)]
struct SpanDump<'a> {
    pdf: &'a str,
    fatal: Option<String>,
    warnings: Vec<String>,
    pages: &'a [ParsedPage],
}

/// Writes one row per page.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_pages(writer: impl Write, pages: &[PageRecord]) -> Result<(), PipelineError> {
    write_rows(writer, pages)
}

/// Writes one row per (document, address).
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_documents(
    writer: impl Write,
    documents: &[DocumentRecord],
) -> Result<(), PipelineError> {
    let rows: Vec<_> = documents.iter().flat_map(DocumentRecord::rows).collect();
    write_rows(writer, &rows)
}

/// Writes one report row per document.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_report(writer: impl Write, documents: &[DocumentRecord]) -> Result<(), PipelineError> {
    let rows: Vec<ReportRow> = documents.iter().map(ReportRow::from).collect();
    write_rows(writer, &rows)
}

/// Writes the spans of every parsed page as a JSON array, one entry per
/// document.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_spans_json(
    writer: impl Write,
    documents: &[ParsedDocument],
) -> Result<(), PipelineError> {
    let dump: Vec<SpanDump<'_>> = documents
        .iter()
        .map(|document| SpanDump {
            pdf: &document.document_id,
            fatal: document.fatal.as_ref().map(ToString::to_string),
            warnings: document.warnings.iter().map(ToString::to_string).collect(),
            pages: &document.pages,
        })
        .collect();
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

/// Creates (or truncates) the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn create(path: &Path) -> Result<File, PipelineError> {
    log::info!("Writing {}", path.display());
    File::create(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_rows<T: Serialize>(writer: impl Write, rows: &[T]) -> Result<(), PipelineError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use arretes_document_models::{Address, Page, QualityFlag};
    use arretes_parser::{ParseOptions, parse_document};

    use super::*;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> Result<(), PipelineError>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn page_csv_header() {
        let out = render(|w| write_pages(w, &[PageRecord::new("a.pdf", 1)]));
        let header = out.lines().next().unwrap();
        assert!(header.starts_with("pdf,page_num,exclude,has_stamp,"));
        assert!(header.ends_with(",classe,urgence,demo,int_hab"));
        assert!(out.lines().nth(1).unwrap().starts_with("a.pdf,1,false,"));
    }

    #[test]
    fn document_rows_fan_out() {
        let address = |number: &str| Address {
            number: Some(number.to_string()),
            street: Some("rue X".to_string()),
            ..Address::default()
        };
        let record = DocumentRecord {
            pdf: "a.pdf".to_string(),
            addresses: vec![address("1"), address("3")],
            ..DocumentRecord::default()
        };
        let out = render(|w| write_documents(w, &[record]));
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().next().unwrap().starts_with("pdf,nb_pages,arr_date,"));
    }

    #[test]
    fn report_joins_flags() {
        let record = DocumentRecord {
            pdf: "a.pdf".to_string(),
            quality: vec![QualityFlag::MissingDate, QualityFlag::MissingInsee],
            ..DocumentRecord::default()
        };
        let out = render(|w| write_report(w, &[record]));
        assert_eq!(
            out,
            "pdf,nb_pages,parse_error,nb_flags,flags,warnings\na.pdf,0,,2,missing_date ; missing_insee,\n"
        );
    }

    #[test]
    fn spans_json_is_an_array_of_documents() {
        let parsed = parse_document(
            &[Page::new("a.pdf", 1, "Le Maire de Cassis,\nVu le code civil,\n")],
            &ParseOptions::default(),
        );
        let out = render(|w| write_spans_json(w, &[parsed]));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["pdf"], "a.pdf");
        assert_eq!(value[0]["pages"][0]["page_number"], 1);
        assert!(value[0]["pages"][0]["content_spans"].is_array());
    }
}
