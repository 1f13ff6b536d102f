#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Batch orchestration of the order extractor.
//!
//! Loads page text, runs parse → extract → aggregate on each document and
//! writes the page, document and report tables. A document that fails,
//! even by panicking inside the engine, is recorded with its error and
//! never stops the batch.

pub mod config;
pub mod input;
pub mod output;
pub mod progress;

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    path::PathBuf,
    sync::Arc,
};

use arretes_aggregate::{aggregate, quality_flags};
use arretes_document_models::{DocumentRecord, Page, PageRecord};
use arretes_extract::extract_document;
use arretes_gazetteer::{GazetteerError, Gazetteers};
use arretes_parser::{ParseOptions, ParsedDocument, parse_document};
use thiserror::Error;

pub use config::Config;
use progress::{BatchProgress, BatchSummary, DocumentOutcome};

/// Errors from batch input, configuration and output.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O error on a file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV read or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file parse error.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration rendering error.
    #[error("Config render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// Configuration that parses but cannot be used.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Span dump serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gazetteer loading error.
    #[error(transparent)]
    Gazetteer(#[from] GazetteerError),
}

/// The pages of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub pages: Vec<Page>,
}

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub parsed: ParsedDocument,
    pub pages: Vec<PageRecord>,
    pub record: DocumentRecord,
}

/// Parses, extracts and aggregates one document.
#[must_use]
pub fn process_document(
    document: &Document,
    options: &ParseOptions,
    gazetteers: &Gazetteers,
) -> ProcessedDocument {
    let parsed = parse_document(&document.pages, options);
    let extracted = extract_document(&parsed, gazetteers);
    let record = aggregate(&parsed, &extracted, gazetteers);
    ProcessedDocument {
        parsed,
        pages: extracted.pages,
        record,
    }
}

/// Output of a batch run, in input order.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub pages: Vec<PageRecord>,
    pub documents: Vec<DocumentRecord>,
    pub parsed: Vec<ParsedDocument>,
    /// Ids of denylisted documents that were not processed.
    pub skipped: Vec<String>,
}

impl Batch {
    /// Documents whose structural parse stopped early.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.parse_error.is_some())
            .count()
    }

    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            documents: self.documents.len(),
            failures: self.failures(),
            skipped: self.skipped.len(),
        }
    }

    /// Writes every requested output, overwriting existing files.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be created or written.
    pub fn write(&self, outputs: &Outputs) -> Result<(), PipelineError> {
        output::write_pages(output::create(&outputs.pages)?, &self.pages)?;
        output::write_documents(output::create(&outputs.documents)?, &self.documents)?;
        if let Some(path) = &outputs.report {
            output::write_report(output::create(path)?, &self.documents)?;
        }
        if let Some(path) = &outputs.spans_json {
            output::write_spans_json(output::create(path)?, &self.parsed)?;
        }
        Ok(())
    }
}

/// Where a batch writes its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub pages: PathBuf,
    pub documents: PathBuf,
    pub report: Option<PathBuf>,
    pub spans_json: Option<PathBuf>,
}

/// Runs every document through the engine.
///
/// Denylisted documents are skipped, and the pages of documents matching
/// an excluded file pattern are flagged out of scope before parsing.
#[must_use]
pub fn run_batch(
    documents: Vec<Document>,
    config: &Config,
    gazetteers: &Gazetteers,
    progress: &Arc<dyn BatchProgress>,
) -> Batch {
    let options = config.parse_options();
    let mut batch = Batch::default();
    progress.batch_started(documents.len());

    for mut document in documents {
        progress.document_started(&document.id);
        if config.is_excluded_document(&document.id) {
            log::info!("[{}] skipped: excluded document", document.id);
            batch.skipped.push(document.id);
            progress.document_finished(DocumentOutcome::Skipped);
            continue;
        }
        if config.is_excluded_page_file(&document.id) {
            log::debug!("[{}] pages flagged out of scope", document.id);
            for page in &mut document.pages {
                page.exclude = true;
            }
        }

        let outcome = match catch_unwind(AssertUnwindSafe(|| {
            process_document(&document, &options, gazetteers)
        })) {
            Ok(processed) => {
                let outcome = if let Some(error) = &processed.record.parse_error {
                    log::warn!("[{}] parse failed: {error}", document.id);
                    DocumentOutcome::Failed
                } else {
                    DocumentOutcome::Parsed
                };
                batch.pages.extend(processed.pages);
                batch.documents.push(processed.record);
                batch.parsed.push(processed.parsed);
                outcome
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                log::error!("[{}] engine panic: {message}", document.id);
                batch.pages.extend(
                    document
                        .pages
                        .iter()
                        .map(|p| PageRecord::new(&document.id, p.page_number)),
                );
                batch.documents.push(failed_record(&document, &message));
                DocumentOutcome::Failed
            }
        };
        progress.document_finished(outcome);
    }

    progress.batch_finished(&batch.summary());
    batch
}

fn failed_record(document: &Document, message: &str) -> DocumentRecord {
    let mut record = DocumentRecord {
        pdf: document.id.clone(),
        nb_pages: u32::try_from(document.pages.len()).unwrap_or(u32::MAX),
        parse_error: Some(format!("engine panic: {message}")),
        ..DocumentRecord::default()
    };
    record.quality = quality_flags(&record);
    record
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use arretes_document_models::QualityFlag;

    use super::*;
    use crate::{input::split_pages, progress::null_progress};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn push(&self, event: String) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl BatchProgress for Recorder {
        fn batch_started(&self, documents: usize) {
            self.push(format!("start {documents}"));
        }
        fn document_started(&self, id: &str) {
            self.push(format!("begin {id}"));
        }
        fn document_finished(&self, outcome: DocumentOutcome) {
            self.push(format!("{outcome:?}"));
        }
        fn batch_finished(&self, summary: &BatchSummary) {
            self.push(summary.to_string());
        }
    }

    fn document(id: &str, text: &str) -> Document {
        Document {
            id: id.to_string(),
            pages: split_pages(id, text),
        }
    }

    const ORDER: &str = "Objet : Arrêté de péril ordinaire - 7 rue Longue - 13400 Aubagne\n\n\
        Le Maire de la Commune d'Aubagne,\nVu le code civil,\n\x0c\
        ARRÊTE\nArticle 1er : travaux.\nFait à Aubagne, le 12 mars 2021\n";

    #[test]
    fn one_bad_document_does_not_stop_the_batch() {
        let config = Config::default();
        let gazetteers = Gazetteers::bundled().unwrap();
        let batch = run_batch(
            vec![
                document("broken.pdf", "Texte sans structure.\n"),
                document("good.pdf", ORDER),
            ],
            &config,
            &gazetteers,
            &null_progress(),
        );
        assert_eq!(batch.documents.len(), 2);
        assert_eq!(batch.failures(), 1);
        assert!(batch.documents[0].quality.contains(&QualityFlag::ParseFailed));
        assert_eq!(batch.documents[1].parse_error, None);
        assert_eq!(batch.documents[1].arr_date.as_deref(), Some("12/03/2021"));
        assert_eq!(batch.pages.len(), 3);
    }

    #[test]
    fn progress_follows_each_document() {
        let config = Config::from_toml("[exclusions]\ndocuments = [\"skip.pdf\"]\n").unwrap();
        let gazetteers = Gazetteers::bundled().unwrap();
        let recorder = Arc::new(Recorder::default());
        let progress: Arc<dyn BatchProgress> = recorder.clone();
        run_batch(
            vec![
                document("broken.pdf", "Texte sans structure.\n"),
                document("skip.pdf", ORDER),
                document("good.pdf", ORDER),
            ],
            &config,
            &gazetteers,
            &progress,
        );
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                "start 3",
                "begin broken.pdf",
                "Failed",
                "begin skip.pdf",
                "Skipped",
                "begin good.pdf",
                "Parsed",
                "2 documents, 1 parse failures, 1 skipped",
            ]
        );
    }

    #[test]
    fn exclusions_apply_before_parsing() {
        let config = Config::from_toml(
            "[exclusions]\ndocuments = [\"skip.pdf\"]\npage_file_patterns = [\"annexe\"]\n",
        )
        .unwrap();
        let gazetteers = Gazetteers::bundled().unwrap();
        let batch = run_batch(
            vec![
                document("skip.pdf", ORDER),
                document("ANNEXE_1.pdf", ORDER),
            ],
            &config,
            &gazetteers,
            &null_progress(),
        );
        assert_eq!(batch.skipped, vec!["skip.pdf".to_string()]);
        assert_eq!(batch.documents.len(), 1);
        assert!(batch.pages.iter().all(|p| p.exclude));
        assert_eq!(batch.documents[0].arr_date, None);
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let record = failed_record(&document("x.pdf", "a\x0cb"), "boom");
        assert_eq!(record.nb_pages, 2);
        assert!(record.quality.contains(&QualityFlag::ParseFailed));
    }

    #[test]
    fn writes_all_outputs() {
        let dir = std::env::temp_dir().join(format!("arretes_batch_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let outputs = Outputs {
            pages: dir.join("pages.csv"),
            documents: dir.join("docs.csv"),
            report: Some(dir.join("report.csv")),
            spans_json: Some(dir.join("spans.json")),
        };
        let gazetteers = Gazetteers::bundled().unwrap();
        let batch = run_batch(
            vec![document("good.pdf", ORDER)],
            &Config::default(),
            &gazetteers,
            &null_progress(),
        );
        batch.write(&outputs).unwrap();
        // A second run overwrites rather than appends.
        batch.write(&outputs).unwrap();

        let docs = std::fs::read_to_string(&outputs.documents).unwrap();
        let report = std::fs::read_to_string(dir.join("report.csv")).unwrap();
        let spans = std::fs::read_to_string(dir.join("spans.json")).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(docs.lines().count(), 2);
        assert!(docs.lines().nth(1).unwrap().starts_with("good.pdf,2,12/03/2021,"));
        assert_eq!(report.lines().count(), 2);
        assert!(spans.contains("\"par_vu\""));
    }
}
