//! Page text loading.
//!
//! Two layouts are read: a page CSV as written by the text-extraction
//! stage (`pdf,page_num,pagetxt,exclude`), and a directory of `.txt`
//! files with one document per file and pages separated by form feeds.

use std::{collections::HashMap, io::Read, path::Path};

use arretes_document_models::Page;
use serde::Deserialize;

use crate::{Document, PipelineError};

/// Separator between pages in text files.
pub const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Deserialize)]
struct PageRow {
    pdf: String,
    page_num: u32,
    #[serde(default)]
    pagetxt: Option<String>,
    #[serde(default)]
    exclude: Option<String>,
}

/// Reads pages from a CSV with columns `pdf,page_num,pagetxt,exclude`.
///
/// An empty `pagetxt` means text extraction failed for that page.
///
/// # Errors
///
/// Returns an error if the CSV is malformed.
pub fn read_pages_csv(reader: impl Read) -> Result<Vec<Page>, PipelineError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut pages = Vec::new();
    for row in csv.deserialize() {
        let row: PageRow = row?;
        pages.push(Page {
            document_id: row.pdf,
            page_number: row.page_num,
            raw_text: row.pagetxt.filter(|t| !t.trim().is_empty()),
            exclude: row.exclude.as_deref().is_some_and(is_truthy),
        });
    }
    Ok(pages)
}

/// Reads a page CSV from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed.
pub fn read_pages_file(path: &Path) -> Result<Vec<Page>, PipelineError> {
    log::info!("Reading pages from {}", path.display());
    let file = std::fs::File::open(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_pages_csv(file)
}

/// Groups pages by source document, in order of first appearance.
#[must_use]
pub fn group_documents(pages: Vec<Page>) -> Vec<Document> {
    let mut documents: Vec<Document> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for page in pages {
        let slot = *index.entry(page.document_id.clone()).or_insert_with(|| {
            documents.push(Document {
                id: page.document_id.clone(),
                pages: Vec::new(),
            });
            documents.len() - 1
        });
        documents[slot].pages.push(page);
    }
    for document in &mut documents {
        document.pages.sort_by_key(|p| p.page_number);
    }
    documents
}

/// Splits the text of one document into pages on form feeds.
///
/// A trailing form feed does not open an empty last page.
#[must_use]
pub fn split_pages(document_id: &str, text: &str) -> Vec<Page> {
    let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
    text.split(PAGE_BREAK)
        .zip(1..)
        .map(|(page, number)| {
            if page.trim().is_empty() {
                Page::without_text(document_id, number)
            } else {
                Page::new(document_id, number, page)
            }
        })
        .collect()
}

/// Reads every `.txt` file of `dir` as one document, sorted by name.
///
/// The document id is the file stem with a `.pdf` extension, matching the
/// ids of the page CSV.
///
/// # Errors
///
/// Returns an error if the directory or one of its files cannot be read.
pub fn read_text_dir(dir: &Path) -> Result<Vec<Document>, PipelineError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("txt")) {
            paths.push(path);
        }
    }
    paths.sort();
    log::info!("Reading {} text files from {}", paths.len(), dir.display());

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            log::warn!("Skipping {}: file name is not UTF-8", path.display());
            continue;
        };
        let id = format!("{stem}.pdf");
        let text = std::fs::read_to_string(&path).map_err(io_error(&path))?;
        let pages = split_pages(&id, &text);
        documents.push(Document { id, pages });
    }
    Ok(documents)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError {
    let path = path.display().to_string();
    move |source| PipelineError::Io { path, source }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "vrai" | "yes" | "oui"
    )
}
