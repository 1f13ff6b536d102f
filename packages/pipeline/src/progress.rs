//! Progress reporting for batch runs.
//!
//! [`BatchProgress`] keeps the batch loop independent of how progress is
//! rendered (a terminal bar, or nothing).

use std::{fmt, sync::Arc};

/// How one document of a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Parsed through to the end.
    Parsed,
    /// The structural parse stopped early or the engine panicked.
    Failed,
    /// Denylisted, never parsed.
    Skipped,
}

/// Counts reported when a batch ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents: usize,
    pub failures: usize,
    pub skipped: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} parse failures, {} skipped",
            self.documents, self.failures, self.skipped
        )
    }
}

/// Receives the document-level events of a batch run.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// [`Arc`].
pub trait BatchProgress: Send + Sync {
    /// The batch is about to process `documents` documents.
    fn batch_started(&self, documents: usize);

    /// Work on document `id` begins.
    fn document_started(&self, id: &str);

    /// The current document is done.
    fn document_finished(&self, outcome: DocumentOutcome);

    /// Every document is done.
    fn batch_finished(&self, summary: &BatchSummary);
}

/// A [`BatchProgress`] that ignores every event.
pub struct NullProgress;

impl BatchProgress for NullProgress {
    fn batch_started(&self, _documents: usize) {}
    fn document_started(&self, _id: &str) {}
    fn document_finished(&self, _outcome: DocumentOutcome) {}
    fn batch_finished(&self, _summary: &BatchSummary) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn BatchProgress> {
    Arc::new(NullProgress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line() {
        let summary = BatchSummary {
            documents: 3,
            failures: 1,
            skipped: 2,
        };
        assert_eq!(summary.to_string(), "3 documents, 1 parse failures, 2 skipped");
    }
}
