#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers for the `arretes` binary.
//!
//! Provides an `indicatif` progress bar behind the pipeline's
//! [`BatchProgress`] trait, plus [`init_logger`] which sets up
//! `indicatif-log-bridge` so that `log::warn!` lines emitted while a batch
//! runs are printed above the bar instead of through it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arretes_pipeline::progress::{BatchProgress, BatchSummary, DocumentOutcome};
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` [`ProgressBar`] that implements [`BatchProgress`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Style to switch to once the batch size is known.
    bar_style: ProgressStyle,
    failures: AtomicUsize,
}

impl IndicatifProgress {
    /// Creates a bar counting documents. It starts as a spinner and
    /// becomes a bar with percentage/ETA once the batch starts.
    #[must_use]
    pub fn documents_bar(multi: &MultiProgress, message: &str) -> Arc<dyn BatchProgress> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let bar_style = ProgressStyle::with_template(
            "  {wide_bar:.cyan/dim} {pos}/{len} {percent}% [{eta}] {prefix:.red} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Arc::new(Self::new(bar, bar_style))
    }

    fn new(bar: ProgressBar, bar_style: ProgressStyle) -> Self {
        Self {
            bar,
            bar_style,
            failures: AtomicUsize::new(0),
        }
    }
}

impl BatchProgress for IndicatifProgress {
    fn batch_started(&self, documents: usize) {
        self.bar.set_length(documents as u64);
        self.bar.set_position(0);
        self.bar.set_style(self.bar_style.clone());
    }

    fn document_started(&self, id: &str) {
        self.bar.set_message(id.to_string());
    }

    fn document_finished(&self, outcome: DocumentOutcome) {
        if outcome == DocumentOutcome::Failed {
            let failures = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
            self.bar.set_prefix(format!("{failures} failed"));
        }
        self.bar.inc(1);
    }

    fn batch_finished(&self, summary: &BatchSummary) {
        self.bar.finish_with_message(summary.to_string());
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge`.
///
/// The filter is read from `RUST_LOG`. Returns the [`MultiProgress`] that
/// progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Fails when a logger is already installed, as in tests.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_counts_documents() {
        let bar = ProgressBar::hidden();
        let progress = IndicatifProgress::new(bar.clone(), ProgressStyle::default_bar());
        progress.batch_started(3);
        progress.document_started("a.pdf");
        progress.document_finished(DocumentOutcome::Parsed);
        progress.document_started("b.pdf");
        progress.document_finished(DocumentOutcome::Failed);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "b.pdf");
        assert_eq!(bar.prefix(), "1 failed");
        progress.batch_finished(&BatchSummary {
            documents: 2,
            failures: 1,
            skipped: 0,
        });
        assert!(bar.is_finished());
        assert_eq!(bar.message(), "2 documents, 1 parse failures, 0 skipped");
    }

    #[test]
    fn documents_bar_on_hidden_target() {
        let multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let progress = IndicatifProgress::documents_bar(&multi, "Loading");
        progress.batch_started(1);
        progress.document_finished(DocumentOutcome::Skipped);
        progress.batch_finished(&BatchSummary::default());
    }
}
