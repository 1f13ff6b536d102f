#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Regex grammar library for French "arrêté de péril" documents.
//!
//! Each module exposes two layers:
//!
//! - **fragments**: plain `&str` constants or functions returning `String`,
//!   documenting the literal forms they match. Fragments are composed with
//!   `format!` and never compiled on their own.
//! - **matchers**: `static LazyLock<Regex>` values assembled from fragments
//!   and compiled exactly once, then shared read-only for the lifetime of
//!   the process.
//!
//! The `regex` crate runs in linear time, so no matcher can backtrack
//! catastrophically on OCR noise. It has no look-around either: wherever a
//! right boundary must stay unconsumed, the matcher captures it in a
//! trailing `stop` group and callers resume at `stop.start()`.

pub mod address;
pub mod cadastre;
pub mod classification;
pub mod codes;
pub mod commune;
pub mod dates;
pub mod entities;
pub mod structure;
pub mod templates;
pub mod text;

use regex::{Regex, RegexBuilder};

/// Compiled-size budget for the large composed grammars.
const SIZE_LIMIT: usize = 64 * (1 << 20);

/// Compiles a composed grammar.
///
/// Only called from `LazyLock` initialisers on patterns that are constant
/// at compile time.
pub(crate) fn build(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(SIZE_LIMIT)
        .build()
        .expect("valid regex")
}

/// Joins fragments into a non-capturing alternation.
#[must_use]
pub fn alternation(fragments: &[&str]) -> String {
    format!("(?:{})", fragments.join("|"))
}
