//! Concept code notation.
//!
//! Concepts are addressed on the command line as `SOURCE:CODE` (for example `CIEL:5089`), as a
//! bare code that implies [`DEFAULT_CONCEPT_SOURCE`], or directly by UUID.

use crate::constants::DEFAULT_CONCEPT_SOURCE;

/// Split `s` into `(source, code)` at the first `:`.
///
/// A missing or empty source falls back to [`DEFAULT_CONCEPT_SOURCE`].
///
/// ```
/// use omrs_core::concept::parse_source_and_code;
///
/// assert_eq!(parse_source_and_code("CIEL:5089"), ("CIEL", "5089"));
/// assert_eq!(parse_source_and_code("5089"), ("CIEL", "5089"));
/// assert_eq!(parse_source_and_code(":5089"), ("CIEL", "5089"));
/// ```
pub fn parse_source_and_code(s: &str) -> (&str, &str) {
    match s.split_once(':') {
        Some((source, code)) if !source.is_empty() => (source, code),
        Some((_, code)) => (DEFAULT_CONCEPT_SOURCE, code),
        None => (DEFAULT_CONCEPT_SOURCE, s),
    }
}
