#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Credit bureau report text parser.
//!
//! Consumes the full plain text extracted from one report PDF (pages
//! newline-joined in document order) and produces a [`BorrowerRecord`]:
//! identity fields matched once over the whole text, plus loan facilities
//! segmented by a line-oriented state machine.
//!
//! Parsing never fails. Missing or malformed fields keep their documented
//! defaults, and a record with zero loans is a valid result that callers
//! treat as "nothing extracted" rather than an error.
//!
//! The parser is a pure, synchronous, single pass with no shared state, so
//! independent documents can be parsed concurrently without coordination.

pub mod facility;
pub mod identity;

use dbr_sheet_report_models::{BorrowerRecord, NOT_PROVIDED};

/// Parses the full text of a credit bureau report into a [`BorrowerRecord`].
///
/// Best effort: identity fields that never match keep the
/// [`NOT_PROVIDED`] sentinel and `loans` may come back empty.
#[must_use]
pub fn parse_report(full_text: &str) -> BorrowerRecord {
    let mut record = identity::extract_identity(full_text);
    record.loans = facility::extract_facilities(full_text);

    log::debug!(
        "Parsed report: {} facilities, name present: {}",
        record.loans.len(),
        record.name != NOT_PROVIDED,
    );

    record
}
