#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Borrower record and loan facility types shared across the dbr-sheet
//! system, plus the product/term code classifiers applied when a record is
//! projected into the spreadsheet template.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel written into identity fields that never matched in the source
/// text.
pub const NOT_PROVIDED: &str = "[[ NOT PROVIDED ]]";

/// One borrower extracted from a credit bureau report.
///
/// Constructed fresh per parse call and never mutated afterwards. Serializes
/// to camelCase JSON so records can be snapshotted and compared across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerRecord {
    /// Borrower's full name, or [`NOT_PROVIDED`] if absent from the text.
    pub name: String,
    /// National identity number in `DDDDD-DDDDDDD-D` form, or [`NOT_PROVIDED`].
    pub cnic: String,
    /// Date of birth in `DD/MM/YYYY` form, or [`NOT_PROVIDED`].
    pub date_of_birth: String,
    /// Loan facilities in order of appearance in the source text.
    pub loans: Vec<LoanFacility>,
}

impl Default for BorrowerRecord {
    fn default() -> Self {
        Self {
            name: NOT_PROVIDED.to_string(),
            cnic: NOT_PROVIDED.to_string(),
            date_of_birth: NOT_PROVIDED.to_string(),
            loans: Vec::new(),
        }
    }
}

impl BorrowerRecord {
    /// Returns the borrower's age in whole years as of the given date.
    ///
    /// `None` when `date_of_birth` is the sentinel, is not a valid
    /// `DD/MM/YYYY` calendar date, or lies after `on`.
    #[must_use]
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        let dob = NaiveDate::parse_from_str(&self.date_of_birth, "%d/%m/%Y").ok()?;
        if on < dob {
            return None;
        }
        let mut years = on.year() - dob.year();
        if (on.month(), on.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// One credit line or obligation reported for a borrower.
///
/// Numeric fields default to 0 and date fields to the empty string when the
/// corresponding label never appears in the facility's block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanFacility {
    /// Free text following the leading `N -` index marker on the facility
    /// header line.
    pub bank_name: String,
    /// Sanctioned loan limit, thousands separators stripped.
    pub limit: u64,
    /// Outstanding balance.
    pub outstanding: u64,
    /// Minimum amount due.
    pub minimum_due: u64,
    /// Times the facility was past due by at least 30 days.
    pub overdue_30: u32,
    /// Times past due by at least 60 days.
    pub overdue_60: u32,
    /// Times past due by at least 90 days.
    pub overdue_90: u32,
    /// Facility date in `DD/MM/YYYY` form, empty if absent.
    pub start_date: String,
    /// Maturity date in `DD/MM/YYYY` form, empty if absent.
    pub end_date: String,
}

impl LoanFacility {
    /// Classifies this facility's product from its bank name.
    #[must_use]
    pub fn product_code(&self) -> ProductCode {
        ProductCode::classify(&self.bank_name)
    }

    /// Classifies this facility's term structure from its bank name.
    #[must_use]
    pub fn term_code(&self) -> TermCode {
        TermCode::classify(&self.bank_name)
    }
}

/// Product classification for a loan facility, keyed off keywords in the
/// facility's bank name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCode {
    /// Credit card (code 8)
    CreditCard,
    /// Auto loan or lease, including ijara financing (code 2)
    AutoOrLease,
    /// Personal loan, consumer finance, or microfinance (code 6)
    PersonalLoan,
    /// Running finance, overdraft, or cash line (code 34)
    RunningFinance,
    /// No keyword matched; the raw bank name is passed through to the sheet
    Unclassified,
}

impl ProductCode {
    /// Classifies a bank name by lower-cased substring tests, first match
    /// wins. "card" is tested before the auto group so that `Card` never
    /// falls into the `car` bucket.
    #[must_use]
    pub fn classify(bank_name: &str) -> Self {
        let name = bank_name.to_lowercase();
        if name.contains("card") {
            Self::CreditCard
        } else if ["auto", "car", "lease", "ijara"]
            .iter()
            .any(|k| name.contains(k))
        {
            Self::AutoOrLease
        } else if ["personal", "finance", "micro"]
            .iter()
            .any(|k| name.contains(k))
        {
            Self::PersonalLoan
        } else if ["running", "od", "cash line"]
            .iter()
            .any(|k| name.contains(k))
        {
            Self::RunningFinance
        } else {
            Self::Unclassified
        }
    }

    /// Returns the numeric product code, or `None` for [`Self::Unclassified`].
    #[must_use]
    pub const fn value(self) -> Option<u8> {
        match self {
            Self::CreditCard => Some(8),
            Self::AutoOrLease => Some(2),
            Self::PersonalLoan => Some(6),
            Self::RunningFinance => Some(34),
            Self::Unclassified => None,
        }
    }

    /// Returns the value written into the product-code column: the numeric
    /// code, or the original bank name string unchanged when unclassified.
    #[must_use]
    pub fn cell_value(self, bank_name: &str) -> Value {
        self.value().map_or_else(
            || Value::String(bank_name.to_string()),
            |code| Value::Number(code.into()),
        )
    }
}

/// Term structure classification for a loan facility.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TermCode {
    /// Revolving facility with no fixed maturity (cards, running finance)
    Evergreen,
    /// Installment facility with a fixed maturity
    Term,
}

impl TermCode {
    /// Classifies a bank name: revolving products are evergreen, everything
    /// else is a term facility.
    #[must_use]
    pub fn classify(bank_name: &str) -> Self {
        let name = bank_name.to_lowercase();
        if ["card", "running", "cash line"]
            .iter()
            .any(|k| name.contains(k))
        {
            Self::Evergreen
        } else {
            Self::Term
        }
    }

    /// Returns the single-letter code written into the term-code column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Evergreen => "E",
            Self::Term => "T",
        }
    }
}
