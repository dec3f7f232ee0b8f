#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the DBR sheet server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the parsed report types so the API contract can evolve without
//! touching the parser.

use chrono::Local;
use dbr_sheet_report_models::{BorrowerRecord, LoanFacility};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A loan facility as returned by the API, with the derived template codes
/// alongside the parsed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoan {
    /// Lender or facility name from the report header line.
    pub bank_name: String,
    /// Numeric product code, or the raw bank name when unclassified.
    pub product_code: serde_json::Value,
    /// Term code: `"E"` for evergreen, `"T"` for term.
    pub term_code: String,
    /// Sanctioned limit.
    pub limit: u64,
    /// Outstanding balance.
    pub outstanding: u64,
    /// Minimum amount due.
    pub minimum_due: u64,
    /// Payments 30+ days late.
    pub overdue_30: u32,
    /// Payments 60+ days late.
    pub overdue_60: u32,
    /// Payments 90+ days late.
    pub overdue_90: u32,
    /// Facility start date (`DD/MM/YYYY`, empty when absent).
    pub start_date: String,
    /// Facility maturity date (`DD/MM/YYYY`, empty when absent).
    pub end_date: String,
}

impl From<&LoanFacility> for ApiLoan {
    fn from(loan: &LoanFacility) -> Self {
        Self {
            bank_name: loan.bank_name.clone(),
            product_code: loan.product_code().cell_value(&loan.bank_name),
            term_code: loan.term_code().code().to_string(),
            limit: loan.limit,
            outstanding: loan.outstanding,
            minimum_due: loan.minimum_due,
            overdue_30: loan.overdue_30,
            overdue_60: loan.overdue_60,
            overdue_90: loan.overdue_90,
            start_date: loan.start_date.clone(),
            end_date: loan.end_date.clone(),
        }
    }
}

/// Response from the parse endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParseResponse {
    /// The parsed borrower record.
    pub record: BorrowerRecord,
    /// Borrower age in whole years, when the date of birth parsed.
    pub age: Option<u32>,
    /// Number of loan facilities found in the report.
    pub loan_count: usize,
    /// Per-facility view with the derived template codes.
    pub loans: Vec<ApiLoan>,
}

impl ApiParseResponse {
    /// Builds the response from a parsed record, deriving the age as of
    /// today and the template codes for each facility.
    #[must_use]
    pub fn from_record(record: BorrowerRecord) -> Self {
        let age = record.age_on(Local::now().date_naive());
        let loans = record.loans.iter().map(ApiLoan::from).collect();

        Self {
            age,
            loan_count: record.loans.len(),
            loans,
            record,
        }
    }
}

/// Response from the process endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProcessResponse {
    /// `"success"` when the sheet was created and filled.
    pub status: String,
    /// Browser URL of the filled spreadsheet.
    pub sheet_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_loan() -> LoanFacility {
        LoanFacility {
            bank_name: "ABC Bank Card".to_string(),
            limit: 50_000,
            outstanding: 10_000,
            minimum_due: 500,
            overdue_30: 1,
            ..LoanFacility::default()
        }
    }

    #[test]
    fn loan_view_carries_derived_codes() {
        let api = ApiLoan::from(&card_loan());

        assert_eq!(api.product_code, serde_json::json!(8));
        assert_eq!(api.term_code, "E");
        assert_eq!(api.limit, 50_000);
        assert_eq!(api.overdue_30, 1);
    }

    #[test]
    fn unclassified_loan_passes_bank_name_through() {
        let loan = LoanFacility {
            bank_name: "Some Cooperative".to_string(),
            ..LoanFacility::default()
        };

        let api = ApiLoan::from(&loan);

        assert_eq!(api.product_code, serde_json::json!("Some Cooperative"));
        assert_eq!(api.term_code, "T");
    }

    #[test]
    fn parse_response_counts_loans_and_keeps_the_record() {
        let record = BorrowerRecord {
            loans: vec![card_loan(), LoanFacility::default()],
            ..BorrowerRecord::default()
        };

        let response = ApiParseResponse::from_record(record);

        assert_eq!(response.loan_count, 2);
        assert_eq!(response.loans.len(), 2);
        assert_eq!(response.age, None);
        assert_eq!(response.record.loans.len(), 2);
    }
}
