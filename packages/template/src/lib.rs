#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fixed-layout spreadsheet projection for borrower records.
//!
//! Maps a [`BorrowerRecord`] onto the cell coordinates of the master DBR
//! template's input tab: identity cells, a derived age formula, a handful
//! of fixed defaults, and one loan-grid row per facility. The output is a
//! list of [`CellUpdate`]s shaped like the entries of a Sheets
//! `values:batchUpdate` payload, so any writer can apply them.

use dbr_sheet_report_models::{BorrowerRecord, LoanFacility};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One contiguous cell-range assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    /// A1-style range without a sheet prefix (e.g. `C6` or `B19:M20`).
    pub range: String,
    /// Row-major cell values.
    pub values: Vec<Vec<Value>>,
}

impl CellUpdate {
    /// Creates an update assigning one value to one cell.
    #[must_use]
    pub fn single(range: &str, value: Value) -> Self {
        Self {
            range: range.to_string(),
            values: vec![vec![value]],
        }
    }
}

/// Cell coordinates of the master template's input tab.
///
/// The defaults match the observed master template; a relocated template
/// can construct its own layout.
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    /// Cell receiving the borrower name.
    pub name_cell: String,
    /// Cell receiving the CNIC.
    pub cnic_cell: String,
    /// Cell receiving the date of birth.
    pub date_of_birth_cell: String,
    /// Cell receiving the derived age formula.
    pub age_cell: String,
    /// Cells assigned a fixed value on every fill.
    pub fixed_cells: Vec<(String, Value)>,
    /// First row of the loan grid (columns B through M).
    pub loan_start_row: u32,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            name_cell: "C6".to_string(),
            cnic_cell: "C7".to_string(),
            date_of_birth_cell: "C8".to_string(),
            age_cell: "C9".to_string(),
            fixed_cells: vec![
                ("H7".to_string(), Value::Number(0.into())),
                ("H8".to_string(), Value::Number(0.into())),
                ("C12".to_string(), Value::String("[SELECT]".to_string())),
                ("C13".to_string(), Value::String("Salaried".to_string())),
            ],
            loan_start_row: 19,
        }
    }
}

impl TemplateLayout {
    /// In-sheet formula deriving the age in whole years from the
    /// date-of-birth cell, blank while that cell is empty.
    #[must_use]
    pub fn age_formula(&self) -> String {
        let dob = &self.date_of_birth_cell;
        format!("=IF({dob}<>\"\",DATEDIF({dob},TODAY(),\"Y\"),\"\")")
    }
}

/// Projects a borrower record onto the template layout.
///
/// Returns the ordered cell updates: identity cells, the age formula, the
/// fixed defaults, then a single `B{start}:M{end}` range holding one row
/// per facility. The grid update is omitted when the record has no loans.
#[must_use]
pub fn project_borrower(record: &BorrowerRecord, layout: &TemplateLayout) -> Vec<CellUpdate> {
    let mut updates = vec![
        CellUpdate::single(&layout.name_cell, Value::String(record.name.clone())),
        CellUpdate::single(&layout.cnic_cell, Value::String(record.cnic.clone())),
        CellUpdate::single(
            &layout.date_of_birth_cell,
            Value::String(record.date_of_birth.clone()),
        ),
        CellUpdate::single(&layout.age_cell, Value::String(layout.age_formula())),
    ];
    for (cell, value) in &layout.fixed_cells {
        updates.push(CellUpdate::single(cell, value.clone()));
    }

    let rows: Vec<Vec<Value>> = record.loans.iter().map(loan_row).collect();
    if !rows.is_empty() {
        #[allow(clippy::cast_possible_truncation)]
        let end_row = layout.loan_start_row + rows.len() as u32 - 1;
        updates.push(CellUpdate {
            range: format!("B{}:M{end_row}", layout.loan_start_row),
            values: rows,
        });
    }

    updates
}

/// Maps one facility to the loan grid's columns B through M.
fn loan_row(loan: &LoanFacility) -> Vec<Value> {
    vec![
        Value::String("N".to_string()),
        loan.product_code().cell_value(&loan.bank_name),
        Value::String(loan.term_code().code().to_string()),
        Value::Number(loan.limit.into()),
        Value::String(String::new()),
        Value::Number(loan.outstanding.into()),
        Value::Number(loan.minimum_due.into()),
        Value::Number(loan.overdue_30.into()),
        Value::Number(loan.overdue_60.into()),
        Value::Number(loan.overdue_90.into()),
        Value::String(loan.start_date.clone()),
        Value::String(loan.end_date.clone()),
    ]
}

/// Title for the per-borrower spreadsheet copy.
///
/// `DBR - ` plus the name with path separators replaced, or
/// `DBR - Unknown_Customer` when the name was never extracted.
#[must_use]
pub fn spreadsheet_title(record: &BorrowerRecord) -> String {
    let safe_name = record.name.replace('/', "_");
    if safe_name.contains("NOT PROVIDED") {
        "DBR - Unknown_Customer".to_string()
    } else {
        format!("DBR - {safe_name}")
    }
}
