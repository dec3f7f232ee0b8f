//! Loan-facility segmentation over the report's line stream.
//!
//! A single forward pass over trimmed lines drives a small state machine:
//! one open-facility slot plus a flag marking an open "SUMMARY OF OVERDUES"
//! capture window. A facility header line finalizes the previous facility
//! and opens the next; labeled lines write into the open one. The label
//! tests are not exclusive with the header test, so a label sharing the
//! header line applies to the facility that line just opened.

use dbr_sheet_report_models::LoanFacility;
use regex::Regex;

/// Segments `text` into loan facilities, in order of appearance.
///
/// Lines before the first facility header are ignored. Field labels write
/// into the open facility with last-write-wins semantics; values that fail
/// to parse (a lone comma matching the amount run) leave the field at its
/// prior value.
#[must_use]
pub fn extract_facilities(text: &str) -> Vec<LoanFacility> {
    // Header: "1- BANK NAME". The digits-hyphen-digits shape is table
    // noise, not a header.
    let header_re = Regex::new(r"^\d+\s?-\s?[A-Za-z]").unwrap_or_else(|_| unreachable!());
    let noise_re = Regex::new(r"^\d+\s?-\s?\d+$").unwrap_or_else(|_| unreachable!());
    let amount_re = Regex::new(r"[\d,]+").unwrap_or_else(|_| unreachable!());
    let date_re = Regex::new(r"\d{2}/\d{2}/\d{4}").unwrap_or_else(|_| unreachable!());
    let digits_re = Regex::new(r"\d+").unwrap_or_else(|_| unreachable!());

    let mut facilities = Vec::new();
    let mut current: Option<LoanFacility> = None;
    let mut capture_overdues = false;

    for raw in text.split('\n') {
        let line = raw.trim();

        if header_re.is_match(line) && !noise_re.is_match(line) {
            if let Some(done) = current.take() {
                facilities.push(done);
            }

            let bank_name = line.split_once('-').map_or(line, |(_, rest)| rest.trim());
            current = Some(LoanFacility {
                bank_name: bank_name.to_string(),
                ..LoanFacility::default()
            });
            capture_overdues = false;
        }

        if let Some(facility) = current.as_mut() {
            if line.contains("Loan Limit:")
                && let Some(value) = amount_after(line, "Limit:", &amount_re)
            {
                facility.limit = value;
            }
            if line.contains("Outstanding Balance:")
                && let Some(value) = amount_after(line, "Balance:", &amount_re)
            {
                facility.outstanding = value;
            }
            if line.contains("Min Amount Due:")
                && let Some(value) = amount_after(line, "Due:", &amount_re)
            {
                facility.minimum_due = value;
            }

            if line.contains("Facility Date:")
                && let Some(date) = date_after(line, "Facility Date:", &date_re)
            {
                facility.start_date = date;
            }
            if line.contains("Maturity Date:")
                && let Some(date) = date_after(line, "Maturity Date:", &date_re)
            {
                facility.end_date = date;
            }

            if line.contains("SUMMARY OF OVERDUES") {
                capture_overdues = true;
            }
            if capture_overdues && line.starts_with("Times") {
                let counts: Vec<u32> = digits_re
                    .find_iter(line)
                    .filter_map(|m| m.as_str().parse().ok())
                    .collect();
                if counts.len() >= 3 {
                    facility.overdue_30 = counts[0];
                    facility.overdue_60 = counts[1];
                    facility.overdue_90 = counts[2];
                }
                // A "Times" row always ends the capture window, even when
                // it yielded fewer than three numbers
                capture_overdues = false;
            }
        }
    }

    if let Some(done) = current {
        facilities.push(done);
    }

    facilities
}

/// First digits-and-commas run after the last occurrence of `label`,
/// commas stripped. `None` when the run fails to parse.
fn amount_after(line: &str, label: &str, amount_re: &Regex) -> Option<u64> {
    let (_, after) = line.rsplit_once(label)?;
    let run = amount_re.find(after)?;
    run.as_str().replace(',', "").parse().ok()
}

/// First `DD/MM/YYYY` token after the last occurrence of `label`.
fn date_after(line: &str, label: &str, date_re: &Regex) -> Option<String> {
    let (_, after) = line.rsplit_once(label)?;
    Some(date_re.find(after)?.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_line_opens_new_facility() {
        let facilities = extract_facilities("1- ABC Bank\n");
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].bank_name, "ABC Bank");
    }

    #[test]
    fn header_tolerates_spaces_around_hyphen() {
        let facilities = extract_facilities("12 - Habib Bank\n");
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].bank_name, "Habib Bank");
    }

    #[test]
    fn digits_hyphen_digits_is_noise() {
        assert!(extract_facilities("123-456\n").is_empty());
        assert!(extract_facilities("12 - 34\n").is_empty());
    }

    #[test]
    fn bank_name_is_text_after_first_hyphen() {
        let facilities = extract_facilities("1- Habib Bank - Main Branch\n");
        assert_eq!(facilities[0].bank_name, "Habib Bank - Main Branch");
    }

    #[test]
    fn facilities_keep_source_order() {
        let text = "1- First Bank\n2- Second Bank\n3- Third Bank\n";
        let names: Vec<String> = extract_facilities(text)
            .into_iter()
            .map(|f| f.bank_name)
            .collect();
        assert_eq!(names, ["First Bank", "Second Bank", "Third Bank"]);
    }

    #[test]
    fn labels_before_first_header_are_ignored() {
        let text = "Loan Limit: 9,999\n1- ABC Bank\n";
        let facilities = extract_facilities(text);
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].limit, 0);
    }

    #[test]
    fn label_on_header_line_applies_to_new_facility() {
        let facilities = extract_facilities("1- ABC Bank Loan Limit: 5,000\n");
        assert_eq!(facilities[0].limit, 5_000);
    }

    #[test]
    fn amounts_strip_thousands_separators() {
        let text = "1- ABC Bank\nLoan Limit: 1,250,000\nOutstanding Balance: 900,000\nMin Amount Due: 12,500\n";
        let facility = &extract_facilities(text)[0];
        assert_eq!(facility.limit, 1_250_000);
        assert_eq!(facility.outstanding, 900_000);
        assert_eq!(facility.minimum_due, 12_500);
    }

    #[test]
    fn repeated_label_last_write_wins() {
        let text = "1- ABC Bank\nLoan Limit: 100\nLoan Limit: 200\n";
        assert_eq!(extract_facilities(text)[0].limit, 200);
    }

    #[test]
    fn unparseable_amount_run_keeps_prior_value() {
        let text = "1- ABC Bank\nLoan Limit: 100\nLoan Limit: ,\n";
        assert_eq!(extract_facilities(text)[0].limit, 100);
    }

    #[test]
    fn extracts_facility_and_maturity_dates() {
        let text = "1- ABC Bank\nFacility Date: 01/01/2020\nMaturity Date: 01/01/2025\n";
        let facility = &extract_facilities(text)[0];
        assert_eq!(facility.start_date, "01/01/2020");
        assert_eq!(facility.end_date, "01/01/2025");
    }

    #[test]
    fn date_without_valid_token_stays_empty() {
        let text = "1- ABC Bank\nFacility Date: pending\n";
        assert_eq!(extract_facilities(text)[0].start_date, "");
    }

    #[test]
    fn overdue_row_fills_three_buckets() {
        let text = "1- ABC Bank\nSUMMARY OF OVERDUES\nTimes 2 1 0\n";
        let facility = &extract_facilities(text)[0];
        assert_eq!(facility.overdue_30, 2);
        assert_eq!(facility.overdue_60, 1);
        assert_eq!(facility.overdue_90, 0);
    }

    #[test]
    fn times_row_without_open_capture_is_ignored() {
        let text = "1- ABC Bank\nTimes 2 1 0\n";
        let facility = &extract_facilities(text)[0];
        assert_eq!(facility.overdue_30, 0);
    }

    #[test]
    fn bare_times_row_closes_capture() {
        let text = "1- ABC Bank\nSUMMARY OF OVERDUES\nTimes\nTimes 9 9 9\n";
        let facility = &extract_facilities(text)[0];
        assert_eq!(facility.overdue_30, 0);
        assert_eq!(facility.overdue_60, 0);
        assert_eq!(facility.overdue_90, 0);
    }

    #[test]
    fn header_resets_overdue_capture() {
        let text = "1- ABC Bank\nSUMMARY OF OVERDUES\n2- XYZ Bank\nTimes 5 5 5\n";
        let facilities = extract_facilities(text);
        assert_eq!(facilities[0].overdue_30, 0);
        assert_eq!(facilities[1].overdue_30, 0);
    }

    #[test]
    fn capture_window_skips_intervening_rows() {
        let text = "1- ABC Bank\nSUMMARY OF OVERDUES\n30+ 60+ 90+\nTimes 1 2 3\n";
        let facility = &extract_facilities(text)[0];
        assert_eq!(facility.overdue_30, 1);
        assert_eq!(facility.overdue_60, 2);
        assert_eq!(facility.overdue_90, 3);
    }

    #[test]
    fn unlabeled_facility_keeps_defaults() {
        let facility = &extract_facilities("1- ABC Bank\n")[0];
        assert_eq!(facility.limit, 0);
        assert_eq!(facility.outstanding, 0);
        assert_eq!(facility.minimum_due, 0);
        assert_eq!(facility.start_date, "");
        assert_eq!(facility.end_date, "");
    }
}
