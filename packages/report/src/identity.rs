//! Identity-field extraction from the report's personal-information block.

use dbr_sheet_report_models::BorrowerRecord;
use regex::Regex;

/// Extracts the borrower identity fields from the full report text.
///
/// Fields that never match keep the sentinel from
/// [`BorrowerRecord::default`]. The returned record has no loans; facility
/// segmentation is a separate pass.
#[must_use]
pub fn extract_identity(text: &str) -> BorrowerRecord {
    let mut record = BorrowerRecord::default();

    // The name runs up to the next "Father"/"Gender"/"CNIC" marker past a
    // whitespace gap, or to the end of the text. A name line followed by
    // unrelated text has no terminator and is left unmatched.
    let name_re = Regex::new(r"(?i)Name:\s*(.*?)(?:\s+(?:Father|Gender|CNIC)|\n?$)")
        .unwrap_or_else(|_| unreachable!());
    if let Some(caps) = name_re.captures(text) {
        let clean = caps[1].trim();
        if !clean.is_empty() {
            record.name = clean.to_string();
        }
    }

    let cnic_re = Regex::new(r"\d{5}-\d{7}-\d").unwrap_or_else(|_| unreachable!());
    if let Some(m) = cnic_re.find(text) {
        record.cnic = m.as_str().to_string();
    }

    let dob_re =
        Regex::new(r"Date of Birth:\s*(\d{2}/\d{2}/\d{4})").unwrap_or_else(|_| unreachable!());
    if let Some(caps) = dob_re.captures(text) {
        record.date_of_birth = caps[1].to_string();
    }

    record
}

#[cfg(test)]
mod tests {
    use dbr_sheet_report_models::NOT_PROVIDED;

    use super::*;

    #[test]
    fn name_stops_before_gender_marker() {
        let record = extract_identity("Name: John Smith Gender: Male");
        assert_eq!(record.name, "John Smith");
    }

    #[test]
    fn name_stops_before_father_marker_on_next_line() {
        let record = extract_identity("Name: Jane Doe\nFather Name: Richard Doe");
        assert_eq!(record.name, "Jane Doe");
    }

    #[test]
    fn name_matching_is_case_insensitive() {
        let record = extract_identity("NAME: ALI RAZA FATHER NAME: HASSAN RAZA");
        assert_eq!(record.name, "ALI RAZA");
    }

    #[test]
    fn name_at_end_of_text_matches() {
        let record = extract_identity("Report for\nName: Jane Doe\n");
        assert_eq!(record.name, "Jane Doe");
    }

    #[test]
    fn name_without_terminator_mid_text_stays_sentinel() {
        // No Father/Gender/CNIC marker follows and the text continues, so
        // the match has nowhere to stop
        let record = extract_identity("Name: Jane Doe\nAddress: 12 Main St\nMore text");
        assert_eq!(record.name, NOT_PROVIDED);
    }

    #[test]
    fn empty_name_keeps_sentinel() {
        let record = extract_identity("Name:\n");
        assert_eq!(record.name, NOT_PROVIDED);

        let record = extract_identity("Report ends with Name:   ");
        assert_eq!(record.name, NOT_PROVIDED);
    }

    #[test]
    fn first_cnic_in_text_wins() {
        let record = extract_identity("CNIC: 12345-1234567-1\nGuarantor: 99999-9999999-9");
        assert_eq!(record.cnic, "12345-1234567-1");
    }

    #[test]
    fn extracts_date_of_birth_token() {
        let record = extract_identity("Date of Birth: 01/01/1990 Place of Birth: Lahore");
        assert_eq!(record.date_of_birth, "01/01/1990");
    }

    #[test]
    fn date_of_birth_label_is_case_sensitive() {
        let record = extract_identity("date of birth: 01/01/1990");
        assert_eq!(record.date_of_birth, NOT_PROVIDED);
    }

    #[test]
    fn falls_back_to_sentinels_when_nothing_matches() {
        let record = extract_identity("Completely unrelated text");
        assert_eq!(record.name, NOT_PROVIDED);
        assert_eq!(record.cnic, NOT_PROVIDED);
        assert_eq!(record.date_of_birth, NOT_PROVIDED);
        assert!(record.loans.is_empty());
    }
}
