//! Subcommand implementations for the DBR sheet CLI.
//!
//! Each function drives the extract -> parse -> project -> write flow for
//! one subcommand, with `indicatif` progress bars for the directory modes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use dbr_sheet_gsheets::{SheetsClient, spreadsheet_url};
use dbr_sheet_report::parse_report;
use dbr_sheet_report_models::BorrowerRecord;
use dbr_sheet_template::{TemplateLayout, project_borrower, spreadsheet_title};
use dialoguer::Confirm;
use indicatif::MultiProgress;

use crate::progress;

/// `parse` subcommand: extract and parse one PDF, then print the record as
/// JSON or write it to `out`.
pub fn parse(
    file: &Path,
    pretty: bool,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = parse_file(file)?;
    let json = to_json(&record, pretty)?;

    if let Some(out) = out {
        std::fs::write(out, &json)?;
        log::info!("Wrote {}", out.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

/// `fill` subcommand: parse a PDF, copy the master template, and write the
/// projected cells. `--dry-run` prints the cell updates instead of writing.
#[allow(clippy::future_not_send)]
pub async fn fill(file: &Path, dry_run: bool, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let record = parse_file(file)?;
    let updates = project_borrower(&record, &TemplateLayout::default());
    let title = spreadsheet_title(&record);

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&updates)?);
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Create '{title}' and write {} range(s)?",
                updates.len()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let client = SheetsClient::from_env()?;
    let spreadsheet_id = client.copy_template(&title).await?;
    client.batch_update(&spreadsheet_id, &updates).await?;

    println!("{}", spreadsheet_url(&spreadsheet_id));

    Ok(())
}

/// `batch` subcommand: parse every PDF in `dir`, writing a `.json` record
/// next to each.
pub fn batch(
    multi: &MultiProgress,
    dir: &Path,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = pdf_files(dir)?;
    if files.is_empty() {
        log::warn!("No PDF files in {}", dir.display());
        return Ok(());
    }

    let start = Instant::now();
    let bar = progress::files_bar(multi, files.len() as u64);
    let mut failed = 0usize;

    for file in &files {
        bar.set_message(
            file.file_name()
                .map_or_else(String::new, |name| name.to_string_lossy().into_owned()),
        );

        match process_to_json(file, pretty) {
            Ok(out) => log::info!("Wrote {}", out.display()),
            Err(e) => {
                failed += 1;
                log::error!("Failed to process {}: {e}", file.display());
            }
        }

        bar.inc(1);
    }

    bar.finish_with_message(format!("{} file(s), {failed} failed", files.len()));

    let elapsed = start.elapsed();
    log::info!(
        "Batch complete: {} file(s) in {:.1}s",
        files.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}

/// `watch` subcommand: poll `dir` every `interval_secs`, processing PDFs as
/// they appear. Already-seen paths are remembered for the life of the
/// process, so a processed file is not re-triggered by later polls.
#[allow(clippy::future_not_send)]
pub async fn watch(
    multi: &MultiProgress,
    dir: &Path,
    interval_secs: u64,
    fill_sheets: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_secs(interval_secs.max(1));
    let mut seen: HashSet<PathBuf> = HashSet::new();

    log::info!(
        "Watching {} every {}s (Ctrl-C to stop)",
        dir.display(),
        interval.as_secs()
    );

    let spinner = progress::watch_spinner(multi, &format!("Watching {}", dir.display()));

    loop {
        let files = match pdf_files(dir) {
            Ok(files) => files,
            Err(e) => {
                log::error!("Failed to read {}: {e}", dir.display());
                tokio::time::sleep(interval).await;
                continue;
            }
        };

        for file in files {
            if !seen.insert(file.clone()) {
                continue;
            }

            log::info!("New report: {}", file.display());
            let result = if fill_sheets {
                fill(&file, false, true).await
            } else {
                process_to_json(&file, false).map(|out| log::info!("Wrote {}", out.display()))
            };

            if let Err(e) = result {
                log::error!("Failed to process {}: {e}", file.display());
            }
        }

        spinner.set_message(format!(
            "Watching {} ({} file(s) seen)",
            dir.display(),
            seen.len()
        ));

        tokio::time::sleep(interval).await;
    }
}

/// Extracts and parses one report PDF.
fn parse_file(file: &Path) -> Result<BorrowerRecord, Box<dyn std::error::Error>> {
    log::info!("Parsing {}", file.display());

    let text = dbr_sheet_pdf::extract_report_text_from_file(file)?;
    let record = parse_report(&text);
    if record.loans.is_empty() {
        log::warn!("{}: no loan facilities found", file.display());
    }

    Ok(record)
}

/// Parses `file` and writes the record as JSON next to it, returning the
/// output path.
fn process_to_json(file: &Path, pretty: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let record = parse_file(file)?;
    let out = file.with_extension("json");
    std::fs::write(&out, to_json(&record, pretty)?)?;
    Ok(out)
}

fn to_json(record: &BorrowerRecord, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    }
}

/// Lists `*.pdf` files in `dir`, sorted for a stable processing order.
fn pdf_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_listing_filters_and_sorts() {
        let dir = std::env::temp_dir().join("dbr_sheet_cli_pdf_listing_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.pdf"), b"x").unwrap();
        std::fs::write(dir.join("a.PDF"), b"x").unwrap();
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();

        let files = pdf_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.PDF", "b.pdf"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn json_output_is_compact_unless_pretty() {
        let record = BorrowerRecord::default();

        let compact = to_json(&record, false).unwrap();
        let pretty = to_json(&record, true).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
    }
}
