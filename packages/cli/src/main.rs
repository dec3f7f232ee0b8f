#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for the DBR sheet toolchain.
//!
//! Parses credit report PDFs into borrower records and fills copies of the
//! master DBR template through the Sheets adapter. Handles single files,
//! whole directories, and a polling watch mode; `serve` runs the HTTP API.
//!
//! Uses `indicatif-log-bridge` (via [`progress::init_logger`]) to route
//! `log` output through `indicatif::MultiProgress` so that log lines and
//! progress bars never fight for the terminal.

mod pipeline;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dbr_sheet_cli", about = "DBR sheet filler toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a credit report PDF and print the borrower record as JSON
    Parse {
        /// Path to the PDF file
        file: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write the record to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Parse a PDF, copy the master template, and fill the sheet
    Fill {
        /// Path to the PDF file
        file: PathBuf,
        /// Print the projected cell updates as JSON instead of writing
        #[arg(long)]
        dry_run: bool,
        /// Skip the confirmation prompt before the remote write
        #[arg(long)]
        yes: bool,
    },
    /// Parse every PDF in a directory, writing a JSON record next to each
    Batch {
        /// Directory containing report PDFs
        dir: PathBuf,
        /// Pretty-print the JSON output files
        #[arg(long)]
        pretty: bool,
    },
    /// Watch a directory and process report PDFs as they appear
    Watch {
        /// Directory to poll for new PDFs
        dir: PathBuf,
        /// Poll interval in seconds
        #[arg(long, default_value = "30")]
        interval_secs: u64,
        /// Fill a sheet for each new PDF instead of writing JSON records
        #[arg(long)]
        fill: bool,
    },
    /// Run the HTTP API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Serve) {
        // The server installs its own logger and uses actix-web's runtime,
        // so it runs before the log bridge is set up, in a blocking task to
        // avoid nesting tokio runtimes.
        tokio::task::spawn_blocking(|| {
            actix_web::rt::System::new().block_on(dbr_sheet_server::run_server())
        })
        .await??;
        return Ok(());
    }

    let multi = progress::init_logger();

    match cli.command {
        Commands::Parse { file, pretty, out } => {
            pipeline::parse(&file, pretty, out.as_deref())?;
        }
        Commands::Fill { file, dry_run, yes } => {
            pipeline::fill(&file, dry_run, yes).await?;
        }
        Commands::Batch { dir, pretty } => {
            pipeline::batch(&multi, &dir, pretty)?;
        }
        Commands::Watch {
            dir,
            interval_secs,
            fill,
        } => {
            pipeline::watch(&multi, &dir, interval_secs, fill).await?;
        }
        Commands::Serve => {} // Handled above.
    }

    Ok(())
}
