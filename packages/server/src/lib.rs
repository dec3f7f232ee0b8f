#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the DBR sheet filler.
//!
//! Accepts credit report PDFs as raw request bodies, parses them into
//! borrower records, and (on the process endpoint) copies the master DBR
//! template and writes the projected cells through the Sheets adapter.
//! The parser itself never fails; extraction and sheet-write failures map
//! to HTTP error statuses in the handlers.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

/// Upload cap for report PDFs. Bureau reports run to a few MB.
const MAX_PDF_BYTES: usize = 25 * 1024 * 1024;

/// Starts the DBR sheet API server.
///
/// Binds to `BIND_ADDR`/`PORT` (default `127.0.0.1:8080`). The Sheets
/// environment is read per process request, so the server starts fine
/// without it; only `/api/process` requires it. This is a regular async
/// function — the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::PayloadConfig::new(MAX_PDF_BYTES))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/parse", web::post().to(handlers::parse))
                    .route("/process", web::post().to(handlers::process)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
