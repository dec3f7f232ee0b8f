//! HTTP handler functions for the DBR sheet API.

use actix_web::{HttpResponse, web};
use dbr_sheet_gsheets::{SheetsClient, SheetsError, spreadsheet_url};
use dbr_sheet_report::parse_report;
use dbr_sheet_report_models::BorrowerRecord;
use dbr_sheet_server_models::{ApiHealth, ApiParseResponse, ApiProcessResponse};
use dbr_sheet_template::{TemplateLayout, project_borrower, spreadsheet_title};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/parse`
///
/// Body is the raw PDF bytes. Responds with the parsed borrower record
/// plus the derived age, loan count, and per-loan template codes.
pub async fn parse(body: web::Bytes) -> HttpResponse {
    let record = match parse_body(&body) {
        Ok(record) => record,
        Err(response) => return *response,
    };

    HttpResponse::Ok().json(ApiParseResponse::from_record(record))
}

/// `POST /api/process`
///
/// Body is the raw PDF bytes. Parses the report, copies the master DBR
/// template under the borrower's name, and writes the projected cells.
/// Responds with the URL of the filled sheet.
pub async fn process(body: web::Bytes) -> HttpResponse {
    let client = match SheetsClient::from_env() {
        Ok(client) => client,
        Err(e @ SheetsError::MissingEnv { .. }) => {
            log::error!("Sheets environment not configured: {e}");
            return HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": format!("Sheets environment not configured: {e}")
            }));
        }
        Err(e) => {
            log::error!("Failed to build Sheets client: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to build Sheets client"
            }));
        }
    };

    let record = match parse_body(&body) {
        Ok(record) => record,
        Err(response) => return *response,
    };

    let title = spreadsheet_title(&record);
    let updates = project_borrower(&record, &TemplateLayout::default());

    let spreadsheet_id = match client.copy_template(&title).await {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to copy master template: {e}");
            return HttpResponse::BadGateway().json(serde_json::json!({
                "error": format!("Failed to copy master template: {e}")
            }));
        }
    };

    if let Err(e) = client.batch_update(&spreadsheet_id, &updates).await {
        log::error!("Failed to write cells to {spreadsheet_id}: {e}");
        return HttpResponse::BadGateway().json(serde_json::json!({
            "error": format!("Failed to write cells: {e}")
        }));
    }

    HttpResponse::Ok().json(ApiProcessResponse {
        status: "success".to_string(),
        sheet_url: spreadsheet_url(&spreadsheet_id),
    })
}

/// Extracts and parses a report from raw PDF bytes.
///
/// Extraction failure becomes a `400` response; the parse itself cannot
/// fail. A report with zero facilities is a valid record and only logged.
fn parse_body(body: &[u8]) -> Result<BorrowerRecord, Box<HttpResponse>> {
    let text = match dbr_sheet_pdf::extract_report_text(body) {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to extract PDF text: {e}");
            return Err(Box::new(HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Failed to extract PDF text: {e}")
            }))));
        }
    };

    let record = parse_report(&text);
    if record.loans.is_empty() {
        log::warn!("Report parsed with no loan facilities");
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use super::*;

    #[actix_web::test]
    async fn health_reports_healthy_with_package_version() {
        let app = test::init_service(
            App::new().route("/api/health", web::get().to(health)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn parse_rejects_bodies_that_are_not_pdfs() {
        let app = test::init_service(
            App::new().route("/api/parse", web::post().to(parse)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/parse")
            .set_payload("definitely not a pdf")
            .to_request();
        let response = test::call_service(&app, req).await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn process_without_sheets_environment_is_unavailable() {
        if std::env::var("GOOGLE_ACCESS_TOKEN").is_ok() {
            return;
        }

        let app = test::init_service(
            App::new().route("/api/process", web::post().to(process)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/process")
            .set_payload("ignored")
            .to_request();
        let response = test::call_service(&app, req).await;

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
