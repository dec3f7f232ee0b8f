//! Retry wrapper for Google API requests.

use std::time::Duration;

use crate::SheetsError;

const MAX_RETRIES: u32 = 5;
const BODY_PREVIEW_LEN: usize = 500;

/// Sends a request built by `build_request`, retrying transient failures
/// (timeouts, connection errors, HTTP 429, HTTP 5xx) with exponential
/// backoff, and decodes the response body as JSON.
///
/// Error statuses that are not retryable become [`SheetsError::Api`] with
/// the message from the API error envelope.
#[allow(clippy::future_not_send)]
pub(crate) async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SheetsError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let response = match build_request().send().await {
            Ok(response) => response,
            Err(e) => {
                if is_transient(&e) && attempt < MAX_RETRIES {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(SheetsError::Http(e));
            }
        };

        let status = response.status();
        if (status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
            && attempt < MAX_RETRIES
        {
            log::warn!("  HTTP {status} from Google API");
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body = response.text().await?;
        return Ok(serde_json::from_str(&body)?);
    }

    unreachable!("request retry loop exited without returning")
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}

/// Pulls the human message out of a Google error envelope
/// (`{"error": {"message": ...}}`), falling back to a body preview.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.len() > BODY_PREVIEW_LEN {
                format!("{}...", &body[..BODY_PREVIEW_LEN])
            } else {
                body.to_string()
            }
        })
}
