//! Report download helpers.
//!
//! Wraps `reqwest` with the retry policy the rest of the system assumes:
//! transient failures (timeouts, connection resets, HTTP 429, HTTP 5xx)
//! are retried with exponential backoff, other client errors are
//! permanent.

use std::time::Duration;

use crate::PdfError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (2s, 4s, 8s, 16s, 32s) the total wait before
/// giving up is 62 seconds.
const MAX_RETRIES: u32 = 5;

/// Downloads a report PDF from `url` and returns its raw bytes.
///
/// The client is passed in so callers control timeouts and connection
/// reuse; this function only owns the retry policy.
///
/// # Errors
///
/// Returns [`PdfError::Http`] if the request still fails after all
/// retries or the server answers with a non-retryable error status.
#[allow(clippy::future_not_send)]
pub async fn download_report(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, PdfError> {
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match client.get(url).send().await {
            Err(e) => {
                if is_transient(&e) && attempt < MAX_RETRIES {
                    log::warn!("  transient error downloading {url}: {e}");
                    continue;
                }
                return Err(PdfError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if (status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
                    && attempt < MAX_RETRIES
                {
                    log::warn!("  HTTP {status} downloading {url}");
                    continue;
                }

                let response = response.error_for_status()?;
                let bytes = response.bytes().await?;

                log::debug!("Downloaded {} bytes from {url}", bytes.len());

                return Ok(bytes.to_vec());
            }
        }
    }

    unreachable!("download retry loop exited without returning")
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
