//! Direct HTTP transport: probes, plain page fetches, streamed downloads

use crate::MirrorError;
use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;

/// Resolves a URL's redirect chain without transferring a body
///
/// Issues a HEAD request and lets the client follow redirects; the returned
/// URL is wherever the chain ended, regardless of the final status code.
/// The orchestrator enqueues this final form instead of the original so a
/// redirecting URL and its target never both enter the frontier.
pub async fn resolve_redirect(client: &Client, url: &str) -> Result<String, MirrorError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|e| classify_transport_error(url, e))?;

    Ok(response.url().to_string())
}

/// Fetches a page body over plain GET (rendering disabled)
///
/// Returns the status code and, for successful responses, the body text.
pub async fn fetch_page(client: &Client, url: &str) -> Result<(u16, Option<String>), MirrorError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_transport_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Ok((status.as_u16(), None));
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_transport_error(url, e))?;

    Ok((status.as_u16(), Some(body)))
}

/// Streams a response body into an already-opened staging file
///
/// The caller owns the staged file's lifecycle: it opens the file (claiming
/// the staging path) and promotes it after this returns Ok. A non-200
/// response is an error — the caller must not promote. On a transport error
/// mid-stream the staged file is left behind for housekeeping to sweep.
pub async fn download_into(
    client: &Client,
    url: &str,
    file: &mut tokio::fs::File,
) -> Result<(), MirrorError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_transport_error(url, e))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(MirrorError::FetchStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| classify_transport_error(url, e))?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}

/// Maps a reqwest error onto the crate's error taxonomy
pub(crate) fn classify_transport_error(url: &str, error: reqwest::Error) -> MirrorError {
    if error.is_timeout() {
        MirrorError::Timeout {
            url: url.to_string(),
        }
    } else {
        MirrorError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
