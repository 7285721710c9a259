//! HTTP retrieval of the annex page and PDF documents.
//!
//! Fail-fast semantics: any connection failure, timeout, or non-success
//! status ends the run for that document. There is no retry.

use crate::error::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Applied to every request; a stalled server fails the run instead of
/// hanging it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the HTTP client shared by the whole run.
///
/// Redirects follow reqwest's defaults.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Fetch the publication page and return its HTML text.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    info!("Fetching annex page");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    info!(bytes = body.len(), "Fetched annex page");
    Ok(body)
}

/// Download one document and write the full response body to `dest`.
///
/// The file is created (or overwritten) only after the whole body has been
/// received with a success status.
#[instrument(level = "info", skip_all, fields(%url, dest = %dest.as_ref().display()))]
pub async fn download(client: &Client, url: &str, dest: impl AsRef<Path>) -> Result<()> {
    info!("Downloading PDF");
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    tokio::fs::write(dest.as_ref(), &bytes).await?;
    info!(bytes = bytes.len(), "PDF saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_download_writes_body_to_destination() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/anexo1.pdf");
                then.status(200).body("fake pdf bytes");
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Anexo_1.pdf");
        let client = build_client().unwrap();

        download(&client, &server.url("/anexo1.pdf"), &dest)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(std::fs::read(&dest).unwrap(), b"fake pdf bytes");
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/a.pdf");
                then.status(200).body("new");
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.pdf");
        std::fs::write(&dest, "old").unwrap();

        let client = build_client().unwrap();
        download(&client, &server.url("/a.pdf"), &dest).await.unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing.pdf");
                then.status(404);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.pdf");
        let client = build_client().unwrap();

        let err = download(&client, &server.url("/missing.pdf"), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_page_returns_html() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(200).body("<html><body>ok</body></html>");
            })
            .await;

        let client = build_client().unwrap();
        let html = fetch_page(&client, &server.url("/page")).await.unwrap();
        assert!(html.contains("ok"));
    }
}
