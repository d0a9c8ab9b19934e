//! HTML-to-PDF render client.
//!
//! The renderer is an external Chromium-based service that accepts an HTML
//! document and returns PDF bytes. The underlying HTTP client is constructed
//! lazily exactly once per process and reused across requests; concurrent
//! first callers agree on a single initialization via `OnceCell`.

use bytes::Bytes;
use serde_json::json;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::config::PdfConfig;

/// PDF render errors.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The render service could not be reached or timed out.
    #[error("render request failed: {0}")]
    Request(String),
    /// The render service answered with a non-success status.
    #[error("render service returned {status}: {detail}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body, for server-side logs.
        detail: String,
    },
}

/// Client for the external HTML-to-PDF render service.
pub struct PdfRenderer {
    config: PdfConfig,
    client: OnceCell<reqwest::Client>,
}

impl std::fmt::Debug for PdfRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfRenderer")
            .field("url", &self.config.url)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}

impl PdfRenderer {
    /// Creates a new render client. No connection is made until the first
    /// render call.
    #[must_use]
    pub const fn new(config: PdfConfig) -> Self {
        Self {
            config,
            client: OnceCell::const_new(),
        }
    }

    async fn client(&self) -> Result<&reqwest::Client, PdfError> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
                    .build()
                    .map_err(|e| PdfError::Request(e.to_string()))
            })
            .await
    }

    /// Renders an HTML document to PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns `PdfError::Request` when the service is unreachable or the
    /// call times out, and `PdfError::Status` when it answers with an error.
    #[instrument(skip(self, html), fields(html_len = html.len()))]
    pub async fn render(&self, html: &str) -> Result<Bytes, PdfError> {
        let client = self.client().await?;
        let url = format!("{}/render", self.config.url.trim_end_matches('/'));

        let response = client
            .post(&url)
            .json(&json!({ "html": html, "format": "A4", "printBackground": true }))
            .send()
            .await
            .map_err(|e| PdfError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PdfError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PdfError::Request(e.to_string()))?;
        debug!(pdf_len = bytes.len(), "rendered PDF");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_service_is_a_request_error() {
        // Nothing listens on this port.
        let renderer = PdfRenderer::new(PdfConfig {
            url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        });

        let err = renderer.render("<html></html>").await.unwrap_err();
        assert!(matches!(err, PdfError::Request(_)));
    }

    #[tokio::test]
    async fn test_client_is_initialized_once() {
        let renderer = PdfRenderer::new(PdfConfig::default());
        let a = renderer.client().await.unwrap() as *const reqwest::Client;
        let b = renderer.client().await.unwrap() as *const reqwest::Client;
        assert_eq!(a, b);
    }
}
