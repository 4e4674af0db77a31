//! Remote template retrieval

use crate::error::{CourierError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Fetches a template body by URL
#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    /// Download `url` as text
    ///
    /// Fails with [`CourierError::Fetch`] when the server is unreachable,
    /// answers with a non-2xx status, or serves a non-text body.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher backed by reqwest
pub struct HttpTemplateFetcher {
    client: reqwest::Client,
}

impl HttpTemplateFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TemplateFetcher for HttpTemplateFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching template from {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CourierError::Fetch(format!("{} returned {}", url, status)));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_text_content_type(content_type) {
                return Err(CourierError::Fetch(format!(
                    "{} served non-text content: {}",
                    url, content_type
                )));
            }
        }

        Ok(response.text().await?)
    }
}

/// `text/*` and XHTML count as text. Responses without a content type are
/// accepted as well; this only checks a header that is present.
fn is_text_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.starts_with("text/") || essence == "application/xhtml+xml"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_types() {
        assert!(is_text_content_type("text/html"));
        assert!(is_text_content_type("text/plain; charset=utf-8"));
        assert!(is_text_content_type("Text/HTML"));
        assert!(is_text_content_type("application/xhtml+xml"));
    }

    #[test]
    fn test_binary_content_types() {
        assert!(!is_text_content_type("image/png"));
        assert!(!is_text_content_type("application/octet-stream"));
        assert!(!is_text_content_type("application/pdf"));
    }
}
