// src/league/client.rs
use crate::league::config::ScraperConfig;
use crate::utils::error::FetchError;
use reqwest::header;
use std::collections::HashMap;
use std::future::Future;

/// Source of page markup. The scraper never retries a failed fetch.
pub trait FetchMarkup {
    fn fetch_markup(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches pages over HTTP with the configured User-Agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl FetchMarkup for HttpFetcher {
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("Downloading page from: {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html,*/*")
            .send()
            .await?; // Propagates reqwest::Error as FetchError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(FetchError::Http { status, url: url.to_string() });
        }

        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// In-memory pages keyed by URL, for offline parsing of saved pages.
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl FetchMarkup for StaticPages {
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_pages_serve_registered_urls_only() {
        let pages = StaticPages::new().with_page("https://a.pl/x", "<p>x</p>");
        let body = tokio_test::block_on(pages.fetch_markup("https://a.pl/x")).unwrap();
        assert_eq!(body, "<p>x</p>");
        let missing = tokio_test::block_on(pages.fetch_markup("https://a.pl/y"));
        assert!(matches!(missing, Err(FetchError::NotFound(_))));
    }

    #[test]
    fn http_fetcher_builds_from_config() {
        assert!(HttpFetcher::new(&ScraperConfig::default()).is_ok());
    }
}
