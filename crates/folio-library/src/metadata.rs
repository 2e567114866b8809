//! Catalogue metadata from the library's landing pages

use crate::scrape::extract_metadata;
use crate::{build_client, request_error, status_error, LibraryConfig};
use async_trait::async_trait;
use folio_domain::{traits::MetadataSource, BookId, BookMetadata, LibraryError};
use tracing::{debug, warn};

/// Fetches a book's landing page and scrapes its metadata
pub struct MetadataFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl MetadataFetcher {
    /// Create a fetcher from library configuration
    pub fn new(config: &LibraryConfig) -> Result<Self, LibraryError> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: build_client(config.timeout())?,
        })
    }

    /// Landing page URL for a book
    pub fn page_url(&self, id: &BookId) -> String {
        format!("{}/ebooks/{}", self.base_url, id)
    }

    async fn fetch_page(&self, id: &BookId) -> Result<String, LibraryError> {
        let url = self.page_url(id);
        debug!("Fetching metadata for book {} from {}", id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(id, e))?;

        if !response.status().is_success() {
            return Err(status_error(id, response.status()));
        }

        response.text().await.map_err(|e| request_error(id, e))
    }
}

#[async_trait]
impl MetadataSource for MetadataFetcher {
    async fn fetch_metadata(&self, id: &BookId) -> Result<BookMetadata, LibraryError> {
        let html = self
            .fetch_page(id)
            .await
            .inspect_err(|e| warn!("Could not fetch metadata for book {}: {}", id, e))?;

        let scraped = extract_metadata(&html, &self.base_url);
        Ok(BookMetadata {
            id: id.clone(),
            title: scraped.title,
            author: scraped.author,
            image_url: scraped.image_url,
            description: scraped.description,
        })
    }
}
