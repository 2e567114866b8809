//! On-disk cache of full book text

use crate::{build_client, request_error, status_error, LibraryConfig};
use async_trait::async_trait;
use folio_domain::{traits::ContentSource, BookId, LibraryError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Cache-first access to book text
///
/// One `{id}.txt` file per book. Content is immutable once cached; there is
/// no eviction. Two concurrent misses for the same book may both download,
/// and the last rename wins.
pub struct ContentStore {
    cache_dir: PathBuf,
    base_url: String,
    client: reqwest::Client,
}

impl ContentStore {
    /// Create a store from library configuration
    pub fn new(config: &LibraryConfig) -> Result<Self, LibraryError> {
        Ok(Self {
            cache_dir: config.cache_dir.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: build_client(config.timeout())?,
        })
    }

    /// Directory holding the cached texts
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache file for a book
    pub fn cache_path(&self, id: &BookId) -> PathBuf {
        self.cache_dir.join(format!("{}.txt", id))
    }

    /// Remote plain-text URL for a book
    pub fn content_url(&self, id: &BookId) -> String {
        format!("{}/cache/epub/{id}/pg{id}.txt", self.base_url, id = id)
    }

    /// Read a cached text, if present and readable
    pub async fn read_cached(&self, id: &BookId) -> Option<String> {
        match tokio::fs::read_to_string(self.cache_path(id)).await {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("No cached content for book {}: {}", id, e);
                None
            }
        }
    }

    async fn download(&self, id: &BookId) -> Result<String, LibraryError> {
        let url = self.content_url(id);
        info!("Downloading content for book {} from {}", id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(id, e))?;

        if !response.status().is_success() {
            return Err(status_error(id, response.status()));
        }

        let text = response.text().await.map_err(|e| request_error(id, e))?;
        info!("Downloaded {} bytes for book {}", text.len(), id);
        Ok(text)
    }

    /// Write through a temporary sibling so readers never see a partial file
    async fn persist(&self, id: &BookId, text: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let tmp = self.cache_dir.join(format!(
            ".{}.{}.{}.tmp",
            id,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, text).await?;

        if let Err(e) = tokio::fs::rename(&tmp, self.cache_path(id)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for ContentStore {
    async fn get_or_download(&self, id: &BookId) -> Result<String, LibraryError> {
        if let Some(text) = self.read_cached(id).await {
            debug!("Cache hit for book {}", id);
            return Ok(text);
        }

        info!("Book content for {} not cached, downloading", id);
        let text = self.download(id).await?;

        if let Err(e) = self.persist(id, &text).await {
            warn!("Failed to cache content for book {}: {}", id, e);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ContentStore {
        let config = LibraryConfig {
            // Nothing listens here; any network attempt fails fast
            base_url: "http://127.0.0.1:9/".to_string(),
            cache_dir: dir.path().join("book-content"),
            timeout_secs: 1,
        };
        ContentStore::new(&config).unwrap()
    }

    #[test]
    fn test_paths() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = BookId::parse("1342").unwrap();

        assert_eq!(
            store.cache_path(&id),
            dir.path().join("book-content").join("1342.txt")
        );
        assert_eq!(
            store.content_url(&id),
            "http://127.0.0.1:9/cache/epub/1342/pg1342.txt"
        );
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = BookId::parse("11").unwrap();

        std::fs::create_dir_all(store.cache_dir()).unwrap();
        std::fs::write(store.cache_path(&id), "Alice was beginning to get very tired").unwrap();

        let first = store.get_or_download(&id).await.unwrap();
        let second = store.get_or_download(&id).await.unwrap();
        assert_eq!(first, "Alice was beginning to get very tired");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_miss_with_unreachable_library_is_internal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = BookId::parse("11").unwrap();

        let result = store.get_or_download(&id).await;
        assert!(matches!(result, Err(LibraryError::Internal(_))));
        assert!(!store.cache_path(&id).exists());
    }

    #[tokio::test]
    async fn test_persist_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let id = BookId::parse("84").unwrap();

        store.persist(&id, "first").await.unwrap();
        store.persist(&id, "second").await.unwrap();

        assert_eq!(store.read_cached(&id).await.as_deref(), Some("second"));
        let leftovers: Vec<_> = std::fs::read_dir(store.cache_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
