//! Folio Library Access
//!
//! Everything that talks to the remote public-domain library:
//!
//! - [`ContentStore`]: full book text, cached one file per book on disk
//! - [`MetadataFetcher`]: title, author, cover and description scraped from
//!   the book's landing page
//!
//! Both implement the collaborator traits from `folio-domain` and report
//! failures as [`LibraryError`], keeping "not found" and "timed out"
//! distinct from every other failure.
//!
//! # Example Usage
//!
//! ```no_run
//! use folio_domain::{traits::ContentSource, BookId};
//! use folio_library::{ContentStore, LibraryConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ContentStore::new(&LibraryConfig::default())?;
//! let text = store.get_or_download(&BookId::parse("1342")?).await?;
//! println!("{} chars", text.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod content;
mod metadata;
pub mod scrape;

pub use config::LibraryConfig;
pub use content::ContentStore;
pub use folio_domain::LibraryError;
pub use metadata::MetadataFetcher;

use folio_domain::BookId;
use std::time::Duration;

/// Build the shared HTTP client with the library request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, LibraryError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LibraryError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Classify a transport error for a book request
pub(crate) fn request_error(id: &BookId, e: reqwest::Error) -> LibraryError {
    if e.is_timeout() {
        LibraryError::TemporarilyUnavailable(id.clone())
    } else if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
        LibraryError::NotAvailable(id.clone())
    } else {
        LibraryError::Internal(format!("Request for book {} failed: {}", id, e))
    }
}

/// Classify a non-success response status for a book request
pub(crate) fn status_error(id: &BookId, status: reqwest::StatusCode) -> LibraryError {
    if status == reqwest::StatusCode::NOT_FOUND {
        LibraryError::NotAvailable(id.clone())
    } else {
        LibraryError::Internal(format!("HTTP {} for book {}", status, id))
    }
}
