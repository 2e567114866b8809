//! Book identifiers and catalogue metadata

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a public-domain text in the remote library
///
/// Always a non-empty run of ASCII digits with a value greater than zero and
/// no leading zeros, which also makes it safe to use as a cache file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Validate and wrap a raw identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_domain::BookId;
    ///
    /// let id = BookId::parse("1342").unwrap();
    /// assert_eq!(id.as_str(), "1342");
    /// assert_eq!(BookId::parse("0042").unwrap(), BookId::parse("42").unwrap());
    ///
    /// assert!(BookId::parse("").is_err());
    /// assert!(BookId::parse("0").is_err());
    /// assert!(BookId::parse("../etc").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ApiError::bad_request("Book ID parameter is required"));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) || raw.bytes().all(|b| b == b'0') {
            return Err(ApiError::bad_request("Book ID must be a positive integer"));
        }
        Ok(Self(raw.trim_start_matches('0').to_string()))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalogue metadata scraped from a book's landing page
///
/// Fields that could not be extracted are omitted rather than reported as
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    /// Book identifier
    pub id: BookId,

    /// Title, if found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author, if found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Absolute URL of the cover image, if found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Cleaned summary text, if found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookMetadata {
    /// Metadata with only the identifier set
    pub fn new(id: BookId) -> Self {
        Self {
            id,
            title: None,
            author: None,
            image_url: None,
            description: None,
        }
    }
}
