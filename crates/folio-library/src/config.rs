//! Configuration for library access

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the library lives and where its texts are cached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root URL of the remote library
    pub base_url: String,

    /// Directory holding one `{id}.txt` file per downloaded book
    pub cache_dir: PathBuf,

    /// Timeout for metadata and content requests (seconds)
    pub timeout_secs: u64,
}

impl LibraryConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.gutenberg.org".to_string(),
            cache_dir: PathBuf::from("book-content"),
            timeout_secs: 10,
        }
    }
}
