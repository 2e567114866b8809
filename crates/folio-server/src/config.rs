//! Configuration for the HTTP server.
//!
//! Settings come from an optional TOML file, then environment variables.
//! The LLM credential is only ever taken from the environment.

use folio_analyzer::AnalyzerConfig;
use folio_library::LibraryConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A field has an unusable value
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field or variable
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Deployment environment, reported by the health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Test,
}

impl Environment {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "unknown environment '{}' (expected development, production or test)",
                other
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration loaded from TOML and the environment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub bind_address: String,

    /// Bind port
    pub port: u16,

    /// Deployment environment
    pub environment: Environment,

    /// Path prefix for every route; empty or "/" mounts at the root
    pub api_prefix: String,

    /// Directory for cached book texts
    pub cache_dir: PathBuf,

    /// Root URL of the remote library
    pub library_base_url: String,

    /// Timeout for library requests (seconds)
    pub library_timeout_secs: u64,

    /// Root of the OpenAI-compatible chat API
    pub llm_base_url: String,

    /// Model name sent with each chat request
    pub llm_model: String,

    /// Timeout for chat requests (seconds)
    pub llm_timeout_secs: u64,

    /// Analysis pipeline settings
    pub analyzer: AnalyzerConfig,

    /// Chat API credential (environment only)
    #[serde(skip)]
    pub groq_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let library = LibraryConfig::default();
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Development,
            api_prefix: "/api".to_string(),
            cache_dir: library.cache_dir,
            library_base_url: library.base_url,
            library_timeout_secs: library.timeout_secs,
            llm_base_url: folio_llm::groq::DEFAULT_BASE_URL.to_string(),
            llm_model: folio_llm::groq::DEFAULT_MODEL.to_string(),
            llm_timeout_secs: folio_llm::groq::DEFAULT_TIMEOUT_SECS,
            analyzer: AnalyzerConfig::default(),
            groq_api_key: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `PORT`, `APP_ENV`, `API_PREFIX`, `BOOK_CONTENT_DIR` and
    /// `GROQ_API_KEY` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "PORT".to_string(),
                reason: format!("'{}' is not a port number", port),
            })?;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.environment = env.parse().map_err(|reason| ConfigError::Invalid {
                field: "APP_ENV".to_string(),
                reason,
            })?;
        }
        if let Some(prefix) = lookup("API_PREFIX") {
            self.api_prefix = prefix;
        }
        if let Some(dir) = lookup("BOOK_CONTENT_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("GROQ_API_KEY") {
            let key = key.trim();
            self.groq_api_key = (!key.is_empty()).then(|| key.to_string());
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groq_api_key.is_none() {
            return Err(ConfigError::MissingField("GROQ_API_KEY".to_string()));
        }
        if self.port == 0 {
            return Err(invalid("port", "must be greater than 0"));
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(invalid("api_prefix", "must start with '/'"));
        }
        if self.llm_timeout_secs == 0 {
            return Err(invalid("llm_timeout_secs", "must be greater than 0"));
        }
        self.library_config()
            .validate()
            .map_err(|reason| invalid("library", &reason))?;
        self.analyzer
            .validate()
            .map_err(|reason| invalid("analyzer", &reason))?;
        Ok(())
    }

    /// Library settings derived from this config
    pub fn library_config(&self) -> LibraryConfig {
        LibraryConfig {
            base_url: self.library_base_url.clone(),
            cache_dir: self.cache_dir.clone(),
            timeout_secs: self.library_timeout_secs,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_analyzer::PipelineMode;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.cache_dir, PathBuf::from("book-content"));
        assert_eq!(config.library_timeout_secs, 10);
        assert_eq!(config.llm_timeout_secs, 30);
        assert_eq!(config.llm_model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_parse_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 8080
            environment = "production"
            api_prefix = ""
            cache_dir = "/var/cache/folio"

            [analyzer]
            mode = "split"
            pacing_delay_ms = 0
        "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_prefix, "");
        assert_eq!(config.analyzer.mode, PipelineMode::Split);
        assert_eq!(config.analyzer.sample_chars, 8_000);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_api_key_is_not_read_from_file() {
        let config: ServerConfig = toml::from_str(r#"groq_api_key = "leaked""#).unwrap();
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "4000"),
                ("APP_ENV", "test"),
                ("API_PREFIX", "/v1"),
                ("BOOK_CONTENT_DIR", "/tmp/books"),
                ("GROQ_API_KEY", "gsk_test"),
            ]))
            .unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.api_prefix, "/v1");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/books"));
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk_test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = ServerConfig::default();
        assert!(matches!(
            config.apply_env(env(&[("PORT", "http")])),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            config.apply_env(env(&[("APP_ENV", "staging")])),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(_))
        ));

        config.groq_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());

        config.api_prefix = "api".to_string();
        assert!(config.validate().is_err());
        config.api_prefix = "/api".to_string();

        config.port = 0;
        assert!(config.validate().is_err());
        config.port = 3000;

        config.analyzer.sample_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut config = ServerConfig::default();
        config.apply_env(env(&[("GROQ_API_KEY", "  ")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/folio.toml");
        let config = ServerConfig::from_file(path).unwrap();
        let defaults = ServerConfig::default();
        assert_eq!(config.bind_addr(), defaults.bind_addr());
        assert_eq!(config.library_config(), defaults.library_config());
        assert_eq!(config.llm_base_url, defaults.llm_base_url);
        assert_eq!(config.analyzer, defaults.analyzer);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "port = 5000\nllm_model = \"llama-3.1-8b-instant\"\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.llm_model, "llama-3.1-8b-instant");
        assert!(matches!(
            ServerConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::FileRead(_))
        ));
    }
}
