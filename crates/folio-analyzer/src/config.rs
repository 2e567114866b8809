//! Configuration for the Analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How interactions and sentiments are obtained from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// One call returns links already labelled with sentiment
    #[default]
    Combined,
    /// Separate interaction and sentiment calls, merged afterwards
    Split,
}

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Only this many leading characters of the cleaned text are analysed
    pub sample_chars: usize,

    /// Pause between dependent LLM calls (milliseconds)
    pub pacing_delay_ms: u64,

    /// Pipeline variant
    pub mode: PipelineMode,
}

impl AnalyzerConfig {
    /// Get the pacing delay as a Duration
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_chars == 0 {
            return Err("sample_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_chars: 8_000,
            pacing_delay_ms: 2_000,
            mode: PipelineMode::Combined,
        }
    }
}
