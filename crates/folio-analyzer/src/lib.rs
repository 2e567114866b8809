//! Folio Analyzer
//!
//! Turns a book into a character interaction graph using an LLM.
//!
//! # Overview
//!
//! The [`Analyzer`] is the orchestrator of the book-analysis pipeline. It
//! pulls the book text through a `ContentSource`, normalizes and truncates
//! it, then asks the model for characters, their interactions and the
//! sentiment of each relationship. The answers are merged into one graph
//! and pruned to characters that actually interact.
//!
//! # Architecture
//!
//! ```text
//! ContentSource → normalize → sample → characters → [pause] → interactions
//!     (→ [pause] → sentiments) → merge → filter → AnalysisResult
//! ```
//!
//! # Key Features
//!
//! - **Defensive parsing**: code fences, chatter around the JSON and
//!   malformed spans are tolerated; missing top-level arrays are not
//! - **Pacing**: a fixed non-blocking pause between dependent LLM calls
//! - **Two pipeline modes**: one combined interactions+sentiments call
//!   (default) or separate calls merged by source and target
//! - **No retries**: the first failure ends the request
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio_analyzer::{Analyzer, AnalyzerConfig};
//! use folio_domain::{traits::{BookAnalysis, ContentSource}, BookId};
//! use folio_llm::MockProvider;
//!
//! # async fn example(content: Arc<dyn ContentSource>) -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(content, MockProvider::default(), AnalyzerConfig::default());
//! let result = analyzer.analyze_book(&BookId::parse("1513")?).await?;
//! println!("{} characters", result.characters.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyst;
mod analyzer;
mod config;
mod error;
pub mod graph;
pub mod normalize;
mod parser;
mod prompt;
mod types;


pub use analyst::CharacterAnalyst;
pub use analyzer::Analyzer;
pub use config::{AnalyzerConfig, PipelineMode};
pub use error::ParseError;
pub use parser::parse_json_object;
pub use prompt::{AnalysisTask, PromptBuilder};
pub use types::{InteractionDraft, LinkDraft, SentimentRecord};
