//! Folio Domain Layer
//!
//! Core value types and collaborator interfaces for the book-analysis
//! pipeline. Infrastructure (HTTP clients, disk cache, LLM transport) lives
//! in other crates and plugs in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **BookId**: Positive numeric token naming a public-domain text
//! - **Character**: Canonical name plus informational aliases
//! - **Interaction graph**: Nodes weighted by interaction count, links
//!   labelled with a [`Sentiment`]
//! - **ApiError**: The four-way failure taxonomy surfaced to callers
//!
//! ## Architecture
//!
//! ```text
//! ContentSource ─┐
//!                ├─> BookAnalysis ─> AnalysisResult
//! ChatProvider ──┘
//! MetadataSource ──> BookMetadata
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod book;
pub mod error;
pub mod graph;
pub mod traits;

// Re-exports for convenience
pub use book::{BookId, BookMetadata};
pub use error::{ApiError, ErrorKind, LibraryError};
pub use graph::{
    null_as_default, AnalysisResult, Character, InteractionEdge, InteractionGraph,
    InteractionNode, Sentiment,
};
pub use traits::{ChatMessage, ChatRole};
