//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis pipeline and
//! infrastructure. Implementations live in other crates and are wired
//! together once, at process startup.

use crate::{AnalysisResult, ApiError, BookId, BookMetadata, LibraryError};
use async_trait::async_trait;
use std::fmt;

/// Source of full book text
///
/// Implemented by the infrastructure layer (folio-library)
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Return the book's raw text, downloading and caching it on a miss
    async fn get_or_download(&self, id: &BookId) -> Result<String, LibraryError>;
}

/// Source of catalogue metadata
///
/// Implemented by the infrastructure layer (folio-library)
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch title, author, cover and description for a book
    async fn fetch_metadata(&self, id: &BookId) -> Result<BookMetadata, LibraryError>;
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// Instructions and output schema
    System,
    /// Payload to analyse
    User,
}

impl ChatRole {
    /// Role name as used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who is speaking
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Trait for chat-completion providers
///
/// Implemented by the infrastructure layer (folio-llm)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Error type for provider operations
    type Error: fmt::Display + Send;

    /// Send the conversation and return the assistant's raw reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error>;
}

/// Trait for the end-to-end book analysis
///
/// Implemented by the application layer (folio-analyzer)
#[async_trait]
pub trait BookAnalysis: Send + Sync {
    /// Analyse a book's characters and their relationships
    async fn analyze_book(&self, id: &BookId) -> Result<AnalysisResult, ApiError>;
}
