//! Folio LLM Provider Layer
//!
//! Chat-completion transport behind the `ChatProvider` trait from
//! `folio-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GroqProvider`: OpenAI-compatible chat-completion API (Groq by default)
//!
//! # Examples
//!
//! ```
//! use folio_domain::traits::{ChatMessage, ChatProvider};
//! use folio_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let reply = provider.complete(&[ChatMessage::user("hi")]).await.unwrap();
//! assert_eq!(reply, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod groq;

use async_trait::async_trait;
use folio_domain::traits::{ChatMessage, ChatProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use groq::GroqProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not finish within the client timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The API answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Scripted reply for [`MockProvider`]
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(LlmError),
}

/// Mock LLM provider for deterministic testing
///
/// Replies are consumed in FIFO order; once the queue is empty every call
/// gets the default response. Every conversation sent is recorded.
///
/// # Examples
///
/// ```
/// use folio_domain::traits::{ChatMessage, ChatProvider};
/// use folio_llm::MockProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockProvider::default();
/// provider.push_response("first");
/// provider.push_response("second");
///
/// let msgs = [ChatMessage::user("prompt")];
/// assert_eq!(provider.complete(&msgs).await.unwrap(), "first");
/// assert_eq!(provider.complete(&msgs).await.unwrap(), "second");
/// assert_eq!(provider.complete(&msgs).await.unwrap(), "Default mock response");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a reply for the next unanswered call
    pub fn push_response(&self, response: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(response.into()));
    }

    /// Queue a failure for the next unanswered call
    pub fn push_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(MockReply::Fail(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Conversations received so far, oldest first
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        self.requests.lock().unwrap().push(messages.to_vec());

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(err)) => Err(err),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Vec<ChatMessage> {
        vec![ChatMessage::system("rules"), ChatMessage::user("text")]
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&prompt()).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_queue_then_default() {
        let provider = MockProvider::default();
        provider.push_response("one");

        assert_eq!(provider.complete(&prompt()).await.unwrap(), "one");
        assert_eq!(
            provider.complete(&prompt()).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.push_error(LlmError::Timeout("deadline elapsed".to_string()));

        let result = provider.complete(&prompt()).await;
        assert!(matches!(result, Err(LlmError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("ok");
        provider.complete(&prompt()).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][1].content, "text");
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&prompt()).await.unwrap();

        // clones record into one log
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_timeout_display_mentions_timeout() {
        let err = LlmError::Timeout("operation timed out".to_string());
        assert!(err.to_string().to_lowercase().contains("timeout"));
    }
}
