//! The four LLM operations of the pipeline

use crate::error::ParseError;
use crate::parser::{parse_json_object, required_array};
use crate::prompt::{AnalysisTask, PromptBuilder};
use crate::types::{InteractionDraft, LinkDraft, NodeDraft, SentimentRecord};
use folio_domain::traits::ChatProvider;
use folio_domain::{ApiError, BookId, ChatMessage, Character};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Runs character, interaction and sentiment calls against a chat provider.
///
/// Each call is a single attempt. Provider failures become
/// `ServiceUnavailable` when they look like a timeout and `InternalError`
/// otherwise; unusable replies are always `InternalError`.
pub struct CharacterAnalyst<L: ChatProvider> {
    provider: L,
}

impl<L: ChatProvider> CharacterAnalyst<L> {
    /// Wrap a chat provider
    pub fn new(provider: L) -> Self {
        Self { provider }
    }

    /// Extract the character roster from the text sample
    pub async fn extract_characters(
        &self,
        id: &BookId,
        text: &str,
    ) -> Result<Vec<Character>, ApiError> {
        let task = AnalysisTask::Characters;
        let reply = self.ask(id, task, PromptBuilder::new(text).build(task)).await?;
        let characters = decode(id, task, &reply, |object| {
            required_array::<Character>(object, "characters")
        })?;
        info!(book = %id, "Extracted {} characters", characters.len());
        Ok(characters)
    }

    /// Nodes plus links already labelled with sentiment, in one call
    pub async fn analyze_interactions_and_sentiments(
        &self,
        id: &BookId,
        text: &str,
        characters: &[Character],
    ) -> Result<InteractionDraft, ApiError> {
        self.interaction_call(id, text, characters, AnalysisTask::InteractionsAndSentiments)
            .await
    }

    /// Nodes and links only; any sentiment the model adds is ignored later
    pub async fn analyze_interactions(
        &self,
        id: &BookId,
        text: &str,
        characters: &[Character],
    ) -> Result<InteractionDraft, ApiError> {
        self.interaction_call(id, text, characters, AnalysisTask::Interactions)
            .await
    }

    /// Sentiment label for each given link
    pub async fn analyze_sentiments(
        &self,
        id: &BookId,
        text: &str,
        links: &[LinkDraft],
    ) -> Result<Vec<SentimentRecord>, ApiError> {
        let task = AnalysisTask::Sentiments;
        let messages = PromptBuilder::new(text).with_links(links).build(task);
        let reply = self.ask(id, task, messages).await?;
        let records = decode(id, task, &reply, |object| {
            required_array::<SentimentRecord>(object, "sentiments")
        })?;
        info!(book = %id, "Classified {} relationships", records.len());
        Ok(records)
    }

    async fn interaction_call(
        &self,
        id: &BookId,
        text: &str,
        characters: &[Character],
        task: AnalysisTask,
    ) -> Result<InteractionDraft, ApiError> {
        let messages = PromptBuilder::new(text)
            .with_characters(characters)
            .build(task);
        let reply = self.ask(id, task, messages).await?;
        let draft = decode(id, task, &reply, |object| {
            let nodes = required_array::<NodeDraft>(object, "nodes")?;
            let links = required_array::<LinkDraft>(object, "links")?;
            Ok(InteractionDraft {
                nodes: nodes.into_iter().map(Into::into).collect(),
                links,
            })
        })?;
        info!(
            book = %id,
            "{}: {} nodes, {} links",
            task,
            draft.nodes.len(),
            draft.links.len()
        );
        Ok(draft)
    }

    async fn ask(
        &self,
        id: &BookId,
        task: AnalysisTask,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ApiError> {
        debug!(book = %id, "Sending {} request", task);
        let reply = self
            .provider
            .complete(&messages)
            .await
            .map_err(|e| provider_failure(id, task, &e.to_string()))?;
        debug!(book = %id, "LLM response length: {} chars", reply.len());
        Ok(reply)
    }
}

/// Parse the reply and pull out the shape `extract` wants
fn decode<T>(
    id: &BookId,
    task: AnalysisTask,
    reply: &str,
    extract: impl FnOnce(&Value) -> Result<T, ParseError>,
) -> Result<T, ApiError> {
    let object = parse_json_object(reply).map_err(|e| {
        warn!(book = %id, "Unparseable {} reply: {}", task, e);
        ApiError::internal(format!("Failed to parse {} for book {}: {}", task, id, e))
    })?;
    extract(&object).map_err(|e| {
        warn!(book = %id, "Invalid {} reply: {}", task, e);
        ApiError::internal(format!("Invalid {} response for book {}: {}", task, id, e))
    })
}

fn provider_failure(id: &BookId, task: AnalysisTask, message: &str) -> ApiError {
    error!(book = %id, "LLM {} request failed: {}", task, message);
    let lower = message.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        ApiError::service_unavailable("LLM API request timeout")
    } else {
        ApiError::internal("LLM API request failed")
    }
}
