//! The book-analysis pipeline

use crate::analyst::CharacterAnalyst;
use crate::config::{AnalyzerConfig, PipelineMode};
use crate::graph::{filter_connected, label_links, merge_sentiments};
use crate::normalize::{extract_main_content, take_sample};
use async_trait::async_trait;
use folio_domain::traits::{BookAnalysis, ChatProvider, ContentSource};
use folio_domain::{AnalysisResult, ApiError, BookId, InteractionGraph, LibraryError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Orchestrates content acquisition, the LLM calls and the graph merge.
///
/// Each analysis runs in its own task; a panic inside it surfaces as
/// `InternalError("Analysis failed for book {id}")` instead of tearing
/// down the caller.
pub struct Analyzer<L: ChatProvider> {
    pipeline: Arc<Pipeline<L>>,
}

struct Pipeline<L: ChatProvider> {
    content: Arc<dyn ContentSource>,
    analyst: CharacterAnalyst<L>,
    config: AnalyzerConfig,
}

impl<L: ChatProvider + 'static> Analyzer<L> {
    /// Create a new analyzer
    pub fn new(content: Arc<dyn ContentSource>, provider: L, config: AnalyzerConfig) -> Self {
        Self {
            pipeline: Arc::new(Pipeline {
                content,
                analyst: CharacterAnalyst::new(provider),
                config,
            }),
        }
    }

    /// Get the analyzer configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.pipeline.config
    }
}

#[async_trait]
impl<L: ChatProvider + 'static> BookAnalysis for Analyzer<L> {
    async fn analyze_book(&self, id: &BookId) -> Result<AnalysisResult, ApiError> {
        let pipeline = Arc::clone(&self.pipeline);
        let task_id = id.clone();

        match tokio::spawn(async move { pipeline.run(&task_id).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!(book = %id, "Analysis task aborted: {}", e);
                Err(ApiError::internal(format!("Analysis failed for book {}", id)))
            }
        }
    }
}

impl<L: ChatProvider> Pipeline<L> {
    async fn run(&self, id: &BookId) -> Result<AnalysisResult, ApiError> {
        let started = Instant::now();
        info!(book = %id, mode = ?self.config.mode, "Starting analysis");

        let raw = self
            .content
            .get_or_download(id)
            .await
            .map_err(|e| content_failure(id, e))?;

        let cleaned = extract_main_content(&raw);
        let sample = take_sample(&cleaned, self.config.sample_chars);
        debug!(
            book = %id,
            "Normalized {} chars down to a {} char sample",
            raw.len(),
            sample.chars().count()
        );

        let characters = self.analyst.extract_characters(id, sample).await?;
        self.pause().await;

        let (nodes, links) = match self.config.mode {
            PipelineMode::Combined => {
                let draft = self
                    .analyst
                    .analyze_interactions_and_sentiments(id, sample, &characters)
                    .await?;
                (draft.nodes, label_links(draft.links))
            }
            PipelineMode::Split => {
                let draft = self
                    .analyst
                    .analyze_interactions(id, sample, &characters)
                    .await?;
                self.pause().await;
                let records = self
                    .analyst
                    .analyze_sentiments(id, sample, &draft.links)
                    .await?;
                (draft.nodes, merge_sentiments(draft.links, &records))
            }
        };

        let (characters, nodes) = filter_connected(characters, nodes, &links);

        info!(
            book = %id,
            "Analysis complete in {:?}: {} characters, {} links",
            started.elapsed(),
            characters.len(),
            links.len()
        );

        Ok(AnalysisResult {
            book_id: id.clone(),
            characters,
            graph: InteractionGraph { nodes, links },
        })
    }

    async fn pause(&self) {
        let delay = self.config.pacing_delay();
        if !delay.is_zero() {
            debug!("Pacing for {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

fn content_failure(id: &BookId, err: LibraryError) -> ApiError {
    match err {
        LibraryError::NotAvailable(_) => ApiError::not_found(format!(
            "Book content for {} is not available on Project Gutenberg.",
            id
        )),
        LibraryError::TemporarilyUnavailable(_) => ApiError::not_found(format!(
            "Book content for {} could not be downloaded due to a timeout. Please try again later.",
            id
        )),
        LibraryError::Internal(reason) => {
            error!(book = %id, "Content download failed: {}", reason);
            ApiError::not_found(format!(
                "Book content for {} could not be downloaded. Please try again later.",
                id
            ))
        }
    }
}
