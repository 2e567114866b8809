//! Shapes of the model replies before they become graph types

use folio_domain::{null_as_default, InteractionNode, Sentiment};
use serde::{Deserialize, Serialize};

/// A link as returned by the interaction prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDraft {
    /// Source character id
    pub source: String,
    /// Target character id
    pub target: String,
    /// Interaction count
    #[serde(alias = "weight", default, deserialize_with = "null_as_default")]
    pub value: f64,
    /// Raw sentiment label, if the model gave one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

impl LinkDraft {
    /// Sentiment label mapped onto the closed set (neutral when unknown)
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from_label(self.sentiment.as_deref())
    }
}

/// Node entry as the model writes it; `name` falls back to `id`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeDraft {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "weight", default, deserialize_with = "null_as_default")]
    pub val: f64,
}

impl From<NodeDraft> for InteractionNode {
    fn from(draft: NodeDraft) -> Self {
        let name = draft
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| draft.id.clone());
        InteractionNode {
            id: draft.id,
            name,
            weight: draft.val,
        }
    }
}

/// Nodes and links from an interaction call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionDraft {
    /// Graph nodes
    pub nodes: Vec<InteractionNode>,
    /// Links, possibly carrying sentiment labels
    pub links: Vec<LinkDraft>,
}

/// One classified relationship from the sentiment call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Source character id
    pub source: String,
    /// Target character id
    pub target: String,
    /// Raw sentiment label
    #[serde(default)]
    pub sentiment: Option<String>,
}
