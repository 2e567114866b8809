//! Characters and their interaction graph
//!
//! Node and link field names on the wire follow the force-graph convention
//! used by the presentation layer: nodes carry `val`, links carry `value`.

use crate::book::BookId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named character extracted from a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Canonical name, used as the graph node key
    pub name: String,

    /// Alternative names (informational only)
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
}

/// Deserialize an explicit `null` the same way as a missing field
///
/// Pair with `#[serde(default)]` so both absent and null values yield
/// `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Character {
    /// Create a character with the given aliases
    pub fn new(name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            name: name.into(),
            aliases,
        }
    }
}

/// Emotional tone of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Friends, lovers, allies
    Positive,
    /// Enemies, rivals, hostile exchanges
    Negative,
    /// Interaction without a clear tone
    #[default]
    Neutral,
}

impl Sentiment {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Interpret an optional free-form label, falling back to neutral
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_domain::Sentiment;
    ///
    /// assert_eq!(Sentiment::from_label(Some(" Negative ")), Sentiment::Negative);
    /// assert_eq!(Sentiment::from_label(Some("hostile")), Sentiment::Neutral);
    /// assert_eq!(Sentiment::from_label(None), Sentiment::Neutral);
    /// ```
    pub fn from_label(label: Option<&str>) -> Self {
        label.and_then(|l| l.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("unknown sentiment: {}", other)),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character node in the interaction graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionNode {
    /// Node key, matches a [`Character::name`]
    pub id: String,

    /// Display name
    pub name: String,

    /// Total interaction count for this character
    #[serde(rename = "val", alias = "weight", default)]
    pub weight: f64,
}

/// A relationship between two characters
///
/// Structurally directed, semantically symmetric: both `A -> B` and
/// `B -> A` may be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEdge {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Interaction count between the two characters
    #[serde(rename = "value", alias = "weight", default)]
    pub weight: f64,

    /// Tone of the relationship
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// Nodes plus sentiment-labelled links
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionGraph {
    /// Characters that take part in at least one link
    pub nodes: Vec<InteractionNode>,

    /// Links between characters
    pub links: Vec<InteractionEdge>,
}

/// Outcome of analysing one book
///
/// Built per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Book that was analysed
    pub book_id: BookId,

    /// Characters that appear in at least one link
    pub characters: Vec<Character>,

    /// The filtered interaction graph
    pub graph: InteractionGraph,
}
