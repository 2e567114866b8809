//! Prompt construction for the analysis calls

use crate::types::LinkDraft;
use folio_domain::{ChatMessage, Character};
use std::fmt;

/// The four kinds of model call the pipeline makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTask {
    /// Character roster with aliases
    Characters,
    /// Nodes and links without sentiment
    Interactions,
    /// Sentiment label per known link
    Sentiments,
    /// Nodes and sentiment-labelled links in one reply
    InteractionsAndSentiments,
}

impl AnalysisTask {
    fn system_prompt(&self) -> String {
        match self {
            Self::Characters => CHARACTER_INSTRUCTIONS.to_string(),
            Self::Interactions => format!(
                "{INTERACTION_ROLE}\n\n{INTERACTION_SCHEMA}\n\n{INTERACTION_RULES}"
            ),
            Self::Sentiments => format!("{SENTIMENT_ROLE}\n\n{SENTIMENT_SCHEMA}\n\n{SENTIMENT_RULES}"),
            Self::InteractionsAndSentiments => format!(
                "{COMBINED_ROLE}\n\n{COMBINED_SCHEMA}\n\n{INTERACTION_RULES}\n\n{SENTIMENT_RULES}"
            ),
        }
    }

    fn closing_instruction(&self) -> &'static str {
        match self {
            Self::Characters => {
                "Extract all characters from this text (play or novel). Include both speaking and non-speaking named characters."
            }
            Self::Interactions => {
                "Count the interactions between these characters and return the graph structure."
            }
            Self::Sentiments => {
                "Classify the sentiment of each listed interaction. Return exactly one entry per interaction."
            }
            Self::InteractionsAndSentiments => {
                "Analyze both interactions and emotional sentiments between these characters and return the complete graph structure with sentiment data."
            }
        }
    }
}

impl fmt::Display for AnalysisTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Characters => "character extraction",
            Self::Interactions => "interaction analysis",
            Self::Sentiments => "sentiment analysis",
            Self::InteractionsAndSentiments => "interaction and sentiment analysis",
        })
    }
}

/// Builds the system/user message pair for one [`AnalysisTask`]
pub struct PromptBuilder<'a> {
    text: &'a str,
    characters: &'a [Character],
    links: &'a [LinkDraft],
}

impl<'a> PromptBuilder<'a> {
    /// Start a prompt over the (already truncated) book text
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            characters: &[],
            links: &[],
        }
    }

    /// Character roster the interaction prompts are restricted to
    pub fn with_characters(mut self, characters: &'a [Character]) -> Self {
        self.characters = characters;
        self
    }

    /// Links the sentiment prompt should classify
    pub fn with_links(mut self, links: &'a [LinkDraft]) -> Self {
        self.links = links;
        self
    }

    /// Build the messages for `task`
    pub fn build(&self, task: AnalysisTask) -> Vec<ChatMessage> {
        let mut user = format!("TEXT:\n{}\n\n", self.text);

        match task {
            AnalysisTask::Characters => {}
            AnalysisTask::Interactions | AnalysisTask::InteractionsAndSentiments => {
                user.push_str("CHARACTERS TO ANALYZE:\n");
                user.push_str(&roster(self.characters));
                user.push_str("\n\n");
            }
            AnalysisTask::Sentiments => {
                user.push_str("INTERACTIONS TO CLASSIFY:\n");
                for link in self.links {
                    user.push_str(&format!(
                        "{} -> {} ({} interactions)\n",
                        link.source, link.target, link.value
                    ));
                }
                user.push('\n');
            }
        }
        user.push_str(task.closing_instruction());

        vec![ChatMessage::system(task.system_prompt()), ChatMessage::user(user)]
    }
}

/// One line per character: `Name (aliases: A, B)`
fn roster(characters: &[Character]) -> String {
    characters
        .iter()
        .map(|character| {
            if character.aliases.is_empty() {
                character.name.clone()
            } else {
                format!("{} (aliases: {})", character.name, character.aliases.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const CHARACTER_INSTRUCTIONS: &str = r#"You extract characters from both plays and novels/prose. Return STRICT JSON ONLY. No prose.

OUTPUT SCHEMA:
{
  "characters": [
    { "name": "Hamlet", "aliases": ["Prince Hamlet", "Prince of Denmark"] },
    { "name": "Claudius", "aliases": ["King", "King of Denmark"] }
  ]
}

RULES FOR PLAYS:
- Look for speaker labels (e.g., "Hamlet:", "KING CLAUDIUS:")
- Only include characters who actually speak
- Exclude stage directions and narrators

RULES FOR NOVELS/PROSE:
- Look for characters mentioned in dialogue and described in narration
- Include both speaking and non-speaking named characters
- Focus on recurring characters with clear identities
- Exclude generic references (e.g., "the servant", "a man")

GENERAL RULES:
- Use the most common name as the canonical name
- Include titles, nicknames, and abbreviations as aliases
- Prefer shorter names over longer titles (e.g., "Hamlet" not "Prince Hamlet")
- Unify different spellings/variants of the same character"#;

const INTERACTION_ROLE: &str =
    "You analyze character interactions in literary texts. Return STRICT JSON ONLY. No prose.";

const COMBINED_ROLE: &str = "You analyze character interactions and their emotional sentiments in literary texts. Return STRICT JSON ONLY. No prose.";

const SENTIMENT_ROLE: &str = "You classify the emotional sentiment of relationships between characters in literary texts. Return STRICT JSON ONLY. No prose.";

const INTERACTION_SCHEMA: &str = r#"OUTPUT SCHEMA:
{
  "nodes": [
    { "id": "Romeo", "name": "Romeo", "val": 45 },
    { "id": "Juliet", "name": "Juliet", "val": 38 }
  ],
  "links": [
    { "source": "Romeo", "target": "Juliet", "value": 23 },
    { "source": "Tybalt", "target": "Romeo", "value": 15 }
  ]
}"#;

const COMBINED_SCHEMA: &str = r#"OUTPUT SCHEMA:
{
  "nodes": [
    { "id": "Romeo", "name": "Romeo", "val": 45 },
    { "id": "Juliet", "name": "Juliet", "val": 38 }
  ],
  "links": [
    { "source": "Romeo", "target": "Juliet", "value": 23, "sentiment": "positive" },
    { "source": "Tybalt", "target": "Romeo", "value": 15, "sentiment": "negative" },
    { "source": "Mercutio", "target": "Romeo", "value": 12, "sentiment": "neutral" }
  ]
}"#;

const SENTIMENT_SCHEMA: &str = r#"OUTPUT SCHEMA:
{
  "sentiments": [
    { "source": "Romeo", "target": "Juliet", "sentiment": "positive" },
    { "source": "Tybalt", "target": "Romeo", "sentiment": "negative" }
  ]
}"#;

const INTERACTION_RULES: &str = r#"INTERACTION ANALYSIS RULES:
- Count interactions as dialogue exchanges, scene co-presence and direct mentions
- Use character names as node IDs (exact matches from the provided character list)
- Set node "val" to the total interaction count for that character
- Set link "value" to the interaction count between those two characters
- Include both directions for undirected interactions (A->B and B->A)
- Only include characters from the provided list
- Only include relationships that have interactions (value > 0)"#;

const SENTIMENT_RULES: &str = r#"SENTIMENT CLASSIFICATION RULES:
- "positive": friends, lovers, allies, or warm/affectionate interactions
- "negative": enemies, rivals, or hostile/conflictual interactions
- "neutral": characters who interact without clearly positive or negative feelings
- Judge from dialogue tone, actions and narrative description
- Use character names exactly as provided in the source/target fields"#;
