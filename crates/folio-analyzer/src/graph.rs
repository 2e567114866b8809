//! Merging model replies into the final graph

use crate::types::{LinkDraft, SentimentRecord};
use folio_domain::{Character, InteractionEdge, InteractionNode, Sentiment};
use std::collections::HashSet;

/// Links from the combined call, with labels normalized to the closed set.
pub fn label_links(links: Vec<LinkDraft>) -> Vec<InteractionEdge> {
    links
        .into_iter()
        .map(|link| {
            let sentiment = link.sentiment();
            into_edge(link, sentiment)
        })
        .collect()
}

/// Attach sentiments from a separate call.
///
/// A link takes the sentiment of the record with the same source and
/// target; links without one are neutral. Unknown labels are neutral too.
pub fn merge_sentiments(links: Vec<LinkDraft>, records: &[SentimentRecord]) -> Vec<InteractionEdge> {
    links
        .into_iter()
        .map(|link| {
            let sentiment = records
                .iter()
                .find(|record| record.source == link.source && record.target == link.target)
                .map(|record| Sentiment::from_label(record.sentiment.as_deref()))
                .unwrap_or_default();
            into_edge(link, sentiment)
        })
        .collect()
}

/// Keep only characters and nodes that appear as an endpoint of some link.
pub fn filter_connected(
    characters: Vec<Character>,
    nodes: Vec<InteractionNode>,
    links: &[InteractionEdge],
) -> (Vec<Character>, Vec<InteractionNode>) {
    let connected: HashSet<&str> = links
        .iter()
        .flat_map(|link| [link.source.as_str(), link.target.as_str()])
        .collect();

    let characters = characters
        .into_iter()
        .filter(|character| connected.contains(character.name.as_str()))
        .collect();
    let nodes = nodes
        .into_iter()
        .filter(|node| connected.contains(node.id.as_str()))
        .collect();
    (characters, nodes)
}

fn into_edge(link: LinkDraft, sentiment: Sentiment) -> InteractionEdge {
    InteractionEdge {
        source: link.source,
        target: link.target,
        weight: link.value,
        sentiment,
    }
}
