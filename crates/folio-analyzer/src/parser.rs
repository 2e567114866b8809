//! Parse LLM output into JSON objects

use crate::error::ParseError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?[ \t]*").expect("valid regex"));

/// Extract and parse the JSON object embedded in a model reply.
///
/// Code fences are stripped, then each balanced `{…}` span is tried in
/// order. If none parses, the raw reply from its first `{` to its last `}`
/// is tried before giving up with the error of the first span.
pub fn parse_json_object(response: &str) -> Result<Value, ParseError> {
    let cleaned = CODE_FENCE.replace_all(response, "");
    let cleaned = cleaned.trim();
    if !cleaned.contains('{') {
        return Err(ParseError::NoJson);
    }

    let mut first_error = None;
    for (start, _) in cleaned.match_indices('{') {
        let Some(candidate) = balanced_object(&cleaned[start..]) else {
            first_error.get_or_insert_with(|| {
                ParseError::InvalidJson("unbalanced braces".to_string())
            });
            continue;
        };
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!("Candidate at offset {} is not JSON: {}", start, e);
                first_error.get_or_insert_with(|| ParseError::InvalidJson(e.to_string()));
            }
        }
    }
    let first_error =
        first_error.unwrap_or_else(|| ParseError::InvalidJson("no candidate".to_string()));

    warn!("JSON parsing failed ({}), retrying with outermost braces", first_error);
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&response[start..=end]) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }
    Err(first_error)
}

/// Deserialize the top-level array `field` of `object`.
pub(crate) fn required_array<T: DeserializeOwned>(
    object: &Value,
    field: &'static str,
) -> Result<Vec<T>, ParseError> {
    let array = object
        .get(field)
        .filter(|value| value.is_array())
        .ok_or(ParseError::MissingArray(field))?;
    serde_json::from_value(array.clone()).map_err(|e| ParseError::InvalidEntry {
        field,
        reason: e.to_string(),
    })
}

/// First `{` up to its matching `}`, ignoring braces inside strings.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::Character;

    #[test]
    fn test_parse_plain_object() {
        let value = parse_json_object(r#"{"characters": []}"#).unwrap();
        assert!(value["characters"].is_array());
    }

    #[test]
    fn test_parse_fenced_object() {
        let response = "```json\n{\"characters\": [{\"name\": \"Alice\"}]}\n```";
        let value = parse_json_object(response).unwrap();
        assert_eq!(value["characters"][0]["name"], "Alice");
    }

    #[test]
    fn test_parse_with_surrounding_chatter() {
        let response = "Sure! Here is the analysis:\n{\"nodes\": [], \"links\": []}\nLet me know if you need more.";
        let value = parse_json_object(response).unwrap();
        assert!(value["nodes"].is_array());
        assert!(value["links"].is_array());
    }

    #[test]
    fn test_braces_inside_strings() {
        let response = r#"{"characters": [{"name": "The {Masked} Stranger \"}\""}]} trailing }"#;
        let value = parse_json_object(response).unwrap();
        assert_eq!(
            value["characters"][0]["name"],
            "The {Masked} Stranger \"}\""
        );
    }

    #[test]
    fn test_skips_braces_in_chatter() {
        let response = r#"Using the format {nodes, links}: {"nodes": [], "links": []}"#;
        let value = parse_json_object(response).unwrap();
        assert!(value["links"].is_array());
    }

    #[test]
    fn test_no_json_is_an_error() {
        assert_eq!(
            parse_json_object("I could not find any characters."),
            Err(ParseError::NoJson)
        );
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = parse_json_object("{\"characters\": [ {\"name\": }");
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_required_array() {
        let value = parse_json_object(
            r#"{"characters": [{"name": "Alice", "aliases": ["Al"]}, {"name": "Bob"}]}"#,
        )
        .unwrap();
        let characters: Vec<Character> = required_array(&value, "characters").unwrap();
        assert_eq!(characters.len(), 2);
        assert!(characters[1].aliases.is_empty());

        let missing: Result<Vec<Character>, _> = required_array(&value, "nodes");
        assert_eq!(missing, Err(ParseError::MissingArray("nodes")));
    }

    #[test]
    fn test_required_array_rejects_wrong_type() {
        let value = parse_json_object(r#"{"characters": "Alice, Bob"}"#).unwrap();
        let result: Result<Vec<Character>, _> = required_array(&value, "characters");
        assert_eq!(result, Err(ParseError::MissingArray("characters")));
    }
}
