//! Plain-text cleanup for e-book content
//!
//! Pure functions only: the main body between the library's START/END
//! markers is kept when both are present, otherwise the whole text goes
//! through [`clean_text`].

use regex::Regex;
use std::sync::LazyLock;

static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\*\*\*\s*START OF (?:THE|THIS) PROJECT GUTENBERG EBOOK.*?\*\*\*")
        .expect("valid regex")
});

static END_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\*\*\*\s*END OF (?:THE|THIS) PROJECT GUTENBERG EBOOK.*?\*\*\*")
        .expect("valid regex")
});

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)Produced by.*?Project Gutenberg",
        r"(?is)Updated editions will.*?Project Gutenberg",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

static PAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[Page \d+\]").expect("valid regex"));

static NUMERIC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[ \t]*\r?$").expect("valid regex"));

static SPEAKER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([A-Z][A-Z \t]*?)[ \t]*:[ \t]*").expect("valid regex"));

/// Return the text between the START and END markers, trimmed.
///
/// The END marker is only searched for after the START marker; if either
/// is missing the whole input is cleaned instead.
pub fn extract_main_content(text: &str) -> String {
    if let Some(start) = START_MARKER.find(text) {
        if let Some(end) = END_MARKER.find_at(text, start.end()) {
            return text[start.end()..end.start()].trim().to_string();
        }
    }
    clean_text(text)
}

/// Strip markers, boilerplate, page tokens and page-number lines, tidy
/// speaker labels and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = START_MARKER.replace_all(text, "").into_owned();
    cleaned = END_MARKER.replace_all(&cleaned, "").into_owned();
    for pattern in BOILERPLATE.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned = PAGE_TOKEN.replace_all(&cleaned, "").into_owned();
    cleaned = NUMERIC_LINE.replace_all(&cleaned, "").into_owned();
    cleaned = SPEAKER_LABEL.replace_all(&cleaned, "$1: ").into_owned();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text` (not bytes).
pub fn take_sample(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_content_between_markers() {
        let raw = "License header\n*** START OF THE PROJECT GUTENBERG EBOOK HAMLET ***\n\n  Who's there?  \n\n*** END OF THE PROJECT GUTENBERG EBOOK HAMLET ***\nfooter";
        assert_eq!(extract_main_content(raw), "Who's there?");
    }

    #[test]
    fn test_missing_end_marker_falls_back_to_cleaning() {
        let raw = "*** START OF THE PROJECT GUTENBERG EBOOK X ***\nHAMLET:   To be\n12\nor not [Page 3] to be";
        assert_eq!(extract_main_content(raw), "HAMLET: To be or not to be");
    }

    #[test]
    fn test_end_before_start_is_ignored() {
        let raw = "*** END OF THE PROJECT GUTENBERG EBOOK X ***\nbody\n*** START OF THE PROJECT GUTENBERG EBOOK X ***\ntail";
        assert_eq!(extract_main_content(raw), "body tail");
    }

    #[test]
    fn test_clean_removes_boilerplate() {
        let raw = "Produced by Some Volunteers at Project Gutenberg\nIt was a dark night.";
        assert_eq!(clean_text(raw), "It was a dark night.");
    }

    #[test]
    fn test_clean_keeps_inline_numbers() {
        let raw = "He was 42 years old.\n  7  \nThe end.";
        assert_eq!(clean_text(raw), "He was 42 years old. The end.");
    }

    #[test]
    fn test_speaker_labels() {
        let raw = "KING CLAUDIUS :Welcome, dear Rosencrantz\nHAMLET:\nAy, madam";
        assert_eq!(
            clean_text(raw),
            "KING CLAUDIUS: Welcome, dear Rosencrantz HAMLET: Ay, madam"
        );
    }

    #[test]
    fn test_take_sample_counts_chars() {
        assert_eq!(take_sample("héllo wörld", 5), "héllo");
        assert_eq!(take_sample("short", 100), "short");
        assert_eq!(take_sample("", 10), "");
    }
}
