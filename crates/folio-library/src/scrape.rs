//! Best-effort metadata extraction from a book's landing page
//!
//! Each field has an ordered list of patterns. Earlier patterns are specific,
//! later ones are broader fallbacks; the first pattern whose first match
//! survives cleaning and the field's exclusion check wins. A field with no
//! surviving match is simply absent.

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use url::Url;

/// Descriptions shorter than this (in characters) are discarded
pub const MIN_DESCRIPTION_CHARS: usize = 40;

/// Phrases marking site boilerplate rather than a real summary (lowercase)
const DESCRIPTION_BOILERPLATE: &[&str] = &[
    "free kindle book and epub digitized and proofread by volunteers",
    "free ebooks",
    "project gutenberg is a library",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("metadata pattern must compile"))
        .collect()
}

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?i)<h1[^>]*itemprop=["']name["'][^>]*>([^<]+)</h1>"#,
        r#"(?i)<title>([^<]+?)\s*(?:\||-|\s*by\s*Project Gutenberg)"#,
        r#"(?i)<title>([^<]+)</title>"#,
    ])
});

static AUTHOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?i)<[^>]*itemprop=["']creator["'][^>]*>([^<]+)</[^>]*>"#,
        r#"(?i)<[^>]*itemprop=["']author["'][^>]*>([^<]+)</[^>]*>"#,
        r#"(?i)<a[^>]*href=["'][^"']*/ebooks/author/[^"']*["'][^>]*>([^<]+)</a>"#,
        r#"(?i)by\s+([^<\n\r]+?)(?:\s*<|\s*\n|\s*\r|$)"#,
    ])
});

static IMAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?i)<img[^>]*class=["'][^"']*cover-art[^"']*["'][^>]*src=["']([^"']+)["']"#,
        r#"(?i)<img[^>]*src=["']([^"']+)["'][^>]*class=["'][^"']*cover-art[^"']*["']"#,
        r#"(?i)<meta[^>]*property=["']og:image["'][^>]*content=["']([^"']+)["']"#,
        r#"(?i)<img[^>]*src=["']([^"']*/cache/epub/[^"']*cover[^"']*)["']"#,
    ])
});

static DESCRIPTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?i)<th[^>]*>\s*Summary\s*</th>\s*<td[^>]*>([\s\S]*?)</td>"#,
        r#"(?i)<div[^>]*class=["'][^"']*summary-text-container[^"']*["'][^>]*>([\s\S]*?)</div>"#,
        r#"(?i)<meta[^>]*name=["']description["'][^>]*content=["']([^"']+)["']"#,
        r#"(?i)<meta[^>]*property=["']og:description["'][^>]*content=["']([^"']+)["']"#,
    ])
});

static GENERATED_SUMMARY_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\(This is an automatically generated summary\.\)").expect("note pattern")
});

/// Fields scraped from a landing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedMetadata {
    /// Book title
    pub title: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Absolute cover URL
    pub image_url: Option<String>,
    /// Cleaned summary
    pub description: Option<String>,
}

/// Extract every field from the page
///
/// `base_url` resolves relative cover paths.
pub fn extract_metadata(html: &str, base_url: &str) -> ScrapedMetadata {
    ScrapedMetadata {
        title: extract_title(html),
        author: extract_author(html),
        image_url: extract_image_url(html, base_url),
        description: extract_description(html),
    }
}

/// Title, rejecting the bare site name
pub fn extract_title(html: &str) -> Option<String> {
    first_match(&TITLE_PATTERNS, html, clean_inline, |t| t != "Project Gutenberg")
}

/// Author, rejecting anything mentioning the site itself
pub fn extract_author(html: &str) -> Option<String> {
    first_match(&AUTHOR_PATTERNS, html, clean_inline, |a| {
        !a.contains("Project Gutenberg")
    })
}

/// Cover image, resolved to an absolute URL
pub fn extract_image_url(html: &str, base_url: &str) -> Option<String> {
    first_match(&IMAGE_PATTERNS, html, clean_inline, |src| {
        !src.starts_with("data:")
    })
    .and_then(|src| resolve_url(base_url, &src))
}

/// Summary text, cleaned and checked against length and boilerplate rules
pub fn extract_description(html: &str) -> Option<String> {
    first_match(&DESCRIPTION_PATTERNS, html, clean_description, |d| {
        let lower = d.to_lowercase();
        d.chars().count() >= MIN_DESCRIPTION_CHARS
            && !DESCRIPTION_BOILERPLATE.iter().any(|p| lower.contains(p))
    })
}

fn first_match(
    patterns: &[Regex],
    html: &str,
    clean: impl Fn(&str) -> String,
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let raw = pattern.captures(html)?.get(1)?.as_str();
        let value = clean(raw);
        (!value.is_empty() && accept(&value)).then_some(value)
    })
}

fn clean_inline(raw: &str) -> String {
    collapse_whitespace(&html_text(raw))
}

fn clean_description(raw: &str) -> String {
    let text = collapse_whitespace(&html_text(raw));
    GENERATED_SUMMARY_NOTE.replace_all(&text, "").trim().to_string()
}

/// Text content of an HTML fragment, tags dropped and entities decoded
pub fn html_text(raw: &str) -> String {
    Html::parse_fragment(raw)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse whitespace runs into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a possibly relative URL against the library's base URL
///
/// Returns `None` when the base or the joined result is not a valid URL.
pub fn resolve_url(base_url: &str, src: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    base.join(src).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.gutenberg.org";

    const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Pride and Prejudice by Jane Austen | Project Gutenberg</title>
  <meta name="description" content="Free kindle book and epub digitized and proofread by volunteers.">
  <meta property="og:image" content="https://www.gutenberg.org/cache/epub/1342/pg1342.cover.medium.jpg">
</head>
<body>
  <div id="cover">
    <img class="cover-art" src="/cache/epub/1342/pg1342.cover.medium.jpg" alt="Book Cover">
  </div>
  <h1 itemprop="name">Pride and Prejudice</h1>
  <table class="bibrec">
    <tr><th>Author</th><td><a href="/ebooks/author/68" rel="marcrel:aut" itemprop="creator">Austen, Jane, 1775-1817</a></td></tr>
    <tr>
      <th>Summary</th>
      <td>&quot;Pride and Prejudice&quot; by Jane Austen is a classic novel written in the early 19th century.
      The story follows Elizabeth Bennet &amp; her sisters as they navigate love and class. (This is an automatically generated summary.)</td>
    </tr>
  </table>
</body>
</html>"#;

    #[test]
    fn test_extracts_all_fields() {
        let meta = extract_metadata(LANDING_PAGE, BASE);

        assert_eq!(meta.title.as_deref(), Some("Pride and Prejudice"));
        assert_eq!(meta.author.as_deref(), Some("Austen, Jane, 1775-1817"));
        assert_eq!(
            meta.image_url.as_deref(),
            Some("https://www.gutenberg.org/cache/epub/1342/pg1342.cover.medium.jpg")
        );
        assert_eq!(
            meta.description.as_deref(),
            Some(
                "\"Pride and Prejudice\" by Jane Austen is a classic novel written in the early \
                 19th century. The story follows Elizabeth Bennet & her sisters as they navigate \
                 love and class."
            )
        );
    }

    #[test]
    fn test_title_falls_back_to_title_tag() {
        let html = "<html><title>Hamlet | Project Gutenberg</title></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Hamlet"));
    }

    #[test]
    fn test_title_rejects_site_name() {
        let html = "<html><title>Project Gutenberg</title></html>";
        assert_eq!(extract_title(html), None);
    }

    #[test]
    fn test_author_exclusion_moves_to_next_pattern() {
        let html = r#"<span itemprop="creator">Project Gutenberg</span>
            <a href="/ebooks/author/37">Doyle, Arthur Conan</a>"#;
        assert_eq!(extract_author(html).as_deref(), Some("Doyle, Arthur Conan"));
    }

    #[test]
    fn test_author_broad_fallback() {
        let html = "<p>A tale by Mary Shelley\n</p>";
        assert_eq!(extract_author(html).as_deref(), Some("Mary Shelley"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let meta = extract_metadata("<html><body>nothing here</body></html>", BASE);
        assert_eq!(meta, ScrapedMetadata::default());
    }

    #[test]
    fn test_description_rejects_boilerplate_and_short_text() {
        let boiler = r#"<meta name="description" content="Free kindle book and epub digitized and proofread by volunteers.">"#;
        assert_eq!(extract_description(boiler), None);

        let short = r#"<meta name="description" content="A short note.">"#;
        assert_eq!(extract_description(short), None);
    }

    #[test]
    fn test_description_falls_back_to_meta() {
        let html = r#"<meta property="og:description" content="A creature assembled from corpses turns on the scientist who made him, in this gothic tale.">"#;
        assert!(extract_description(html)
            .unwrap()
            .starts_with("A creature assembled"));
    }

    #[test]
    fn test_accented_names_are_decoded() {
        let html = "<html><title>Les Mis&eacute;rables &hellip; Bront&euml; | Project Gutenberg</title></html>";
        assert_eq!(
            extract_title(html).as_deref(),
            Some("Les Mis\u{e9}rables \u{2026} Bront\u{eb}")
        );
    }

    #[test]
    fn test_description_strips_nested_markup() {
        let html = "<th>Summary</th><td><p>Jean Valjean, freed after nineteen years, breaks parole</p>\
            <p>and is hunted by Javert through &#8220;Paris&#x201D;.</p></td>";
        assert_eq!(
            extract_description(html).as_deref(),
            Some(
                "Jean Valjean, freed after nineteen years, breaks parole and is hunted by \
                 Javert through \u{201c}Paris\u{201d}."
            )
        );
    }

    #[test]
    fn test_resolve_url() {
        let resolve = |src| resolve_url(BASE, src);
        assert_eq!(resolve("/a.jpg").as_deref(), Some("https://www.gutenberg.org/a.jpg"));
        assert_eq!(resolve("a.jpg").as_deref(), Some("https://www.gutenberg.org/a.jpg"));
        assert_eq!(resolve("//cdn.org/a.jpg").as_deref(), Some("https://cdn.org/a.jpg"));
        assert_eq!(resolve("http://x.org/a.jpg").as_deref(), Some("http://x.org/a.jpg"));
        assert_eq!(
            resolve("../files/1342/cover.jpg").as_deref(),
            Some("https://www.gutenberg.org/files/1342/cover.jpg")
        );
        assert_eq!(
            resolve_url("https://www.gutenberg.org/ebooks/1342", "../cache/cover.jpg").as_deref(),
            Some("https://www.gutenberg.org/cache/cover.jpg")
        );
    }

    #[test]
    fn test_unresolvable_base_drops_cover() {
        assert_eq!(resolve_url("not a url", "/a.jpg"), None);
        let html = r#"<img class="cover-art" src="/a.jpg">"#;
        assert_eq!(extract_image_url(html, "not a url"), None);
    }

    #[test]
    fn test_html_text_decodes_entities_once() {
        assert_eq!(html_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_text("&amp;lt;"), "&lt;");
    }
}
