//! HTML extraction into crawl records
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - h1-h3 headings and paragraph text
//! - The `keywords` meta tag
//! - Links to follow (from `<a>` tags)

use crate::record::{CrawlRecord, RecordMetadata, DEFAULT_TITLE};
use crate::url::resolve_link;
use crate::CrawlerError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const HEADING_SELECTOR: &str = "h1, h2, h3";
const PARAGRAPH_SELECTOR: &str = "p";
const KEYWORDS_SELECTOR: &str = r#"meta[name="keywords"][content]"#;
const LINK_SELECTOR: &str = "a[href]";

/// Separator between entries of the `keywords` meta tag
const KEYWORD_SEPARATOR: &str = ", ";

fn selector(css: &str, url: &str) -> Result<Selector, CrawlerError> {
    Selector::parse(css).map_err(|e| CrawlerError::HtmlParse {
        url: url.to_string(),
        message: format!("invalid selector {:?}: {:?}", css, e),
    })
}

/// Text nodes of an element, each trimmed, concatenated without separators
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Extracts a crawl record from a fetched page
///
/// # Extraction Rules
///
/// - **title**: trimmed text of the first `<title>`; [`DEFAULT_TITLE`] if it
///   is missing or empty
/// - **headings**: every `h1`, `h2` and `h3` in document order
/// - **content**: every `<p>`, one per line
/// - **keywords**: the last `<meta name="keywords">` split on `", "`; empty
///   when the tag is absent or blank
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `url` - The URL the page was fetched from, stored on the record
///
/// # Example
///
/// ```
/// use orpheus_crawler::crawler::extract_record;
///
/// let html = r#"<html><head><title> Test </title></head><body><p>Hi</p></body></html>"#;
/// let record = extract_record(html, "https://example.com/").unwrap();
/// assert_eq!(record.title, "Test");
/// assert_eq!(record.content, "Hi");
/// ```
pub fn extract_record(html: &str, url: &str) -> Result<CrawlRecord, CrawlerError> {
    let document = Html::parse_document(html);

    let title = extract_title(&document, url)?;

    let heading_selector = selector(HEADING_SELECTOR, url)?;
    let headings = document.select(&heading_selector).map(stripped_text).collect();

    let paragraph_selector = selector(PARAGRAPH_SELECTOR, url)?;
    let content = document
        .select(&paragraph_selector)
        .map(stripped_text)
        .collect::<Vec<_>>()
        .join("\n");

    let keywords = extract_keywords(&document, url)?;

    Ok(CrawlRecord::new(
        url,
        title,
        content,
        RecordMetadata { headings, keywords },
    ))
}

fn extract_title(document: &Html, url: &str) -> Result<String, CrawlerError> {
    let title_selector = selector("title", url)?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Ok(title)
}

fn extract_keywords(document: &Html, url: &str) -> Result<Vec<String>, CrawlerError> {
    let keywords_selector = selector(KEYWORDS_SELECTOR, url)?;

    let keywords: Vec<String> = document
        .select(&keywords_selector)
        .filter_map(|element| element.value().attr("content"))
        .last()
        .filter(|content| !content.is_empty())
        .map(|content| content.split(KEYWORD_SEPARATOR).map(String::from).collect())
        .unwrap_or_default();

    Ok(keywords)
}

/// Extracts all followable links from a page
///
/// Every `<a href>` is resolved against `base_url` with [`resolve_link`].
/// Scope filtering happens later in the frontier.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(a_selector) = Selector::parse(LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}
