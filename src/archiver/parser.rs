//! Readable content extraction
//!
//! The body goes through spider_transformations' readability pass, which
//! keeps the main content and drops navigation, scripts and other chrome.
//! The title comes from the `<title>` tag, falling back to the first `<h1>`.

use scraper::{Html, Selector};
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};

/// Content pulled out of an HTML page
#[derive(Debug, Clone, PartialEq)]
pub struct ReadablePage {
    /// Page title, empty when none was found
    pub title: String,

    /// Cleaned HTML of the main content
    pub content: String,
}

/// Extracts the title and main content from an HTML document
///
/// `url` is the page's own address, used to resolve relative links.
///
/// # Returns
///
/// * `Ok(ReadablePage)` - Content found
/// * `Err(String)` - The document has no readable text
pub fn extract_readable(html: &str, url: Option<&str>) -> Result<ReadablePage, String> {
    let (title, has_text) = {
        let document = Html::parse_document(html);
        (
            extract_title(&document).unwrap_or_default(),
            has_body_text(&document),
        )
    };

    if !has_text {
        return Err("no readable content found".to_string());
    }

    let content = readable_html(html.as_bytes(), url).trim().to_string();
    if content.is_empty() {
        return Err("readability pass produced no content".to_string());
    }

    Ok(ReadablePage { title, content })
}

/// Runs readability over raw HTML and returns the cleaned HTML
fn readable_html(html: &[u8], url: Option<&str>) -> String {
    let parsed_url = url.and_then(|u| url::Url::parse(u).ok());
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Raw,
        filter_images: false,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html,
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };

    transform_content_input(input, &config)
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        document
            .select(&selector)
            .next()
            .map(|element| normalize_whitespace(&element.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    })
}

fn has_body_text(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("body") else {
        return false;
    };
    document
        .select(&selector)
        .next()
        .is_some_and(|body| body.text().any(|t| !t.trim().is_empty()))
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
