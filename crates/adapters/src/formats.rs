// ABOUTME: Output format converters for readable content.
// ABOUTME: Sanitizes HTML and converts it to Markdown or plain text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?\s*>").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());
static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());

/// Sanitize HTML using an article-oriented ammonia policy.
///
/// Allowed elements: p, br, strong, b, em, i, u, h1-h6, ul, ol, li, blockquote, pre, code,
/// img, a, span, div, section.
pub fn sanitize_html(html: &str) -> String {
    let allowed_tags = [
        "p", "br", "strong", "b", "em", "i", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol",
        "li", "blockquote", "pre", "code", "img", "a", "span", "div", "section",
    ];

    let mut builder = ammonia::Builder::new();
    builder.tags(allowed_tags.iter().copied().collect());

    builder.add_tag_attributes("a", &["href"]);
    builder.add_tag_attributes("img", &["src", "alt", "width", "height", "srcset", "sizes"]);
    builder.add_tag_attributes("div", &["class", "id"]);
    builder.add_tag_attributes("section", &["id"]);
    builder.add_tag_attributes("span", &["class", "id"]);
    builder.add_tag_attributes("p", &["class"]);
    for h in &["h1", "h2", "h3", "h4", "h5", "h6"] {
        builder.add_tag_attributes(h, &["id"]);
    }

    builder
        .url_schemes(["http", "https", "mailto"].iter().copied().collect())
        .clean(html)
        .to_string()
}

/// Convert HTML to Markdown using htmd.
///
/// On conversion error, returns the preprocessed HTML unchanged.
pub fn html_to_markdown(html: &str) -> String {
    let preprocessed = BR_TAG.replace_all(html, "\n");

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript"])
        .build();

    let md = converter
        .convert(&preprocessed)
        .unwrap_or_else(|_| preprocessed.to_string());

    BLANK_LINES.replace_all(&md, "\n\n").trim().to_string()
}

/// Convert HTML to plain text. `<br>` becomes a newline, runs of blank
/// lines collapse to one.
pub fn html_to_text(html: &str) -> String {
    let preprocessed = BR_TAG.replace_all(html, "\n");

    let document = Html::parse_document(&preprocessed);
    let raw_text: String = document.root_element().text().collect::<Vec<_>>().join(" ");

    let normalized = HORIZONTAL_SPACE.replace_all(&raw_text, " ");
    let collapsed = NEWLINES.replace_all(&normalized, "\n");

    collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Count words in a text string using whitespace splitting.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
