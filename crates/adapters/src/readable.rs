// ABOUTME: Compact readable-content step run when the context asks for readability.
// ABOUTME: Picks the densest article-like container by text length and link density.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static CANDIDATES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article, main, [role='main'], section, div").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Share of an element's text that sits inside links, in `[0, 1]`.
pub fn link_density(element: &ElementRef) -> f64 {
    let total_len = element.text().map(str::len).sum::<usize>();
    if total_len == 0 {
        return 0.0;
    }

    let link_text_len: usize = element
        .select(&LINKS)
        .map(|a| a.text().map(str::len).sum::<usize>())
        .sum();

    link_text_len as f64 / total_len as f64
}

/// True when the element or one of its ancestors is hidden by attribute or inline style.
fn is_hidden(element: &ElementRef) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| {
            if el.value().attr("hidden").is_some() {
                return true;
            }
            el.value().attr("style").is_some_and(|style| {
                let style: String = style
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_lowercase();
                style.contains("visibility:hidden") || style.contains("display:none")
            })
        })
}

fn score(element: &ElementRef) -> f64 {
    let text_len = element
        .text()
        .map(|t| t.trim().len())
        .sum::<usize>() as f64;
    text_len * (1.0 - link_density(element))
}

/// Return the inner HTML of the best visible content container in `html`.
///
/// The first candidate wins ties, so an outer wrapper is preferred over an
/// inner one holding the same text. Falls back to `<body>`; returns `None`
/// when the document has no text at all.
pub fn readable_content(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    let mut best: Option<ElementRef> = None;
    let mut best_score = 0.0;
    for el in doc.select(&CANDIDATES) {
        if is_hidden(&el) {
            continue;
        }
        let s = score(&el);
        if s > best_score {
            best_score = s;
            best = Some(el);
        }
    }

    let chosen = best.or_else(|| doc.select(&BODY).next())?;
    let inner = chosen.inner_html();
    if inner.trim().is_empty() {
        None
    } else {
        Some(inner.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_text_over_navigation() {
        let html = r#"<html><body>
            <div id="nav"><a href="/a">Home</a> <a href="/b">About us and more links here</a></div>
            <article><p>This is the real article body with a fair amount of text.</p></article>
        </body></html>"#;
        let content = readable_content(html).unwrap();
        assert!(content.contains("real article body"));
        assert!(!content.contains("About us"));
    }

    #[test]
    fn synthetic_transcript_section_is_selected() {
        let html = "<section id=\"main\"><p>Hello<br>\nworld</p></section>";
        let content = readable_content(html).unwrap();
        assert_eq!(content, "<p>Hello<br>\nworld</p>");
    }

    #[test]
    fn hidden_containers_are_skipped() {
        let html = r#"<html><body>
            <div style="visibility: hidden;"><p>A much longer hidden article body text.</p></div>
            <div><p>Short footer</p></div>
        </body></html>"#;
        let content = readable_content(html).unwrap();
        assert_eq!(content, "<p>Short footer</p>");
    }

    #[test]
    fn falls_back_to_body() {
        let content = readable_content("<html><body><p>Just a paragraph</p></body></html>");
        assert_eq!(content.as_deref(), Some("<p>Just a paragraph</p>"));
    }

    #[test]
    fn empty_document_has_no_content() {
        assert!(readable_content("<html><body></body></html>").is_none());
    }

    #[test]
    fn link_density_of_link_only_block_is_one() {
        let doc = Html::parse_fragment(r#"<div><a href="/x">only a link</a></div>"#);
        let sel = Selector::parse("div").unwrap();
        let div = doc.select(&sel).next().unwrap();
        assert_eq!(link_density(&div), 1.0);
    }
}
