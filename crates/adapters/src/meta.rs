// ABOUTME: Collects page metadata into the Meta multimap before the metadata phase runs.
// ABOUTME: Maps <title>, <html lang>, meta name/property tags and itemprop microdata to prefixed keys.

//! Page metadata collection.
//!
//! Keys are namespaced by origin:
//! - `html.*`: `<title>`, `<html lang>` and `<meta name>` tags;
//! - `twitter.*`: `<meta name="twitter:...">`;
//! - `graph.*`: OpenGraph `<meta property="og:...">`;
//! - `schema.*`: microdata `itemprop` values.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::context::Meta;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static HTML_LANG: Lazy<Selector> = Lazy::new(|| Selector::parse("html[lang]").unwrap());
static META_NAME: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name][content]").unwrap());
static META_PROPERTY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property][content]").unwrap());
static ITEMPROP: Lazy<Selector> = Lazy::new(|| Selector::parse("[itemprop]").unwrap());

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_non_empty(meta: &mut Meta, key: String, value: &str) {
    let value = normalize_whitespace(value);
    if !value.is_empty() {
        meta.push(key, value);
    }
}

/// Extract all known metadata from a parsed document.
pub fn extract_meta(doc: &Html) -> Meta {
    let mut meta = Meta::new();

    if let Some(title) = doc.select(&TITLE).next() {
        let text: String = title.text().collect();
        push_non_empty(&mut meta, "html.title".to_string(), &text);
    }

    if let Some(lang) = doc
        .select(&HTML_LANG)
        .next()
        .and_then(|el| el.value().attr("lang"))
    {
        push_non_empty(&mut meta, "html.lang".to_string(), lang);
    }

    for el in doc.select(&META_NAME) {
        let (Some(name), Some(content)) = (el.value().attr("name"), el.value().attr("content"))
        else {
            continue;
        };
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        let key = match name.strip_prefix("twitter:") {
            Some(rest) => format!("twitter.{}", rest),
            None => format!("html.{}", name),
        };
        push_non_empty(&mut meta, key, content);
    }

    for el in doc.select(&META_PROPERTY) {
        let (Some(property), Some(content)) =
            (el.value().attr("property"), el.value().attr("content"))
        else {
            continue;
        };
        let property = property.trim().to_lowercase();
        if let Some(rest) = property.strip_prefix("og:") {
            push_non_empty(&mut meta, format!("graph.{}", rest), content);
        } else if let Some(rest) = property.strip_prefix("twitter:") {
            push_non_empty(&mut meta, format!("twitter.{}", rest), content);
        }
    }

    for el in doc.select(&ITEMPROP) {
        let Some(value) = el.value().attr("content").or_else(|| el.value().attr("href")) else {
            continue;
        };
        // itemprop may hold several space separated names
        for prop in el.value().attr("itemprop").unwrap_or_default().split_whitespace() {
            push_non_empty(&mut meta, format!("schema.{}", prop.to_lowercase()), value);
        }
    }

    meta
}
