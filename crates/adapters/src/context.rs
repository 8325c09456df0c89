// ABOUTME: Per-extraction mutable state threaded through adapter hooks.
// ABOUTME: Defines ExtractionContext, the Meta multimap, and host/domain derivation.

//! Extraction context.
//!
//! One [`ExtractionContext`] exists per page extraction. The pipeline owns
//! it for the duration of the request and lends it mutably to each adapter
//! hook in turn. Field ownership:
//!
//! - `host`, `domain`, `url`: set at creation, read-only afterwards.
//! - `http_headers`, `replace_strings`: written during the config phase,
//!   consumed by the page fetch.
//! - `meta`, `html`: filled by the pipeline after the fetch, then read and
//!   rewritten by the meta phase.
//! - `readability`: seeded by the pipeline from the document type; an
//!   adapter sets it to request a readability pass over its synthetic `html`.

use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ExtractError;

/// Second-level labels that form a public suffix together with a
/// two-letter country code (`co.uk`, `com.au`, ...).
const GENERIC_SECOND_LEVEL: &[&str] = &["co", "com", "org", "net", "ac", "gov", "edu", "ne", "or"];

/// Metadata collected from a page: every key maps to an ordered list of values.
///
/// A missing key reads as an empty list, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(BTreeMap<String, Vec<String>>);

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `key`, empty when the key is absent.
    pub fn get(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value for `key`, if any.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).first().map(String::as_str)
    }

    /// Replaces all values for `key`.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), values);
    }

    /// Appends one value to `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The mutable state of one page extraction.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub url: Url,
    pub host: String,
    pub domain: String,
    pub meta: Meta,
    pub html: String,
    pub readability: bool,
    pub http_headers: HashMap<String, String>,
    pub replace_strings: Vec<(String, String)>,
}

impl ExtractionContext {
    /// Create a context for an http(s) URL.
    pub fn new(url: &str) -> Result<Self, ExtractError> {
        let parsed = Url::parse(url).map_err(|e| {
            ExtractError::invalid_url(url, "NewContext", Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ExtractError::invalid_url(
                url,
                "NewContext",
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        let host = parsed
            .host_str()
            .map(|h| h.trim_end_matches('.').to_lowercase())
            .ok_or_else(|| {
                ExtractError::invalid_url(url, "NewContext", Some(anyhow::anyhow!("missing host")))
            })?;
        let domain = registrable_domain(&host);

        Ok(Self {
            url: parsed,
            host,
            domain,
            meta: Meta::new(),
            html: String::new(),
            readability: true,
            http_headers: HashMap::new(),
            replace_strings: Vec::new(),
        })
    }

    /// Seed the outbound headers for the page fetch.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.http_headers = headers;
        self
    }

    /// Apply every (search, replacement) pair in order, replacing all
    /// occurrences verbatim.
    pub fn apply_replace_strings(&self, html: &str) -> String {
        let mut out = html.to_string();
        for (search, replacement) in &self.replace_strings {
            if search.is_empty() {
                continue;
            }
            out = out.replace(search.as_str(), replacement);
        }
        out
    }
}

/// Derive the registrable domain of a lowercased host name.
///
/// `www.youtube.com` -> `youtube.com`, `news.bbc.co.uk` -> `bbc.co.uk`.
/// IP addresses and single-label hosts are returned unchanged.
pub fn registrable_domain(host: &str) -> String {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() {
        return host.to_string();
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let tld = labels[labels.len() - 1];
    let sld = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && GENERIC_SECOND_LEVEL.contains(&sld) {
        3
    } else {
        2
    };
    labels[labels.len() - keep..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_derives_host_and_domain() {
        let ctx = ExtractionContext::new("https://www.YouTube.com/watch?v=abc").unwrap();
        assert_eq!(ctx.host, "www.youtube.com");
        assert_eq!(ctx.domain, "youtube.com");
        assert!(ctx.meta.is_empty());
        assert!(ctx.replace_strings.is_empty());
    }

    #[test]
    fn new_rejects_bad_urls() {
        assert!(ExtractionContext::new("not a url").unwrap_err().is_invalid_url());
        assert!(ExtractionContext::new("ftp://example.com/")
            .unwrap_err()
            .is_invalid_url());
    }

    #[test]
    fn registrable_domain_handles_country_suffixes() {
        assert_eq!(registrable_domain("mp.weixin.qq.com"), "qq.com");
        assert_eq!(registrable_domain("news.bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
        assert_eq!(registrable_domain("a.b.example.io"), "example.io");
    }

    #[test]
    fn meta_absent_key_is_empty() {
        let mut meta = Meta::new();
        assert!(meta.get("schema.identifier").is_empty());
        assert_eq!(meta.first("schema.identifier"), None);

        meta.push("html.author", "one");
        meta.push("html.author", "two");
        assert_eq!(meta.get("html.author"), ["one", "two"]);

        meta.set("html.author", vec!["three".to_string()]);
        assert_eq!(meta.first("html.author"), Some("three"));
    }

    #[test]
    fn replace_strings_apply_in_order() {
        let mut ctx = ExtractionContext::new("https://example.com/").unwrap();
        ctx.replace_strings
            .push(("hidden".to_string(), "visible".to_string()));
        ctx.replace_strings
            .push(("visible".to_string(), "shown".to_string()));

        let out = ctx.apply_replace_strings("a hidden b hidden");
        assert_eq!(out, "a shown b shown");
    }
}
