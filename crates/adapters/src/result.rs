// ABOUTME: ExtractionResult struct holding the finalized output of one page extraction.
// ABOUTME: Includes the document type classification and convenience accessors.

use serde::{Deserialize, Serialize};

use crate::context::Meta;

/// Coarse classification of a page, read from its OpenGraph type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Article,
    Video,
    Photo,
}

impl DocumentType {
    /// Classify from a `graph.type` value.
    pub fn from_graph_type(value: Option<&str>) -> Self {
        let Some(value) = value.map(|v| v.trim().to_lowercase()) else {
            return DocumentType::Article;
        };
        if value.starts_with("video") {
            DocumentType::Video
        } else if value == "photo" || value.starts_with("image") {
            DocumentType::Photo
        } else {
            DocumentType::Article
        }
    }

    /// Whether readability runs by default for this type.
    pub fn wants_readability(self) -> bool {
        self == DocumentType::Article
    }
}

/// The result of extracting a page.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionResult {
    pub url: String,
    pub domain: String,
    pub title: String,
    pub description: Option<String>,
    pub site_name: Option<String>,
    pub language: Option<String>,
    pub document_type: DocumentType,
    /// Length in seconds, for media with a known duration.
    pub duration: Option<u64>,
    pub content: String,
    pub word_count: usize,
    /// Whether readability ran over the final HTML.
    pub readability: bool,
    pub meta: Meta,
}

impl ExtractionResult {
    /// Returns true if the result has no meaningful content.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_from_graph_type() {
        assert_eq!(DocumentType::from_graph_type(None), DocumentType::Article);
        assert_eq!(
            DocumentType::from_graph_type(Some("video.other")),
            DocumentType::Video
        );
        assert_eq!(DocumentType::from_graph_type(Some("Photo")), DocumentType::Photo);
        assert_eq!(
            DocumentType::from_graph_type(Some("article")),
            DocumentType::Article
        );
        assert!(DocumentType::Article.wants_readability());
        assert!(!DocumentType::Video.wants_readability());
    }

    #[test]
    fn test_is_empty() {
        let mut result = ExtractionResult::default();
        assert!(result.is_empty());
        result.content = "Has content".to_string();
        assert!(!result.is_empty());
    }
}
