//! Article record passed through from the backend.
//!
//! The client never inspects article contents beyond carrying them to the
//! caller; field names match the backend wire format exactly.

use serde::{Deserialize, Serialize};

/// One news article as delivered by a source.
///
/// Optional fields are omitted by some sources (e.g. only search results
/// carry a relevance score), so everything beyond the core fields defaults
/// to `None` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub published_date: String,
    /// Display name of the originating site (e.g. "BBC News").
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub scraped_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserialize_minimal() {
        let json = r#"{"title":"A","url":"u","source":"BBC"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "A");
        assert_eq!(article.source, "BBC");
        assert!(article.summary.is_empty());
        assert!(article.relevance_score.is_none());
    }

    #[test]
    fn test_article_deserialize_full() {
        let json = r#"{
            "title": "Breaking",
            "url": "https://example.com/a",
            "summary": "Summary text",
            "published_date": "2025-01-15T08:00:00",
            "source": "SCMP",
            "category": "business",
            "scraped_at": "2025-01-15T08:05:00",
            "relevance_score": 0.92,
            "image_url": "https://example.com/a.jpg"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.category.as_deref(), Some("business"));
        assert_eq!(article.relevance_score, Some(0.92));
    }

    #[test]
    fn test_article_tolerates_unknown_fields() {
        let json = r#"{"title":"A","url":"u","source":"BBC","word_count":812}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "A");
    }
}
