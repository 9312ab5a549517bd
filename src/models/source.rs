//! Per-source result types.
//!
//! Each upstream site contributes one terminal outcome per session; the
//! aggregator keys results by `source_key` and keeps them in first-arrival
//! order.

use chrono::{DateTime, Utc};

use super::Article;

/// Terminal status of a single source within a session.
///
/// These are per-source outcomes; none of them affects whether the session
/// itself completes successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// The source returned articles.
    Complete,
    /// The source responded but had nothing for this query/category/page.
    Empty,
    /// The source did not respond within the backend's deadline.
    Timeout,
    /// The source failed outright.
    Error,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStatus::Complete => "complete",
            SourceStatus::Empty => "empty",
            SourceStatus::Timeout => "timeout",
            SourceStatus::Error => "error",
        }
    }
}

/// One source's contribution to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResult {
    /// Stable key used for merging (`bbc`, `scmp`, ...).
    pub source_key: String,
    /// Display name (`BBC News`, `SCMP`, ...).
    pub source: String,
    pub status: SourceStatus,
    /// Backend detail for empty/timeout/error outcomes.
    pub message: Option<String>,
    /// Empty unless `status` is `Complete`.
    pub articles: Vec<Article>,
    pub received_at: DateTime<Utc>,
}

impl SourceResult {
    pub fn new(
        source_key: impl Into<String>,
        source: impl Into<String>,
        status: SourceStatus,
        articles: Vec<Article>,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            source: source.into(),
            status,
            message: None,
            articles,
            received_at: Utc::now(),
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }
}
