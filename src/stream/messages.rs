//! Stream message types.
//!
//! Contains the `StreamMessage` enum with all message variants the backend
//! emits on its `data:` lines, for both the trending and search stream
//! endpoints. The two endpoints share one envelope shape and differ only in
//! which optional fields they populate.

use serde::Deserialize;

use crate::models::Article;

/// Progress object attached to per-source messages.
///
/// The backend sends `percentage` with one decimal place; consumers should
/// use [`ProgressReport::rounded_percentage`] for the integer form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressReport {
    pub completed: u32,
    pub total: u32,
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl ProgressReport {
    /// Integer percentage in [0, 100], recomputed from the counters so a
    /// fractional wire value never leaks through.
    pub fn rounded_percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.completed as f64 / self.total as f64) * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }
}

/// Typed messages from the streaming news endpoints.
///
/// Discriminated by the `type` field of each `data:` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Session opened; echoes the request parameters back.
    Start {
        /// Trending streams echo the category.
        #[serde(default)]
        category: Option<String>,
        /// Search streams echo the query.
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        per_site_limit: Option<u32>,
        #[serde(default)]
        sort: Option<String>,
        #[serde(default)]
        sources: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// One source finished with articles.
    SourceComplete {
        source: String,
        #[serde(default)]
        source_key: Option<String>,
        #[serde(default)]
        articles: Vec<Article>,
        #[serde(default)]
        article_count: Option<u32>,
        #[serde(default)]
        progress: Option<ProgressReport>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// One source finished with no matching articles.
    SourceEmpty {
        source: String,
        #[serde(default)]
        source_key: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        progress: Option<ProgressReport>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// One source missed the backend's deadline.
    SourceTimeout {
        source: String,
        #[serde(default)]
        source_key: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        progress: Option<ProgressReport>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// One source failed.
    SourceError {
        source: String,
        #[serde(default)]
        source_key: Option<String>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        progress: Option<ProgressReport>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// All sources processed; session succeeded.
    Complete {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        total_completed: Option<u32>,
        #[serde(default)]
        total_articles: Option<u32>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    /// Session-level failure signaled by the backend.
    Error {
        message: String,
        #[serde(default)]
        timestamp: Option<String>,
    },
}

impl StreamMessage {
    /// Wire values of the `type` discriminant, in protocol order.
    pub const KNOWN_TYPES: [&'static str; 7] = [
        "start",
        "source_complete",
        "source_empty",
        "source_timeout",
        "source_error",
        "complete",
        "error",
    ];

    /// The message type name as it appears on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            StreamMessage::Start { .. } => "start",
            StreamMessage::SourceComplete { .. } => "source_complete",
            StreamMessage::SourceEmpty { .. } => "source_empty",
            StreamMessage::SourceTimeout { .. } => "source_timeout",
            StreamMessage::SourceError { .. } => "source_error",
            StreamMessage::Complete { .. } => "complete",
            StreamMessage::Error { .. } => "error",
        }
    }

    /// Whether this message ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamMessage::Complete { .. } | StreamMessage::Error { .. }
        )
    }
}
