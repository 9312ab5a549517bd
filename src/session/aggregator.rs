//! Session state aggregation.
//!
//! A session accumulates the per-source results of one streaming request
//! into a single snapshot: an ordered list of source panels, a progress
//! counter, and a bounded activity log. The aggregator is a plain state
//! machine driven by [`StreamMessage`]s; all I/O and task management lives
//! in the controller.

use chrono::{DateTime, Local, Utc};

use crate::models::{Article, SessionParams, SourceResult, SourceStatus, StreamKind};
use crate::stream::{ProgressReport, StreamMessage};

/// Maximum number of retained activity log entries.
pub const MAX_LOG_ENTRIES: usize = 50;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, no request issued yet
    Idle,
    /// Request issued, no bytes received yet
    Requesting,
    /// Receiving stream messages
    Streaming,
    /// Stream ended normally (or closed early with partial data)
    Completed,
    /// Stream ended with an error
    Failed,
    /// Superseded or cancelled by the user
    Cancelled,
}

impl SessionPhase {
    /// Whether the session can still change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionPhase::Completed | SessionPhase::Failed | SessionPhase::Cancelled
        )
    }
}

/// Integer progress counter shown to the user.
///
/// The wire carries a float percentage; we recompute an integer from the
/// counters so display never depends on backend rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub completed: u32,
    pub total: u32,
    pub percentage: u8,
}

impl ProgressSnapshot {
    pub fn new(completed: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            let pct = (completed as f64 / total as f64) * 100.0;
            pct.round().clamp(0.0, 100.0) as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed {
        total_articles: usize,
        sources_completed: u32,
    },
    Failed {
        reason: String,
    },
    Cancelled,
}

/// What applying a message to the session changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// A source panel was added or replaced
    SourceUpdated,
    /// Only the log (and possibly progress) changed
    LogOnly,
    /// The session reached a terminal phase
    Terminal(SessionOutcome),
    /// Message arrived after a terminal phase and was dropped
    Ignored,
}

/// Accumulated state of one streaming session.
#[derive(Debug, Clone)]
pub struct SessionState {
    generation: u64,
    kind: StreamKind,
    params: SessionParams,
    phase: SessionPhase,
    started_at: DateTime<Utc>,
    sources: Vec<SourceResult>,
    progress: ProgressSnapshot,
    log: Vec<String>,
    outcome: Option<SessionOutcome>,
}

impl SessionState {
    pub fn new(generation: u64, params: &SessionParams) -> Self {
        let total = params.sources().requested_count().unwrap_or(0);
        let mut state = Self {
            generation,
            kind: params.kind(),
            params: params.clone(),
            phase: SessionPhase::Idle,
            started_at: Utc::now(),
            sources: Vec::new(),
            progress: ProgressSnapshot::new(0, total as u32),
            log: Vec::new(),
            outcome: None,
        };
        match params {
            SessionParams::Trending(p) => {
                state.push_log(format!("Fetching trending news: {}", p.category));
            }
            SessionParams::Search(p) => {
                state.push_log(format!("Searching for '{}' (page {})", p.query, p.page));
            }
        }
        state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn sources(&self) -> &[SourceResult] {
        &self.sources
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// Total articles across all source panels.
    pub fn total_articles(&self) -> usize {
        self.sources.iter().map(SourceResult::article_count).sum()
    }

    /// Mark the request as issued.
    pub fn mark_requesting(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = SessionPhase::Requesting;
        }
    }

    /// Apply one stream message to the session.
    pub fn apply(&mut self, message: StreamMessage) -> Applied {
        if self.phase.is_terminal() {
            return Applied::Ignored;
        }
        self.phase = SessionPhase::Streaming;

        match message {
            StreamMessage::Start {
                category,
                query,
                sources,
                ..
            } => {
                // When the request asked for "all" the total stays unknown
                // until a progress report names the fan-out; an explicit
                // echoed list pins it immediately.
                if self.progress.total == 0 {
                    if let Some(echoed) = sources.as_deref() {
                        if echoed != "all" && !echoed.is_empty() {
                            let count = echoed.split(',').filter(|s| !s.trim().is_empty()).count();
                            self.progress = ProgressSnapshot::new(0, count as u32);
                        }
                    }
                }
                // The start entry announces what the backend is actually
                // serving, echoed from the message itself.
                let entry = match (query, category) {
                    (Some(query), _) => format!("Stream started: search '{}'", query),
                    (None, Some(category)) => format!("Stream started: trending {}", category),
                    (None, None) => "Stream started".to_string(),
                };
                self.push_log(entry);
                Applied::LogOnly
            }
            StreamMessage::SourceComplete {
                source,
                source_key,
                articles,
                progress,
                ..
            } => {
                let count = articles.len();
                self.push_log(format!("{}: {} articles", source, count));
                self.upsert_source(source, source_key, SourceStatus::Complete, None, articles);
                self.update_progress(progress.as_ref());
                Applied::SourceUpdated
            }
            StreamMessage::SourceEmpty {
                source,
                source_key,
                message,
                progress,
                ..
            } => {
                self.push_log(format!("{}: no matching articles", source));
                self.upsert_source(source, source_key, SourceStatus::Empty, message, Vec::new());
                self.update_progress(progress.as_ref());
                Applied::SourceUpdated
            }
            StreamMessage::SourceTimeout {
                source,
                source_key,
                message,
                progress,
                ..
            } => {
                self.push_log(format!("{}: timed out", source));
                self.upsert_source(source, source_key, SourceStatus::Timeout, message, Vec::new());
                self.update_progress(progress.as_ref());
                Applied::SourceUpdated
            }
            StreamMessage::SourceError {
                source,
                source_key,
                message,
                progress,
                ..
            } => {
                let detail = message.unwrap_or_else(|| "unknown error".to_string());
                self.push_log(format!("{}: error: {}", source, detail));
                self.upsert_source(
                    source,
                    source_key,
                    SourceStatus::Error,
                    Some(detail),
                    Vec::new(),
                );
                self.update_progress(progress.as_ref());
                Applied::SourceUpdated
            }
            StreamMessage::Complete {
                total_completed, ..
            } => {
                let sources_completed =
                    total_completed.unwrap_or(self.sources.len() as u32);
                // The terminal message closes out progress even if a
                // per-source update was lost along the way.
                self.progress = ProgressSnapshot::new(
                    self.progress.total.max(sources_completed),
                    self.progress.total.max(sources_completed),
                );
                let total_articles = self.total_articles();
                self.push_log(format!(
                    "Done: {} articles from {} sources",
                    total_articles, sources_completed
                ));
                self.phase = SessionPhase::Completed;
                let outcome = SessionOutcome::Completed {
                    total_articles,
                    sources_completed,
                };
                self.outcome = Some(outcome.clone());
                Applied::Terminal(outcome)
            }
            StreamMessage::Error { message, .. } => {
                self.push_log(format!("Stream failed: {}", message));
                self.phase = SessionPhase::Failed;
                let outcome = SessionOutcome::Failed { reason: message };
                self.outcome = Some(outcome.clone());
                Applied::Terminal(outcome)
            }
        }
    }

    /// Finalize a stream that closed before its terminal message.
    ///
    /// Partial results are still useful, so an early close counts as
    /// completion with whatever arrived.
    pub fn finalize_early_close(&mut self) -> Applied {
        if self.phase.is_terminal() {
            return Applied::Ignored;
        }
        let total_articles = self.total_articles();
        self.push_log(format!(
            "Stream closed early: {} articles from {} sources",
            total_articles,
            self.sources.len()
        ));
        self.phase = SessionPhase::Completed;
        let outcome = SessionOutcome::Completed {
            total_articles,
            sources_completed: self.sources.len() as u32,
        };
        self.outcome = Some(outcome.clone());
        Applied::Terminal(outcome)
    }

    /// Fail the session with a transport or request error.
    pub fn fail(&mut self, reason: impl Into<String>) -> Applied {
        if self.phase.is_terminal() {
            return Applied::Ignored;
        }
        let reason = reason.into();
        self.push_log(format!("Request failed: {}", reason));
        self.phase = SessionPhase::Failed;
        let outcome = SessionOutcome::Failed { reason };
        self.outcome = Some(outcome.clone());
        Applied::Terminal(outcome)
    }

    /// Cancel the session.
    pub fn cancel(&mut self) -> Applied {
        if self.phase.is_terminal() {
            return Applied::Ignored;
        }
        self.push_log("Cancelled".to_string());
        self.phase = SessionPhase::Cancelled;
        self.outcome = Some(SessionOutcome::Cancelled);
        Applied::Terminal(SessionOutcome::Cancelled)
    }

    /// Insert or replace a source panel.
    ///
    /// Sources are keyed by their stable key and keep first-arrival order;
    /// a repeated event for the same source overwrites in place so the
    /// update is idempotent.
    fn upsert_source(
        &mut self,
        name: String,
        key: Option<String>,
        status: SourceStatus,
        message: Option<String>,
        articles: Vec<Article>,
    ) {
        let key = key.unwrap_or_else(|| name.to_lowercase().replace(' ', ""));
        let result = SourceResult::new(key.clone(), name, status, articles).with_message(message);
        if let Some(existing) = self.sources.iter_mut().find(|s| s.source_key == key) {
            *existing = result;
        } else {
            self.sources.push(result);
        }
    }

    /// Advance the progress counter, never backwards.
    fn update_progress(&mut self, report: Option<&ProgressReport>) {
        let terminal_count = self.sources.len() as u32;
        let (mut completed, mut total) = (self.progress.completed, self.progress.total);
        if let Some(report) = report {
            completed = completed.max(report.completed);
            total = total.max(report.total);
        }
        completed = completed.max(terminal_count);
        total = total.max(completed);
        self.progress = ProgressSnapshot::new(completed, total);
    }

    fn push_log(&mut self, entry: String) {
        let stamped = format!("[{}] {}", Local::now().format("%H:%M:%S"), entry);
        self.log.push(stamped);
        if self.log.len() > MAX_LOG_ENTRIES {
            let overflow = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(..overflow);
        }
    }
}
