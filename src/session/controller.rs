//! Session lifecycle management.
//!
//! The controller owns the one "current" streaming session. Starting a new
//! session supersedes the previous one: its task is aborted and its updates
//! stop flowing. Every update carries the generation token of the session
//! that produced it, and the controller drops updates whose generation is no
//! longer current, so a consumer never sees results from a stale request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::NewsClient;
use crate::models::{SessionParams, SourceResult};
use crate::session::aggregator::{Applied, ProgressSnapshot, SessionOutcome, SessionState};

/// Delay before a newly started session issues its request.
///
/// Gives rapid successive starts (a user typing) a chance to supersede each
/// other before any network traffic happens.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Updates emitted by a running session.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// Incremental snapshot after a source event.
    Snapshot {
        generation: u64,
        sources: Vec<SourceResult>,
        progress: ProgressSnapshot,
        log: Vec<String>,
    },
    /// The session reached a terminal phase.
    Terminal {
        generation: u64,
        outcome: SessionOutcome,
        sources: Vec<SourceResult>,
        progress: ProgressSnapshot,
        log: Vec<String>,
    },
}

impl SessionUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            SessionUpdate::Snapshot { generation, .. } => *generation,
            SessionUpdate::Terminal { generation, .. } => *generation,
        }
    }
}

/// Owns the current streaming session and its background task.
pub struct SessionController {
    client: Arc<NewsClient>,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
    generation: Arc<AtomicU64>,
    /// Generation whose terminal update has been delivered (0 = none yet).
    terminal_generation: Arc<AtomicU64>,
    current: Option<JoinHandle<()>>,
    settle_delay: Duration,
}

impl SessionController {
    pub fn new(client: Arc<NewsClient>, update_tx: mpsc::UnboundedSender<SessionUpdate>) -> Self {
        Self {
            client,
            update_tx,
            generation: Arc::new(AtomicU64::new(0)),
            terminal_generation: Arc::new(AtomicU64::new(0)),
            current: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Override the settle delay (tests use zero).
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a session, superseding any session in flight. Returns the new
    /// session's generation token.
    pub fn start(&mut self, params: SessionParams) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.current.take() {
            debug!(generation, "superseding previous session");
            handle.abort();
        }

        let client = Arc::clone(&self.client);
        let update_tx = self.update_tx.clone();
        let current_generation = Arc::clone(&self.generation);
        let terminal_generation = Arc::clone(&self.terminal_generation);
        let settle_delay = self.settle_delay;

        let handle = tokio::spawn(async move {
            if !settle_delay.is_zero() {
                tokio::time::sleep(settle_delay).await;
            }
            let shared = SharedGenerations {
                current: current_generation,
                terminal: terminal_generation,
            };
            run_session(client, params, generation, shared, update_tx).await;
        });
        self.current = Some(handle);
        generation
    }

    /// Cancel the current session, if any. The terminal update is emitted
    /// here since the task is aborted rather than asked to wind down.
    ///
    /// A session that already delivered its terminal update gets nothing
    /// further: each generation sees exactly one terminal notification.
    pub fn cancel(&mut self) {
        let Some(handle) = self.current.take() else {
            return;
        };
        handle.abort();
        let generation = self.current_generation();
        // fetch_max claims the terminal slot for this generation; if the
        // session task got there first the claim fails and we stay silent.
        if self.terminal_generation.fetch_max(generation, Ordering::SeqCst) >= generation {
            debug!(generation, "cancel after terminal update; nothing to emit");
            return;
        }
        info!(generation, "session cancelled");
        let _ = self.update_tx.send(SessionUpdate::Terminal {
            generation,
            outcome: SessionOutcome::Cancelled,
            sources: Vec::new(),
            progress: ProgressSnapshot::default(),
            log: Vec::new(),
        });
    }

    /// Whether a session task is currently running.
    pub fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.abort();
        }
    }
}

/// Generation counters shared between the controller and session tasks.
struct SharedGenerations {
    /// The generation currently allowed to publish updates.
    current: Arc<AtomicU64>,
    /// Highest generation whose terminal update has been delivered.
    terminal: Arc<AtomicU64>,
}

/// Drive one session from request to terminal state.
async fn run_session(
    client: Arc<NewsClient>,
    params: SessionParams,
    generation: u64,
    shared: SharedGenerations,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
) {
    let mut state = SessionState::new(generation, &params);
    state.mark_requesting();

    let mut stream = match client.open_session_stream(&params).await {
        Ok(stream) => stream,
        Err(e) => {
            let applied = state.fail(e.to_string());
            emit(&state, applied, &shared, &update_tx);
            return;
        }
    };

    info!(generation, kind = params.kind().as_str(), "session streaming");

    while let Some(item) = stream.next().await {
        let applied = match item {
            Ok(message) => state.apply(message),
            // A transport failure mid-stream fails the session even if
            // partial results arrived; the consumer sees them in the
            // terminal snapshot.
            Err(e) => state.fail(e.to_string()),
        };
        let terminal = matches!(applied, Applied::Terminal(_));
        emit(&state, applied, &shared, &update_tx);
        if terminal {
            return;
        }
    }

    // EOF without a terminal message: keep what we have.
    let applied = state.finalize_early_close();
    emit(&state, applied, &shared, &update_tx);
}

/// Send an update unless this session has been superseded.
///
/// The generation check happens at the send boundary, after any await, so a
/// session that lost the race cannot publish even one late update. Terminal
/// updates additionally claim the generation's terminal slot, so between
/// this path and `cancel` at most one terminal is ever delivered.
fn emit(
    state: &SessionState,
    applied: Applied,
    shared: &SharedGenerations,
    update_tx: &mpsc::UnboundedSender<SessionUpdate>,
) {
    if shared.current.load(Ordering::SeqCst) != state.generation() {
        debug!(generation = state.generation(), "dropping update from superseded session");
        return;
    }
    let update = match applied {
        Applied::Terminal(outcome) => {
            let claimed = shared
                .terminal
                .fetch_max(state.generation(), Ordering::SeqCst)
                < state.generation();
            if !claimed {
                debug!(generation = state.generation(), "terminal already delivered");
                return;
            }
            SessionUpdate::Terminal {
                generation: state.generation(),
                outcome,
                sources: state.sources().to_vec(),
                progress: state.progress(),
                log: state.log().to_vec(),
            }
        }
        Applied::SourceUpdated | Applied::LogOnly => SessionUpdate::Snapshot {
            generation: state.generation(),
            sources: state.sources().to_vec(),
            progress: state.progress(),
            log: state.log().to_vec(),
        },
        Applied::Ignored => return,
    };
    let _ = update_tx.send(update);
}
