//! Interactive filter session with a debounced query-string sink.
//!
//! Every transition updates the in-memory [`FilterState`] immediately and
//! schedules a trailing-edge write of the encoded state to a [`UrlSink`].
//! A newer transition inside the delay window supersedes the pending write.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::dimension::Dimension;
use crate::filter_state::{FilterAction, FilterState};
use crate::url_state;

/// Quiet period before the query string is rewritten.
pub const URL_SYNC_DELAY: Duration = Duration::from_millis(500);

/// Destination of the encoded filter state, e.g. the browser location.
pub trait UrlSink: Send + Sync + 'static {
    /// Replace the current query string (without the leading `?`).
    fn replace_query(&self, query: &str);
}

// ---------------------------------------------------------------------------
// DebouncedUrlSync
// ---------------------------------------------------------------------------

/// Background writer that coalesces bursts of states into one sink write.
pub struct DebouncedUrlSync {
    tx: mpsc::UnboundedSender<String>,
    handle: JoinHandle<()>,
}

impl DebouncedUrlSync {
    /// Start the writer task. Must be called inside a tokio runtime.
    pub fn spawn(sink: Arc<dyn UrlSink>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(sink, delay, rx));
        Self { tx, handle }
    }

    /// Queue `state` for writing once the delay elapses without a newer one.
    pub fn schedule(&self, state: &FilterState) {
        if self.tx.send(url_state::encode(state)).is_err() {
            tracing::warn!("URL sync task has stopped, dropping state");
        }
    }

    /// Stop accepting states, write any pending one right away and wait for
    /// the task to finish.
    pub async fn flush(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "URL sync task failed");
        }
    }
}

async fn run(sink: Arc<dyn UrlSink>, delay: Duration, mut rx: mpsc::UnboundedReceiver<String>) {
    let mut pending: Option<String> = None;

    loop {
        let Some(query) = pending.take() else {
            match rx.recv().await {
                Some(query) => pending = Some(query),
                None => break,
            }
            continue;
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(newer) => pending = Some(newer),
                None => {
                    write(sink.as_ref(), &query);
                    break;
                }
            },
            _ = tokio::time::sleep(delay) => write(sink.as_ref(), &query),
        }
    }
}

fn write(sink: &dyn UrlSink, query: &str) {
    tracing::debug!(query, "Syncing filter state to URL");
    sink.replace_query(query);
}

// ---------------------------------------------------------------------------
// FilterSession
// ---------------------------------------------------------------------------

/// The filter state of one visitor, kept in step with their URL.
pub struct FilterSession {
    state: FilterState,
    sync: DebouncedUrlSync,
}

impl FilterSession {
    /// Restore the state from `query`. Loading does not write back to the sink.
    pub fn load(query: &str, sync: DebouncedUrlSync) -> Self {
        Self {
            state: url_state::decode(query),
            sync,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Apply `action`, schedule a URL write and return the new state.
    pub fn dispatch(&mut self, action: FilterAction) -> &FilterState {
        self.state = std::mem::take(&mut self.state).reduce(action);
        self.sync.schedule(&self.state);
        &self.state
    }

    pub fn toggle(&mut self, dimension: Dimension, key: impl Into<String>) -> &FilterState {
        self.dispatch(FilterAction::Toggle {
            dimension,
            key: key.into(),
        })
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> &FilterState {
        self.dispatch(FilterAction::SetSearchText(text.into()))
    }

    pub fn clear_all(&mut self) -> &FilterState {
        self.dispatch(FilterAction::ClearAll)
    }

    /// End the session, flushing any pending URL write.
    pub async fn close(self) {
        self.sync.flush().await;
    }
}
