use crate::catalog::client::JikanClient;
use crate::catalog::models::Suggestion;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SuggestionState {
    Idle,
    Loading { query: String },
    Ready { query: String, hits: Vec<Suggestion> },
    Failed { query: String, message: String },
}

/// Debounced autocomplete. Each [`submit`](Self::submit) cancels whatever is
/// pending or in flight, waits out the delay, then fetches. Only the most
/// recent query is ever published.
///
/// Must be used from inside a tokio runtime.
pub struct SuggestionSearch {
    client: Arc<JikanClient>,
    delay: Duration,
    min_query_len: usize,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<SuggestionState>>,
}

impl SuggestionSearch {
    pub fn new(client: JikanClient, delay: Duration, min_query_len: usize) -> Self {
        let (state, _) = watch::channel(SuggestionState::Idle);
        Self {
            client: Arc::new(client),
            delay,
            min_query_len,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    pub fn submit(&mut self, query: &str) {
        let generation = self.cancel_pending();

        let query = query.trim().to_string();
        if query.chars().count() < self.min_query_len {
            self.state.send_replace(SuggestionState::Idle);
            return;
        }

        let client = Arc::clone(&self.client);
        let delay = self.delay;
        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            publish(&state, &current, generation, SuggestionState::Loading {
                query: query.clone(),
            });

            let next = match client.search(&query).await {
                Ok(hits) => SuggestionState::Ready { query, hits },
                Err(e) => {
                    tracing::error!(error = %e, %query, "failed to fetch anime suggestions");
                    SuggestionState::Failed {
                        query,
                        message: format!("{e:#}"),
                    }
                }
            };
            publish(&state, &current, generation, next);
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the latest lookup, if any, to publish its outcome.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "suggestion task panicked");
                }
            }
        }
    }

    /// Drop any pending or in-flight lookup and clear the suggestions.
    pub fn cancel(&mut self) {
        self.cancel_pending();
        self.state.send_replace(SuggestionState::Idle);
    }

    fn cancel_pending(&mut self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        generation
    }
}

impl Drop for SuggestionSearch {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

fn publish(
    state: &watch::Sender<SuggestionState>,
    current: &AtomicU64,
    generation: u64,
    next: SuggestionState,
) {
    // A superseded task may still be between await points when aborted.
    state.send_if_modified(|slot| {
        if current.load(Ordering::SeqCst) != generation {
            return false;
        }
        *slot = next;
        true
    });
}
