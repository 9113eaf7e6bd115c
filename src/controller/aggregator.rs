//! Dual-source suggestion fetching.
//!
//! Issues the exact and fuzzy requests for a query on their own tasks and
//! holds whatever each source last delivered. The two sources never wait on
//! each other; a failure in one only empties that one.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::ControllerEvent;
use crate::backend::{ExactSuggestion, FuzzySuggestion, Suggestion, SuggestionBackend};
use crate::error::Result;

/// Which source a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Exact,
    Fuzzy,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// Holds both suggestion lists and launches fetches.
pub struct Aggregator {
    backend: Arc<dyn SuggestionBackend>,
    exact: Vec<ExactSuggestion>,
    fuzzy: Vec<FuzzySuggestion>,
    /// True while an exact request is outstanding. Fuzzy loading is not tracked.
    loading: bool,
    /// Sequence number of the latest request per source.
    exact_seq: u64,
    fuzzy_seq: u64,
    discard_stale: bool,
}

impl Aggregator {
    /// Creates an aggregator over `backend`.
    ///
    /// With `discard_stale`, a response is dropped unless it answers the most
    /// recent request of its source. Without it, responses apply in arrival
    /// order and an old response may overwrite a newer one.
    pub fn new(backend: Arc<dyn SuggestionBackend>, discard_stale: bool) -> Self {
        Self {
            backend,
            exact: Vec::new(),
            fuzzy: Vec::new(),
            loading: false,
            exact_seq: 0,
            fuzzy_seq: 0,
            discard_stale,
        }
    }

    /// Returns the shared backend handle.
    pub fn backend(&self) -> Arc<dyn SuggestionBackend> {
        Arc::clone(&self.backend)
    }

    /// Issues both requests for `query`.
    pub fn fetch(&mut self, query: &str, events: &UnboundedSender<ControllerEvent>) {
        self.exact_seq += 1;
        self.fuzzy_seq += 1;
        self.loading = true;
        debug!("Fetching suggestions for '{}'", query);

        let seq = self.exact_seq;
        let query_owned = query.to_string();
        let backend = Arc::clone(&self.backend);
        let tx = events.clone();
        tokio::spawn(async move {
            let result = backend.search_exact(&query_owned).await;
            let _ = tx.send(ControllerEvent::ExactLoaded {
                seq,
                query: query_owned,
                result,
            });
        });

        let seq = self.fuzzy_seq;
        let query_owned = query.to_string();
        let backend = Arc::clone(&self.backend);
        let tx = events.clone();
        tokio::spawn(async move {
            let result = backend.search_fuzzy(&query_owned).await;
            let _ = tx.send(ControllerEvent::FuzzyLoaded {
                seq,
                query: query_owned,
                result,
            });
        });
    }

    /// Applies an exact-source completion. Returns true if the list was replaced.
    pub fn apply_exact(
        &mut self,
        seq: u64,
        query: &str,
        result: Result<Vec<ExactSuggestion>>,
    ) -> bool {
        if self.is_stale(Source::Exact, seq) {
            debug!("Ignoring stale exact response for '{}'", query);
            return false;
        }
        self.loading = false;
        self.exact = degrade(Source::Exact, query, result);
        true
    }

    /// Applies a fuzzy-source completion. Returns true if the list was replaced.
    pub fn apply_fuzzy(
        &mut self,
        seq: u64,
        query: &str,
        result: Result<Vec<FuzzySuggestion>>,
    ) -> bool {
        if self.is_stale(Source::Fuzzy, seq) {
            debug!("Ignoring stale fuzzy response for '{}'", query);
            return false;
        }
        self.fuzzy = degrade(Source::Fuzzy, query, result);
        true
    }

    fn is_stale(&self, source: Source, seq: u64) -> bool {
        let latest = match source {
            Source::Exact => self.exact_seq,
            Source::Fuzzy => self.fuzzy_seq,
        };
        self.discard_stale && seq != latest
    }

    /// Empties both lists.
    ///
    /// With stale-discarding on, in-flight responses are invalidated too, so a
    /// late answer cannot reopen a dismissed list.
    pub fn clear(&mut self) {
        self.exact.clear();
        self.fuzzy.clear();
        if self.discard_stale {
            self.exact_seq += 1;
            self.fuzzy_seq += 1;
            self.loading = false;
        }
    }

    pub fn exact(&self) -> &[ExactSuggestion] {
        &self.exact
    }

    pub fn fuzzy(&self) -> &[FuzzySuggestion] {
        &self.fuzzy
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.fuzzy.is_empty()
    }

    /// Length of the merged list.
    pub fn len(&self) -> usize {
        self.exact.len() + self.fuzzy.len()
    }

    /// Merged view: all exact rows, then all fuzzy rows.
    pub fn merged(&self) -> impl Iterator<Item = Suggestion<'_>> {
        self.exact
            .iter()
            .map(Suggestion::Exact)
            .chain(self.fuzzy.iter().map(Suggestion::Fuzzy))
    }

    /// Row `index` of the merged list.
    pub fn get(&self, index: usize) -> Option<Suggestion<'_>> {
        match index.checked_sub(self.exact.len()) {
            None => self.exact.get(index).map(Suggestion::Exact),
            Some(offset) => self.fuzzy.get(offset).map(Suggestion::Fuzzy),
        }
    }
}

/// Failed responses become an empty list; the failure is only logged.
fn degrade<T>(source: Source, query: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!("{} suggestion fetch for '{}' failed: {}", source.label(), query, e);
            Vec::new()
        }
    }
}
