//! In-memory suggestion backend.
//!
//! Used by tests and by `--mock-api`. Exact matches are prefix matches ranked
//! by heat; fuzzy matches are scored with a normalised edit-distance ratio.
//! Failures and latency can be injected per endpoint, and every call is
//! recorded so tests can count fetches.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::backend::{ExactSuggestion, FuzzySuggestion, SuggestionBackend};
use crate::error::{Result, SearchError};

/// Terms the mock starts with.
pub const SAMPLE_TERMS: &[&str] = &[
    "react",
    "redux",
    "javascript",
    "typescript",
    "node",
    "python",
    "django",
    "flask",
    "fastapi",
    "express",
    "database",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "google cloud",
];

/// Maximum rows returned by either search.
const MAX_RESULTS: usize = 10;

/// Fuzzy rows must score strictly above this.
const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Which backend operation a call or fault refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Exact,
    Fuzzy,
    AddTerm,
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCall {
    pub endpoint: Endpoint,
    pub argument: String,
}

#[derive(Debug, Default)]
struct MockState {
    /// (term, heat) pairs in insertion order.
    terms: Vec<(String, u64)>,
    calls: Vec<BackendCall>,
}

/// Mock backend with an in-memory term store.
///
/// Clones share the same store and call log.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    failing: HashSet<Endpoint>,
    endpoint_delays: HashMap<Endpoint, Duration>,
    query_delays: HashMap<String, Duration>,
}

impl MockBackend {
    /// Creates an empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock backend seeded with [`SAMPLE_TERMS`] at heat 1.
    pub fn with_sample_terms() -> Self {
        let mock = Self::new();
        for term in SAMPLE_TERMS {
            mock.insert(term, 1);
        }
        mock
    }

    /// Adds or replaces a term with the given heat.
    pub fn with_term(self, term: &str, heat: u64) -> Self {
        self.insert(term, heat);
        self
    }

    /// Makes every call to `endpoint` fail.
    pub fn with_failure(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Delays every call to `endpoint`.
    pub fn with_delay(mut self, endpoint: Endpoint, delay: Duration) -> Self {
        self.endpoint_delays.insert(endpoint, delay);
        self
    }

    /// Delays both searches for one specific query (on top of endpoint delays).
    pub fn with_query_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.query_delays.insert(query.into(), delay);
        self
    }

    /// Returns every call made so far, in call order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Returns the arguments of calls made to one endpoint.
    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .map(|c| c.argument.clone())
            .collect()
    }

    /// Returns true if the store contains `term` (case-insensitive).
    pub fn contains(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.lock().terms.iter().any(|(t, _)| *t == term)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, term: &str, heat: u64) {
        let term = term.to_lowercase();
        let mut state = self.lock();
        match state.terms.iter_mut().find(|(t, _)| *t == term) {
            Some(entry) => entry.1 = heat,
            None => state.terms.push((term, heat)),
        }
    }

    /// Records the call, waits out any injected latency, then applies faults.
    async fn enter(&self, endpoint: Endpoint, argument: &str) -> Result<()> {
        self.lock().calls.push(BackendCall {
            endpoint,
            argument: argument.to_string(),
        });

        let mut delay = self.endpoint_delays.get(&endpoint).copied().unwrap_or_default();
        if endpoint != Endpoint::AddTerm {
            delay += self.query_delays.get(argument).copied().unwrap_or_default();
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&endpoint) {
            return Err(SearchError::connection(format!(
                "Mock failure for {:?}",
                endpoint
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SuggestionBackend for MockBackend {
    async fn search_exact(&self, query: &str) -> Result<Vec<ExactSuggestion>> {
        self.enter(Endpoint::Exact, query).await?;

        let prefix = query.to_lowercase();
        let mut matches: Vec<(String, u64)> = self
            .lock()
            .terms
            .iter()
            .filter(|(term, _)| term.starts_with(&prefix))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(matches
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(term, heat)| ExactSuggestion::new(term, heat as f64))
            .collect())
    }

    async fn search_fuzzy(&self, query: &str) -> Result<Vec<FuzzySuggestion>> {
        self.enter(Endpoint::Fuzzy, query).await?;

        let query = query.to_lowercase();
        let mut scored: Vec<FuzzySuggestion> = self
            .lock()
            .terms
            .iter()
            .map(|(term, _)| FuzzySuggestion::new(term.clone(), similarity(&query, term)))
            .filter(|s| s.similarity > SIMILARITY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(MAX_RESULTS);

        Ok(scored)
    }

    async fn add_term(&self, term: &str) -> Result<()> {
        self.enter(Endpoint::AddTerm, term).await?;

        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(SearchError::api("Term is required"));
        }

        let mut state = self.lock();
        match state.terms.iter_mut().find(|(t, _)| *t == term) {
            Some(entry) => entry.1 += 1,
            None => state.terms.push((term, 1)),
        }
        Ok(())
    }
}

/// Similarity ratio in `[0, 1]`: `1 - levenshtein / max_len`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
