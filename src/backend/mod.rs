//! Suggestion backend integration.
//!
//! Provides the trait the controller talks to, the typed records it consumes,
//! and the boundary validation that turns raw `[term, score]` JSON pairs into
//! those records.

pub mod http;
pub mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SearchError};

/// An exact-match candidate with its popularity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExactSuggestion {
    pub term: String,
    pub heat: f64,
}

impl ExactSuggestion {
    /// Creates a new exact suggestion.
    pub fn new(term: impl Into<String>, heat: f64) -> Self {
        Self {
            term: term.into(),
            heat,
        }
    }
}

/// A similarity-based candidate. `similarity` is always within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzySuggestion {
    pub term: String,
    pub similarity: f64,
}

impl FuzzySuggestion {
    /// Creates a new fuzzy suggestion.
    pub fn new(term: impl Into<String>, similarity: f64) -> Self {
        Self {
            term: term.into(),
            similarity,
        }
    }

    /// Similarity as a whole percentage, for display.
    pub fn percent(&self) -> u8 {
        (self.similarity * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// One row of the merged list: either group, borrowed from the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suggestion<'a> {
    Exact(&'a ExactSuggestion),
    Fuzzy(&'a FuzzySuggestion),
}

impl<'a> Suggestion<'a> {
    /// The suggested term.
    pub fn term(&self) -> &'a str {
        match self {
            Self::Exact(s) => &s.term,
            Self::Fuzzy(s) => &s.term,
        }
    }

    /// Returns true for rows from the exact-match group.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// The remote side of the widget: exact search, fuzzy search, and term insertion.
///
/// Implementations must be thread-safe (Send + Sync) since every call runs on
/// its own spawned task.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// `GET /search?q=`: exact/prefix matches, relevance ordered.
    async fn search_exact(&self, query: &str) -> Result<Vec<ExactSuggestion>>;

    /// `GET /interval?q=`: similarity matches.
    async fn search_fuzzy(&self, query: &str) -> Result<Vec<FuzzySuggestion>>;

    /// `POST /terms`: stores a new term. The acknowledgement body is ignored.
    async fn add_term(&self, term: &str) -> Result<()>;
}

/// Parses a `/search` body into exact suggestions.
///
/// A body that is not a JSON array is an error. Individual malformed rows are
/// dropped.
pub fn parse_exact_rows(body: &str) -> Result<Vec<ExactSuggestion>> {
    let rows = parse_pairs(body)?
        .into_iter()
        .map(|(term, heat)| ExactSuggestion { term, heat })
        .collect();
    Ok(rows)
}

/// Parses an `/interval` body into fuzzy suggestions.
///
/// Rows whose similarity falls outside `[0, 1]` are dropped along with any
/// other malformed row.
pub fn parse_fuzzy_rows(body: &str) -> Result<Vec<FuzzySuggestion>> {
    let rows = parse_pairs(body)?
        .into_iter()
        .filter(|(term, similarity)| {
            let valid = (0.0..=1.0).contains(similarity);
            if !valid {
                debug!("Dropping fuzzy row '{}' with similarity {}", term, similarity);
            }
            valid
        })
        .map(|(term, similarity)| FuzzySuggestion { term, similarity })
        .collect();
    Ok(rows)
}

/// Splits a JSON array of `[string, number]` pairs, skipping bad rows.
fn parse_pairs(body: &str) -> Result<Vec<(String, f64)>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SearchError::api(format!("Failed to parse response: {e}")))?;

    let Value::Array(rows) = value else {
        return Err(SearchError::api("Expected a JSON array of [term, score] pairs"));
    };

    let pairs = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<(String, f64)>(row.clone()) {
            Ok((term, score)) if score.is_finite() => Some((term, score)),
            _ => {
                debug!("Dropping malformed suggestion row: {}", row);
                None
            }
        })
        .collect();

    Ok(pairs)
}
