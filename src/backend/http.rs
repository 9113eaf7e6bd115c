//! HTTP suggestion backend.
//!
//! Talks to the search service over three endpoints below a configured base
//! URL: `GET /search`, `GET /interval` and `POST /terms`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::backend::{
    parse_exact_rows, parse_fuzzy_rows, ExactSuggestion, FuzzySuggestion, SuggestionBackend,
};
use crate::config::ApiConfig;
use crate::error::{Result, SearchError};

/// Request body for `POST /terms`.
#[derive(Debug, Serialize)]
struct NewTerm<'a> {
    term: &'a str,
}

/// reqwest-backed implementation of [`SuggestionBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    /// Creates a backend from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(config.parsed_base_url()?, config.timeout())
    }

    /// Builds `{base}/{path}`, percent-encoding `q` when present.
    fn endpoint(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        if let Some(q) = query {
            url.query_pairs_mut().clear().append_pair("q", q);
        }
        url
    }

    /// Sends a GET and returns the body of a successful response.
    async fn get_body(&self, url: Url) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(map_send_error)?;
        read_success_body(response).await
    }
}

fn map_send_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::connection("Request timed out")
    } else if e.is_connect() {
        SearchError::connection(format!("Failed to connect to search service: {}", e))
    } else {
        SearchError::connection(format!("Request failed: {}", e))
    }
}

async fn read_success_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SearchError::api(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(SearchError::api(format!("Search service error ({}): {}", status, body)));
    }

    Ok(body)
}

#[async_trait]
impl SuggestionBackend for HttpBackend {
    async fn search_exact(&self, query: &str) -> Result<Vec<ExactSuggestion>> {
        let body = self.get_body(self.endpoint("search", Some(query))).await?;
        parse_exact_rows(&body)
    }

    async fn search_fuzzy(&self, query: &str) -> Result<Vec<FuzzySuggestion>> {
        let body = self.get_body(self.endpoint("interval", Some(query))).await?;
        parse_fuzzy_rows(&body)
    }

    async fn add_term(&self, term: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("terms", None))
            .json(&NewTerm { term })
            .send()
            .await
            .map_err(map_send_error)?;

        read_success_body(response).await.map(|_| ())
    }
}
