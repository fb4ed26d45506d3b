//! API-based sentence-embedding provider.
//!
//! Sends text to an HTTP endpoint and expects a JSON response containing an
//! `embedding` array of `f32` values. The request names the configured
//! sentence-embedding model so one endpoint can serve several tasks. An
//! optional API key is sent as a bearer token.
//!
//! # Examples
//!
//! ```no_run
//! use tst_eval::{ApiEmbedding, TextProcessor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ApiEmbedding::new(
//!     "http://localhost:8080/embed",
//!     "sentence-transformers/all-MiniLM-L6-v2",
//!     None,
//! );
//! let embedding = provider.process("hello")?;
//! assert!(!embedding.is_empty());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::providers::TextProcessor;

/// Error returned by [`ApiEmbedding`].
#[derive(Debug, Error)]
pub enum ApiEmbeddingError {
    /// Input or embedding was empty.
    #[error("empty input or embedding")]
    Empty,
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not contain a valid embedding.
    #[error("invalid response")]
    InvalidResponse,
}

impl PartialEq for ApiEmbeddingError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Empty, Self::Empty)
                | (Self::InvalidResponse, Self::InvalidResponse)
                | (Self::Request(_), Self::Request(_))
        )
    }
}

impl Eq for ApiEmbeddingError {}

#[derive(Deserialize)]
struct ApiResponse {
    embedding: Vec<f32>,
}

/// Sentence-embedding provider backed by an HTTP API.
#[derive(Debug, Clone)]
pub struct ApiEmbedding {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl ApiEmbedding {
    /// Create a new provider for the given endpoint and embedding model.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed with the default
    /// configuration.
    #[must_use]
    pub fn new(url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        #[expect(
            clippy::expect_used,
            reason = "client builder should not fail with defaults"
        )]
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("client builder failed with default configuration");
        Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
        }
    }
}

impl TextProcessor for ApiEmbedding {
    type Output = Box<[f32]>;
    type Error = ApiEmbeddingError;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        if input.trim().is_empty() {
            return Err(ApiEmbeddingError::Empty);
        }
        log::debug!("embedding request to {} with model {}", self.url, self.model);
        let mut req = self.client.post(&self.url).json(&serde_json::json!({
            "model": self.model,
            "text": input,
        }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send()?.error_for_status()?;
        let api: ApiResponse = resp
            .json()
            .map_err(|_| ApiEmbeddingError::InvalidResponse)?;

        if api.embedding.is_empty() {
            return Err(ApiEmbeddingError::Empty);
        }
        if !api.embedding.iter().all(|v| v.is_finite()) {
            return Err(ApiEmbeddingError::InvalidResponse);
        }
        Ok(api.embedding.into_boxed_slice())
    }
}
