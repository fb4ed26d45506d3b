//! API-based style transfer generator.
//!
//! Wraps an HTTP sequence-to-sequence generation endpoint. The request
//! carries the batch of input texts plus the generation parameters:
//! maximum generation length, beam count, and temperature. The response is
//! expected to contain one generated text per input, in order.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::api::StyleRewriter;

/// Default upper limit on generated tokens.
pub const DEFAULT_MAX_GEN_LENGTH: u32 = 200;

/// Default beam count for beam search decoding.
pub const DEFAULT_NUM_BEAMS: u32 = 4;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Error returned by [`ApiStyleTransfer`].
#[derive(Debug, Error)]
pub enum ApiTransferError {
    /// The input batch was empty or contained an empty text.
    #[error("empty input batch or text")]
    Empty,
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response was malformed or the generation count did not match the
    /// input count.
    #[error("expected {expected} generated texts but received {actual}")]
    GenerationCount { expected: usize, actual: usize },
    /// Response did not contain valid generations.
    #[error("invalid response")]
    InvalidResponse,
}

impl PartialEq for ApiTransferError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) | (Self::InvalidResponse, Self::InvalidResponse) => true,
            (Self::Request(_), Self::Request(_)) => true,
            (
                Self::GenerationCount {
                    expected: a,
                    actual: b,
                },
                Self::GenerationCount {
                    expected: c,
                    actual: d,
                },
            ) => a == c && b == d,
            _ => false,
        }
    }
}

impl Eq for ApiTransferError {}

#[derive(Deserialize)]
struct ApiResponse {
    generated_texts: Vec<String>,
}

/// Style transfer generator backed by an HTTP API.
///
/// Generation parameters are fixed at construction.
#[derive(Debug, Clone)]
pub struct ApiStyleTransfer {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    max_gen_length: u32,
    num_beams: u32,
    temperature: f32,
}

impl ApiStyleTransfer {
    /// Create a new generator for the given endpoint and model with default
    /// generation parameters.
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
            .timeout(Duration::from_secs(60))
            .build()
            .expect("client builder failed with default configuration");
        Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
            max_gen_length: DEFAULT_MAX_GEN_LENGTH,
            num_beams: DEFAULT_NUM_BEAMS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the maximum generation length.
    #[must_use]
    pub fn with_max_gen_length(mut self, max_gen_length: u32) -> Self {
        self.max_gen_length = max_gen_length;
        self
    }

    /// Override the beam count.
    #[must_use]
    pub fn with_num_beams(mut self, num_beams: u32) -> Self {
        self.num_beams = num_beams;
        self
    }

    /// Override the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl StyleRewriter for ApiStyleTransfer {
    type Error = ApiTransferError;

    fn transfer(&self, texts: &[&str]) -> Result<Vec<String>, Self::Error> {
        if texts.is_empty() || texts.iter().any(|text| text.trim().is_empty()) {
            return Err(ApiTransferError::Empty);
        }
        log::debug!(
            "generation request to {} with model {} for {} texts",
            self.url,
            self.model,
            texts.len()
        );
        let mut req = self.client.post(&self.url).json(&serde_json::json!({
            "model": self.model,
            "texts": texts,
            "max_length": self.max_gen_length,
            "num_beams": self.num_beams,
            "temperature": self.temperature,
        }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send()?.error_for_status()?;
        let api: ApiResponse = resp
            .json()
            .map_err(|_| ApiTransferError::InvalidResponse)?;

        if api.generated_texts.len() != texts.len() {
            return Err(ApiTransferError::GenerationCount {
                expected: texts.len(),
                actual: api.generated_texts.len(),
            });
        }
        Ok(api.generated_texts)
    }
}
