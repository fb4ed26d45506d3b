//! Content preservation scoring via sentence-embedding cosine similarity.
//!
//! Style transfer should change tone, not meaning. The content preservation
//! score embeds the input and output texts with a fixed sentence-embedding
//! provider and reports their cosine similarity, one score per aligned pair.
//! There is no custom algorithm here beyond the similarity itself; the
//! embedding model is an opaque collaborator behind [`TextProcessor`].

use thiserror::Error;

use crate::api::round4;
use crate::providers::TextProcessor;

/// Token masking applied before embedding.
///
/// Only the unmasked mode exists today; the enum is non-exhaustive so
/// masking strategies can be added without breaking callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaskMode {
    /// Embed the texts as given.
    #[default]
    None,
}

/// Errors raised while computing content preservation scores.
#[derive(Debug, Error, PartialEq)]
pub enum PreservationError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The input and output text lists are not index-aligned.
    #[error("input_texts has {input} entries but output_texts has {output}; the lists must be index-aligned")]
    LengthMismatch { input: usize, output: usize },
    /// The provider returned embeddings of different dimensionality for a pair.
    #[error("embedding pair {pair} disagrees on dimension: {input} vs {output}")]
    DimensionMismatch {
        pair: usize,
        input: usize,
        output: usize,
    },
    /// An embedding had zero magnitude, leaving cosine similarity undefined.
    #[error("embedding pair {pair} contains a zero-magnitude vector")]
    ZeroMagnitude { pair: usize },
    /// The embedding provider failed; surfaced unchanged, never retried.
    #[error("embedding provider failed: {0}")]
    Embedding(#[source] E),
}

/// Scores semantic similarity between aligned input/output text pairs.
///
/// Holds no mutable state; safe to share across threads when the provider is.
#[derive(Debug, Clone)]
pub struct ContentPreservationScorer<P> {
    provider: P,
}

impl<P> ContentPreservationScorer<P>
where
    P: TextProcessor<Output = Box<[f32]>>,
{
    /// Create a scorer backed by the given embedding provider.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Cosine similarity for each aligned `(input, output)` pair, rounded to
    /// four decimal places and returned in input order.
    ///
    /// The length check runs before any embedding work so misaligned data
    /// never triggers partial model calls.
    ///
    /// # Errors
    ///
    /// Returns [`PreservationError::LengthMismatch`] for misaligned lists,
    /// [`PreservationError::Embedding`] when the provider fails, and the
    /// dimension/magnitude errors when the provider output is unusable.
    pub fn scores(
        &self,
        input_texts: &[&str],
        output_texts: &[&str],
        mask: MaskMode,
    ) -> Result<Vec<f32>, PreservationError<P::Error>> {
        if input_texts.len() != output_texts.len() {
            return Err(PreservationError::LengthMismatch {
                input: input_texts.len(),
                output: output_texts.len(),
            });
        }
        // Only the unmasked mode exists today; destructure so a new variant
        // forces this site to be revisited.
        let MaskMode::None = mask;

        let mut scores = Vec::with_capacity(input_texts.len());
        for (pair, (input, output)) in input_texts.iter().zip(output_texts.iter()).enumerate() {
            let input_embedding = self
                .provider
                .process(input)
                .map_err(PreservationError::Embedding)?;
            let output_embedding = self
                .provider
                .process(output)
                .map_err(PreservationError::Embedding)?;
            if input_embedding.len() != output_embedding.len() {
                return Err(PreservationError::DimensionMismatch {
                    pair,
                    input: input_embedding.len(),
                    output: output_embedding.len(),
                });
            }
            let similarity = cosine_similarity(&input_embedding, &output_embedding)
                .ok_or(PreservationError::ZeroMagnitude { pair })?;
            scores.push(round4(similarity));
        }
        Ok(scores)
    }

    /// Borrow the underlying embedding provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

/// Cosine similarity between two equal-length vectors, or `None` when either
/// has zero magnitude. Accumulates in `f64` for stability on long embedding
/// vectors.
#[expect(clippy::float_arithmetic, reason = "similarity requires float maths")]
#[must_use]
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "cosine similarity lies in [-1, 1]"
    )]
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}
