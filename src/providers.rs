//! Provider interfaces for embeddings and locally hosted classifiers.
//!
//! Defines the `TextProcessor` trait implemented by every single-text
//! provider, plus the alias used by the content preservation scorer.

#[cfg(feature = "onnx")]
pub mod onnx;

/// Processes text to produce a structured, thread-safe output.
///
/// Embedding providers implement this trait via the [`EmbeddingProvider`]
/// alias. Centralising the interface keeps provider implementations small
/// and gives the scorers a single, well-documented contract.
pub trait TextProcessor {
    /// Structured result returned by the processor.
    ///
    /// Outputs must be `Send + Sync + 'static` so they can be safely shared
    /// across threads and stored in trait objects without borrowing.
    type Output: Send + Sync + 'static;
    /// Error type returned when processing fails.
    ///
    /// Errors must implement `std::error::Error` and be `Send + Sync + 'static`
    /// to propagate cleanly across threads and outlive the processor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Process the supplied text.
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails.
    fn process(&self, input: &str) -> Result<Self::Output, Self::Error>;
}

/// Provides sentence embeddings.
pub type EmbeddingProvider<E> =
    dyn TextProcessor<Output = Box<[f32]>, Error = E> + Send + Sync + 'static;
