//! Evaluation metrics for text style transfer.
//!
//! Two metrics quantify the quality of a style-transferred rewrite:
//!
//! - **Style Transfer Intensity (STI)** — the Earth Mover's Distance between
//!   the style-class distributions of the input and output texts under a
//!   uniform ground cost, signed by whether the output moved towards the
//!   target style ([`IntensityScorer`], [`calculate_emd`]).
//! - **Content Preservation Score (CPS)** — cosine similarity between
//!   sentence embeddings of the input and output texts
//!   ([`ContentPreservationScorer`]).
//!
//! Classification, generation, and embedding back ends are opaque
//! collaborators behind the [`StyleScorer`], [`StyleRewriter`], and
//! [`TextProcessor`] traits. Optional features supply concrete providers: a
//! local ONNX classifier (`onnx`) and HTTP providers for embeddings and
//! generation (`provider-api`).

pub mod api;
#[cfg(feature = "provider-api")]
pub mod api_embedding;
#[cfg(feature = "provider-api")]
pub mod api_transfer;
pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod intensity;
pub mod interpret;
pub mod preservation;
pub mod providers;
pub mod transport;

pub use api::{
    AttributionExplainer, DistributionError, StyleClassification, StyleDistribution, StyleRewriter,
    StyleScorer, TokenAttribution,
};
#[cfg(feature = "provider-api")]
pub use api_embedding::{ApiEmbedding, ApiEmbeddingError};
#[cfg(feature = "provider-api")]
pub use api_transfer::{ApiStyleTransfer, ApiTransferError};
pub use cache::{CacheError, ModelCache};
#[cfg(feature = "cli")]
pub use cli::TsteArgs;
pub use config::{builtin_tasks, ModelKind, StyleAttributeData};
pub use intensity::{calculate_emd, IntensityError, IntensityScorer, DEFAULT_TARGET_CLASS};
pub use interpret::{ExplainError, OcclusionExplainer};
pub use preservation::{ContentPreservationScorer, MaskMode, PreservationError};
pub use providers::{EmbeddingProvider, TextProcessor};
