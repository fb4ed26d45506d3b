//! ONNX-backed style classification with artefact verification.
//!
//! Runs a sequence-classification Transformer exported to ONNX locally via
//! `ort`, producing a softmax distribution over the configured style labels.
//! Model and tokeniser artefacts are checksum-verified before loading.

mod artefact;
mod classifier;
mod config;
mod errors;

pub use artefact::{compute_sha256, ModelArtefact};
pub use classifier::OnnxStyleClassifier;
pub use config::OnnxScorerConfig;
pub use errors::OnnxScorerError;
