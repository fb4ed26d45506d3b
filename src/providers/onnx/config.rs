//! Configuration for the ONNX style classifier.

use super::artefact::ModelArtefact;

/// Configuration for an ONNX sequence-classification model.
#[derive(Debug, Clone)]
pub struct OnnxScorerConfig {
    /// Model artefact (ONNX graph) to load.
    pub model: ModelArtefact,
    /// Tokeniser artefact consumed by `tokenizers`.
    pub tokenizer: ModelArtefact,
    /// Ordered input names as defined in the ONNX graph.
    pub input_names: Vec<String>,
    /// Ordered output names to query after inference.
    pub output_names: Vec<String>,
    /// Maximum token count accepted by the model. Inputs are padded and
    /// truncated to this size. Must be greater than zero so every encoding
    /// produces fixed-length tensors.
    pub max_sequence_length: usize,
    /// Token inserted when padding shorter sequences.
    pub pad_token: String,
    /// Identifier of the padding token.
    pub pad_id: u32,
    /// Ordered style-class labels matching the model's logit layout, e.g.
    /// `["SUBJECTIVE", "NEUTRAL"]`. At least two are required.
    pub labels: Vec<String>,
}
