use std::sync::{Arc, Mutex};

use ort::{session::Session, value::TensorRef};
use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationDirection,
    TruncationParams, TruncationStrategy,
};

use super::{config::OnnxScorerConfig, errors::OnnxScorerError};
use crate::api::{StyleClassification, StyleDistribution, StyleScorer};

/// Style classifier backed by a local ONNX session.
///
/// Produces a softmax distribution over the configured labels for each
/// input text. The session is guarded by a mutex because `ort` sessions
/// require exclusive access while running.
#[derive(Debug)]
pub struct OnnxStyleClassifier {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    input_names: Arc<Vec<String>>,
    output_names: Arc<Vec<String>>,
    max_sequence_length: usize,
    labels: Arc<Vec<String>>,
}

impl OnnxStyleClassifier {
    /// Builds a style classifier from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns configuration and runtime errors when artefacts cannot be
    /// verified, tokeniser setup fails, or the ONNX session cannot be
    /// created.
    ///
    /// # Examples
    /// ```no_run
    /// use tst_eval::providers::onnx::{ModelArtefact, OnnxScorerConfig, OnnxStyleClassifier};
    ///
    /// # fn main() -> Result<(), tst_eval::providers::onnx::OnnxScorerError> {
    /// let config = OnnxScorerConfig {
    ///     model: ModelArtefact {
    ///         path: std::path::PathBuf::from("/models/subjectivity_classifier.onnx"),
    ///         sha256: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".into(),
    ///     },
    ///     tokenizer: ModelArtefact {
    ///         path: std::path::PathBuf::from("/models/subjectivity_tokenizer.json"),
    ///         sha256: "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210".into(),
    ///     },
    ///     input_names: vec!["input_ids".into(), "attention_mask".into()],
    ///     output_names: vec!["logits".into()],
    ///     max_sequence_length: 512,
    ///     pad_token: "[PAD]".into(),
    ///     pad_id: 0,
    ///     labels: vec!["SUBJECTIVE".into(), "NEUTRAL".into()],
    /// };
    /// let classifier = OnnxStyleClassifier::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: OnnxScorerConfig) -> Result<Self, OnnxScorerError> {
        if config.max_sequence_length == 0 {
            return Err(OnnxScorerError::ZeroSequenceLength);
        }
        if config.input_names.len() < 2 {
            return Err(OnnxScorerError::InsufficientInputNames {
                expected: 2,
                actual: config.input_names.len(),
            });
        }
        if config.output_names.is_empty() {
            return Err(OnnxScorerError::MissingOutputNames);
        }
        if config.labels.len() < 2 {
            return Err(OnnxScorerError::InsufficientLabels);
        }

        config.model.verify()?;
        config.tokenizer.verify()?;

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer.path).map_err(|source| {
            OnnxScorerError::LoadTokenizer {
                path: config.tokenizer.path.clone(),
                source,
            }
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_sequence_length,
                strategy: TruncationStrategy::OnlyFirst,
                stride: 0,
                direction: TruncationDirection::Right,
            }))
            .map_err(OnnxScorerError::ConfigureTruncation)?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(config.max_sequence_length),
            direction: PaddingDirection::Right,
            pad_to_multiple_of: None,
            pad_id: config.pad_id,
            pad_type_id: 0,
            pad_token: config.pad_token.clone(),
        }));

        let session = Session::builder()
            .map_err(OnnxScorerError::CreateSessionBuilder)?
            .commit_from_file(&config.model.path)
            .map_err(OnnxScorerError::CreateSession)?;

        log::debug!(
            "loaded ONNX style classifier from {} with labels {:?}",
            config.model.path.display(),
            config.labels
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            input_names: Arc::new(config.input_names),
            output_names: Arc::new(config.output_names),
            max_sequence_length: config.max_sequence_length,
            labels: Arc::new(config.labels),
        })
    }

    /// Runs inference for a single input string and returns the softmax
    /// distribution over the configured labels.
    ///
    /// # Errors
    ///
    /// Returns encoding, inference, or validation errors when tokenisation
    /// fails, the ONNX runtime errors, or the logits do not match the
    /// configured label count.
    fn predict(&self, input: &str) -> Result<Vec<f32>, OnnxScorerError> {
        let encoding = self
            .tokenizer
            .encode(input, true)
            .map_err(OnnxScorerError::Encode)?;

        let ids = encoding.get_ids();
        let attention = encoding.get_attention_mask();

        if ids.len() != self.max_sequence_length {
            return Err(OnnxScorerError::SequenceLength {
                expected: self.max_sequence_length,
                actual: ids.len(),
            });
        }

        if attention.len() != self.max_sequence_length {
            return Err(OnnxScorerError::SequenceLength {
                expected: self.max_sequence_length,
                actual: attention.len(),
            });
        }

        let ids_vec: Vec<i64> = ids.iter().map(|id| i64::from(*id)).collect();
        let attention_vec: Vec<i64> = attention.iter().map(|id| i64::from(*id)).collect();

        let ids_tensor =
            TensorRef::from_array_view(([1usize, self.max_sequence_length], ids_vec.as_slice()))
                .map_err(OnnxScorerError::EncodeTensor)?;
        let attention_tensor = TensorRef::from_array_view((
            [1usize, self.max_sequence_length],
            attention_vec.as_slice(),
        ))
        .map_err(OnnxScorerError::EncodeTensor)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxScorerError::SessionPoisoned)?;

        let (input_ids_name, attention_mask_name) =
            match (self.input_names.first(), self.input_names.get(1)) {
                (Some(ids), Some(attention)) => (ids.as_str(), attention.as_str()),
                _ => {
                    return Err(OnnxScorerError::InsufficientInputNames {
                        expected: 2,
                        actual: self.input_names.len(),
                    });
                }
            };

        let outputs = session
            .run(ort::inputs! {
                input_ids_name => ids_tensor,
                attention_mask_name => attention_tensor,
            })
            .map_err(OnnxScorerError::Inference)?;

        let output_name = self
            .output_names
            .first()
            .ok_or(OnnxScorerError::MissingOutputNames)?;
        let logits_value =
            outputs
                .get(output_name)
                .ok_or_else(|| OnnxScorerError::OutputMissing {
                    name: output_name.clone(),
                })?;
        let (_, logits) = logits_value
            .try_extract_tensor::<f32>()
            .map_err(OnnxScorerError::Inference)?;

        if logits.len() != self.labels.len() {
            return Err(OnnxScorerError::UnexpectedLogitCount {
                name: output_name.clone(),
                expected: self.labels.len(),
                actual: logits.len(),
            });
        }

        Ok(softmax(logits))
    }
}

impl StyleScorer for OnnxStyleClassifier {
    type Error = OnnxScorerError;

    fn score(&self, texts: &[&str]) -> Result<Vec<StyleClassification>, Self::Error> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            let probabilities = self.predict(text)?;
            let distribution = StyleDistribution::try_from(probabilities)?;
            results.push(StyleClassification::from_distribution(
                &self.labels,
                distribution,
            )?);
        }
        Ok(results)
    }
}

/// Numerically stable softmax: shift by the maximum logit before
/// exponentiating so large logits cannot overflow.
#[expect(clippy::float_arithmetic, reason = "softmax requires float operations")]
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|logit| (logit - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|value| value / sum).collect()
}
