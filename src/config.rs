//! Style transfer task configuration and the builtin task registry.
//!
//! A [`StyleAttributeData`] record names everything a style transfer task
//! needs: the source and target attribute labels, example sentences, and the
//! model identifiers for classification, generation, and embedding. Records
//! are immutable process-wide configuration, constructed once and shared.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default sentence-embedding model shared by every task.
pub const DEFAULT_SBERT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default base URL for resolving model identifiers.
pub const DEFAULT_HF_BASE_URL: &str = "https://huggingface.co/";

/// Which of a task's three models a URL should be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Style classification model.
    Classifier,
    /// Sequence-to-sequence style transfer model.
    Seq2Seq,
    /// Sentence-embedding model used by content preservation.
    Sbert,
}

/// Errors raised when validating a task record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An attribute label was empty.
    #[error("task attributes must be non-empty: {field}")]
    EmptyAttribute { field: &'static str },
    /// A model identifier was empty.
    #[error("model identifier must be non-empty: {field}")]
    EmptyModel { field: &'static str },
}

/// Static configuration record naming a style transfer task.
///
/// # Examples
///
/// ```
/// use tst_eval::config::{builtin_tasks, ModelKind};
///
/// let tasks = builtin_tasks();
/// let task = &tasks["subjective-to-neutral"];
/// assert_eq!(task.task_name(), "subjective-to-neutral");
/// assert!(task.model_url(ModelKind::Classifier).starts_with("https://huggingface.co/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleAttributeData {
    /// Attribute the input text is assumed to carry, e.g. `subjective`.
    pub source_attribute: String,
    /// Attribute the transfer should produce, e.g. `neutral`.
    pub target_attribute: String,
    /// Example sentences carrying the source attribute.
    pub examples: Vec<String>,
    /// Identifier of the style classification model.
    pub cls_model: String,
    /// Identifier of the sequence-to-sequence transfer model.
    pub seq2seq_model: String,
    /// Identifier of the sentence-embedding model.
    #[serde(default = "default_sbert_model")]
    pub sbert_model: String,
    /// Base URL model identifiers resolve against.
    #[serde(default = "default_hf_base_url")]
    pub hf_base_url: String,
}

fn default_sbert_model() -> String {
    DEFAULT_SBERT_MODEL.to_string()
}

fn default_hf_base_url() -> String {
    DEFAULT_HF_BASE_URL.to_string()
}

impl StyleAttributeData {
    /// Canonical task name, `source-to-target`.
    #[must_use]
    pub fn task_name(&self) -> String {
        format!("{}-to-{}", self.source_attribute, self.target_attribute)
    }

    /// Full URL for one of the task's models.
    #[must_use]
    pub fn model_url(&self, kind: ModelKind) -> String {
        let identifier = match kind {
            ModelKind::Classifier => &self.cls_model,
            ModelKind::Seq2Seq => &self.seq2seq_model,
            ModelKind::Sbert => &self.sbert_model,
        };
        if self.hf_base_url.ends_with('/') {
            format!("{}{identifier}", self.hf_base_url)
        } else {
            format!("{}/{identifier}", self.hf_base_url)
        }
    }

    /// Ensure the record names its attributes and models.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first empty field.
    #[must_use = "validation should not be ignored"]
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.source_attribute.is_empty() {
            return Err(ConfigError::EmptyAttribute {
                field: "source_attribute",
            });
        }
        if self.target_attribute.is_empty() {
            return Err(ConfigError::EmptyAttribute {
                field: "target_attribute",
            });
        }
        if self.cls_model.is_empty() {
            return Err(ConfigError::EmptyModel { field: "cls_model" });
        }
        if self.seq2seq_model.is_empty() {
            return Err(ConfigError::EmptyModel {
                field: "seq2seq_model",
            });
        }
        if self.sbert_model.is_empty() {
            return Err(ConfigError::EmptyModel {
                field: "sbert_model",
            });
        }
        Ok(self)
    }
}

/// The style transfer tasks shipped with the crate.
#[must_use]
pub fn builtin_tasks() -> BTreeMap<String, StyleAttributeData> {
    let mut tasks = BTreeMap::new();
    let subjective = StyleAttributeData {
        source_attribute: "subjective".to_string(),
        target_attribute: "neutral".to_string(),
        examples: vec![
            "another strikingly elegant four-door saloon for the s3 continental came from james young.".to_string(),
            "the most serious scandal was the iran-contra affair.".to_string(),
            "chemical abstracts service (cas), a prominent division of the american chemical society, is the world's leading source of chemical information.".to_string(),
            "this is an objective statement.".to_string(),
        ],
        cls_model: "cffl/bert-base-styleclassification-subjective-neutral".to_string(),
        seq2seq_model: "cffl/bart-base-styletransfer-subjective-to-neutral".to_string(),
        sbert_model: default_sbert_model(),
        hf_base_url: default_hf_base_url(),
    };
    let informal = StyleAttributeData {
        source_attribute: "informal".to_string(),
        target_attribute: "formal".to_string(),
        examples: vec![
            "I am quitting my job".to_string(),
            "That was funny LOL".to_string(),
            "i loooooooooooooooooooooooove going to the movies.".to_string(),
            "It's piece of cake, we can do it".to_string(),
        ],
        cls_model: "cointegrated/roberta-base-formality".to_string(),
        seq2seq_model: "prithivida/informal_to_formal_styletransfer".to_string(),
        sbert_model: default_sbert_model(),
        hf_base_url: default_hf_base_url(),
    };
    tasks.insert(subjective.task_name(), subjective);
    tasks.insert(informal.task_name(), informal);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn builtin_registry_contains_both_tasks() {
        let tasks = builtin_tasks();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.contains_key("subjective-to-neutral"));
        assert!(tasks.contains_key("informal-to-formal"));
    }

    #[rstest]
    #[case(
        ModelKind::Classifier,
        "https://huggingface.co/cffl/bert-base-styleclassification-subjective-neutral"
    )]
    #[case(
        ModelKind::Seq2Seq,
        "https://huggingface.co/cffl/bart-base-styletransfer-subjective-to-neutral"
    )]
    #[case(
        ModelKind::Sbert,
        "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2"
    )]
    fn model_urls_join_base_and_identifier(#[case] kind: ModelKind, #[case] expected: &str) {
        let tasks = builtin_tasks();
        let task = &tasks["subjective-to-neutral"];
        assert_eq!(task.model_url(kind), expected);
    }

    #[test]
    fn model_url_inserts_separator_when_base_lacks_one() {
        let tasks = builtin_tasks();
        let mut task = tasks["informal-to-formal"].clone();
        task.hf_base_url = "https://models.example.org".to_string();
        assert_eq!(
            task.model_url(ModelKind::Classifier),
            "https://models.example.org/cointegrated/roberta-base-formality"
        );
    }

    #[test]
    fn deserialise_fills_defaults() {
        let json = r#"{
            "source_attribute": "subjective",
            "target_attribute": "neutral",
            "examples": [],
            "cls_model": "acme/classifier",
            "seq2seq_model": "acme/generator"
        }"#;
        let task: StyleAttributeData = serde_json::from_str(json).expect("deserialise task");
        assert_eq!(task.sbert_model, DEFAULT_SBERT_MODEL);
        assert_eq!(task.hf_base_url, DEFAULT_HF_BASE_URL);
    }

    #[test]
    fn deserialise_rejects_unknown_fields() {
        let json = r#"{
            "source_attribute": "a",
            "target_attribute": "b",
            "examples": [],
            "cls_model": "c",
            "seq2seq_model": "d",
            "surprise": true
        }"#;
        let task: Result<StyleAttributeData, _> = serde_json::from_str(json);
        assert!(task.is_err());
    }

    #[rstest]
    #[case("source_attribute")]
    #[case("cls_model")]
    fn validate_rejects_empty_fields(#[case] field: &str) {
        let tasks = builtin_tasks();
        let mut task = tasks["subjective-to-neutral"].clone();
        match field {
            "source_attribute" => task.source_attribute = String::new(),
            _ => task.cls_model = String::new(),
        }
        assert!(task.validate().is_err());
    }

    #[test]
    fn validate_accepts_builtin_tasks() {
        for task in builtin_tasks().into_values() {
            assert!(task.validate().is_ok());
        }
    }
}
