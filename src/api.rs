//! Core types and collaborator traits for style transfer evaluation.
//!
//! The scoring engine treats classification, generation, and embedding as
//! opaque external services. This module defines the contracts those
//! services fulfil and the validated data types flowing between them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted drift from 1.0 when validating that probabilities form a simplex.
/// Classifier back ends round their softmax outputs, so exact equality is
/// unattainable.
const SUM_TOLERANCE: f32 = 1e-3;

/// Round a score to four decimal places, the canonical precision for the
/// metrics.
#[expect(clippy::float_arithmetic, reason = "decimal rounding requires floats")]
#[inline]
#[must_use]
pub(crate) fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// Errors raised when constructing or combining [`StyleDistribution`] values.
#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    /// The probability vector contained no entries.
    #[error("a style distribution requires at least one class probability")]
    Empty,
    /// An entry was NaN or infinite.
    #[error("class probability at index {index} is not finite: {value}")]
    NonFinite { index: usize, value: f32 },
    /// An entry was negative.
    #[error("class probability at index {index} is negative: {value}")]
    Negative { index: usize, value: f32 },
    /// The probabilities do not sum to 1 within tolerance.
    #[error("class probabilities sum to {sum}, expected 1.0")]
    NotNormalised { sum: f32 },
    /// The label set does not match the distribution cardinality.
    #[error("classifier exposes {labels} labels but the distribution has {classes} classes")]
    LabelCount { labels: usize, classes: usize },
}

/// A categorical probability distribution over style classes.
///
/// Entries are non-negative, finite, and sum to 1 within a small tolerance.
/// The class ordering is fixed by the classifier that produced the
/// distribution; two distributions may only be compared when they share that
/// ordering and cardinality.
///
/// # Examples
///
/// ```
/// use tst_eval::StyleDistribution;
///
/// let dist = StyleDistribution::try_from(vec![0.9, 0.1]).expect("valid simplex");
/// assert_eq!(dist.len(), 2);
/// assert_eq!(dist.argmax(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct StyleDistribution(Box<[f32]>);

impl StyleDistribution {
    /// Number of style classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the distribution has no classes. Always `false` for a
    /// successfully constructed value; provided for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Probability mass assigned to class `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Probabilities in class order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Index of the most probable class. Ties resolve to the lowest index.
    #[must_use]
    pub fn argmax(&self) -> usize {
        let mut best = 0usize;
        for (index, value) in self.0.iter().enumerate() {
            if *value > self.0[best] {
                best = index;
            }
        }
        best
    }
}

impl TryFrom<Vec<f32>> for StyleDistribution {
    type Error = DistributionError;

    #[expect(
        clippy::float_arithmetic,
        reason = "simplex validation sums probabilities"
    )]
    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if values.is_empty() {
            return Err(DistributionError::Empty);
        }
        let mut sum = 0.0f32;
        for (index, value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(DistributionError::NonFinite {
                    index,
                    value: *value,
                });
            }
            if *value < 0.0 {
                return Err(DistributionError::Negative {
                    index,
                    value: *value,
                });
            }
            sum += *value;
        }
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(DistributionError::NotNormalised { sum });
        }
        Ok(Self(values.into_boxed_slice()))
    }
}

impl From<StyleDistribution> for Vec<f32> {
    fn from(distribution: StyleDistribution) -> Self {
        distribution.0.into_vec()
    }
}

/// Result of classifying one text: the winning label, its probability, and
/// the full class distribution.
///
/// Recomputed on every classification call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleClassification {
    /// Label of the argmax class.
    pub label: String,
    /// Probability of the argmax class, rounded to four decimal places.
    pub score: f32,
    /// Full probability distribution over style classes.
    pub distribution: StyleDistribution,
}

impl StyleClassification {
    /// Derive a classification from a distribution and the classifier's
    /// ordered label set.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::LabelCount`] when `labels` and the
    /// distribution disagree on the number of classes.
    ///
    /// # Examples
    ///
    /// ```
    /// use tst_eval::{StyleClassification, StyleDistribution};
    ///
    /// let dist = StyleDistribution::try_from(vec![0.2, 0.8]).expect("valid simplex");
    /// let labels = ["SUBJECTIVE".to_string(), "NEUTRAL".to_string()];
    /// let cls = StyleClassification::from_distribution(&labels, dist).expect("matching labels");
    /// assert_eq!(cls.label, "NEUTRAL");
    /// assert!((cls.score - 0.8).abs() < 1e-6);
    /// ```
    pub fn from_distribution(
        labels: &[String],
        distribution: StyleDistribution,
    ) -> Result<Self, DistributionError> {
        if labels.len() != distribution.len() {
            return Err(DistributionError::LabelCount {
                labels: labels.len(),
                classes: distribution.len(),
            });
        }
        let winner = distribution.argmax();
        let score = distribution
            .get(winner)
            .map(round4)
            .ok_or(DistributionError::Empty)?;
        let label = labels
            .get(winner)
            .cloned()
            .ok_or(DistributionError::Empty)?;
        Ok(Self {
            label,
            score,
            distribution,
        })
    }
}

/// A single token and the attribution weight assigned to it by an explainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAttribution {
    pub token: String,
    pub weight: f32,
}

/// Classifies texts into style-class distributions.
///
/// Implementations accept a batch so back ends with a batching contract are
/// invoked once per list rather than once per text.
pub trait StyleScorer {
    /// Error type returned when scoring fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Classify each text, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying classifier fails; callers propagate
    /// it unchanged.
    fn score(&self, texts: &[&str]) -> Result<Vec<StyleClassification>, Self::Error>;
}

/// Rewrites texts into the target style.
///
/// Generation parameters (maximum length, beam count, temperature) are fixed
/// at construction time by the implementation.
pub trait StyleRewriter {
    /// Error type returned when generation fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate one rewritten text per input, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn transfer(&self, texts: &[&str]) -> Result<Vec<String>, Self::Error>;
}

/// Produces per-token attribution weights for a classification decision.
pub trait AttributionExplainer {
    /// Error type returned when explanation fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Attribute the classification of `text` to its tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying classifier fails.
    fn explain(&self, text: &str) -> Result<Vec<TokenAttribution>, Self::Error>;
}
