//! Word attribution for classification decisions.
//!
//! Attributions show why the classifier judged a text subjective or
//! informal. [`OcclusionExplainer`] produces per-token weights from any
//! [`StyleScorer`] alone: the attribution of a
//! token is the drop in the explained class's probability when that token is
//! removed. All occluded variants are scored in a single batched call so back
//! ends with a batching contract are invoked once per explanation.

use thiserror::Error;

use crate::api::{AttributionExplainer, StyleScorer, TokenAttribution};

/// Errors raised while computing token attributions.
#[derive(Debug, Error, PartialEq)]
pub enum ExplainError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The text contained no tokens to attribute.
    #[error("cannot attribute an empty text")]
    EmptyText,
    /// The explained class index does not exist in the classifier output.
    #[error("class index {class} is out of bounds for {classes} style classes")]
    ClassOutOfBounds { class: usize, classes: usize },
    /// The scorer returned fewer results than texts submitted.
    #[error("scorer returned {actual} results for {expected} texts")]
    MissingResult { expected: usize, actual: usize },
    /// The style scorer failed; surfaced unchanged, never retried.
    #[error("style scorer failed: {0}")]
    Scorer(#[source] E),
}

/// Leave-one-token-out attribution over a style classifier.
///
/// # Examples
///
/// ```no_run
/// use tst_eval::{AttributionExplainer, OcclusionExplainer, StyleScorer};
///
/// fn weights<S: StyleScorer>(scorer: S) -> Result<(), tst_eval::ExplainError<S::Error>> {
///     let explainer = OcclusionExplainer::new(scorer).with_class_index(1);
///     for attribution in explainer.explain("That was funny LOL")? {
///         println!("{}\t{:+.4}", attribution.token, attribution.weight);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OcclusionExplainer<S> {
    scorer: S,
    class_index: usize,
}

impl<S: StyleScorer> OcclusionExplainer<S> {
    /// Create an explainer attributing class index 0.
    #[must_use]
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            class_index: 0,
        }
    }

    /// Attribute a different output class.
    #[must_use]
    pub fn with_class_index(mut self, class_index: usize) -> Self {
        self.class_index = class_index;
        self
    }

    #[expect(clippy::float_arithmetic, reason = "attribution deltas on probabilities")]
    fn attributions(&self, text: &str) -> Result<Vec<TokenAttribution>, ExplainError<S::Error>> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ExplainError::EmptyText);
        }

        // One batch: the full text first, then each leave-one-out variant.
        // A single-token text has an empty variant, which classifiers
        // reject, so it is replaced by a uniform-prior fallback below.
        let mut batch: Vec<String> = Vec::with_capacity(tokens.len() + 1);
        batch.push(text.to_string());
        if tokens.len() > 1 {
            for index in 0..tokens.len() {
                let variant: Vec<&str> = tokens
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| *position != index)
                    .map(|(_, token)| *token)
                    .collect();
                batch.push(variant.join(" "));
            }
        }

        let views: Vec<&str> = batch.iter().map(String::as_str).collect();
        let results = self.scorer.score(&views).map_err(ExplainError::Scorer)?;
        if results.len() != views.len() {
            return Err(ExplainError::MissingResult {
                expected: views.len(),
                actual: results.len(),
            });
        }

        let full = &results[0];
        let classes = full.distribution.len();
        let base = full
            .distribution
            .get(self.class_index)
            .ok_or(ExplainError::ClassOutOfBounds {
                class: self.class_index,
                classes,
            })?;

        if tokens.len() == 1 {
            // No informative occlusion exists; fall back to the drop from an
            // uninformative uniform prior.
            #[expect(clippy::cast_precision_loss, reason = "class counts are tiny")]
            let prior = 1.0 / classes as f32;
            return Ok(vec![TokenAttribution {
                token: tokens[0].to_string(),
                weight: base - prior,
            }]);
        }

        let mut attributions = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let occluded = results
                .get(index + 1)
                .and_then(|result| result.distribution.get(self.class_index))
                .ok_or(ExplainError::ClassOutOfBounds {
                    class: self.class_index,
                    classes,
                })?;
            attributions.push(TokenAttribution {
                token: (*token).to_string(),
                weight: base - occluded,
            });
        }
        Ok(attributions)
    }

    /// Borrow the underlying scorer.
    #[must_use]
    pub fn scorer(&self) -> &S {
        &self.scorer
    }
}

impl<S: StyleScorer> AttributionExplainer for OcclusionExplainer<S> {
    type Error = ExplainError<S::Error>;

    fn explain(&self, text: &str) -> Result<Vec<TokenAttribution>, Self::Error> {
        self.attributions(text)
    }
}
