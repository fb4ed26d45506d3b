//! Style transfer intensity: direction-corrected Earth Mover's Distance.
//!
//! Passing the input and output of a style transfer model through a style
//! classifier yields two class distributions. The minimum cost of turning
//! the input distribution into the output distribution quantifies how much
//! style moved; the sign records whether it moved towards or away from the
//! target class. This gives a per-example measure that is more nuanced than
//! aggregating binary classifications over a dataset.

use thiserror::Error;

use crate::api::{round4, StyleScorer};
use crate::transport::{uniform_cost_emd, TransportError};

/// Default target class index: binary source/target layouts place the
/// target style at index 1.
pub const DEFAULT_TARGET_CLASS: usize = 1;

/// Errors raised while computing transfer intensity.
#[derive(Debug, Error, PartialEq)]
pub enum IntensityError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The input and output text lists are not index-aligned.
    #[error("input_texts has {input} entries but output_texts has {output}; the lists must be index-aligned")]
    LengthMismatch { input: usize, output: usize },
    /// A pair of distributions disagrees on the number of style classes.
    #[error("distribution pair {pair} disagrees on class count: {source}")]
    Distribution {
        pair: usize,
        #[source]
        source: TransportError,
    },
    /// The target class index does not exist in the distributions.
    #[error("target class index {target} is out of bounds for {classes} style classes")]
    TargetOutOfBounds { target: usize, classes: usize },
    /// The style scorer failed; surfaced unchanged, never retried.
    #[error("style scorer failed: {0}")]
    Scorer(#[source] E),
}

/// Direction-corrected Earth Mover's Distance between two style-class
/// distributions of equal length.
///
/// The ground cost is the all-ones matrix: under it the distance reduces
/// to half the L1 distance, which for binary
/// style tasks is `|a - b|` on the target coordinate. The result is negated
/// when the output text moved *away* from the target style, and rounded to
/// four decimal places. Identical distributions yield `+0.0` because the
/// direction rule favours `+1` on equality.
///
/// # Errors
///
/// Returns [`TransportError::LengthMismatch`] when the distributions differ
/// in length, [`TransportError::Empty`] when they are empty, and the
/// out-of-bounds error when `target_class` exceeds the class count. All of
/// these are caller errors; none are retried or recovered.
///
/// # Examples
///
/// ```
/// use tst_eval::calculate_emd;
///
/// let sti = calculate_emd(&[0.9, 0.1], &[0.1, 0.9], 1).expect("aligned distributions");
/// assert!((sti - 0.8).abs() < 1e-6);
///
/// let sti = calculate_emd(&[0.2, 0.8], &[0.7, 0.3], 1).expect("aligned distributions");
/// assert!((sti + 0.5).abs() < 1e-6);
/// ```
pub fn calculate_emd(
    input_dist: &[f32],
    output_dist: &[f32],
    target_class: usize,
) -> Result<f32, IntensityError<std::convert::Infallible>> {
    let distance = uniform_cost_emd(input_dist, output_dist)
        .map_err(|source| IntensityError::Distribution { pair: 0, source })?;
    let correction = direction_correction(input_dist, output_dist, target_class)
        .ok_or(IntensityError::TargetOutOfBounds {
            target: target_class,
            classes: input_dist.len(),
        })?;
    #[expect(clippy::float_arithmetic, reason = "sign correction on the metric")]
    Ok(round4(distance * correction))
}

/// `+1` when the output distribution holds at least as much mass on the
/// target class as the input distribution, `-1` otherwise. `None` when the
/// index is out of bounds for either vector.
fn direction_correction(input_dist: &[f32], output_dist: &[f32], target_class: usize) -> Option<f32> {
    let input_mass = input_dist.get(target_class)?;
    let output_mass = output_dist.get(target_class)?;
    Some(if output_mass >= input_mass { 1.0 } else { -1.0 })
}

/// Computes style transfer intensity for batches of text pairs using a
/// [`StyleScorer`] collaborator.
///
/// The scorer is invoked once per list, honouring back ends with a batching
/// contract. The calculator holds no mutable state; it is safe to share and
/// call concurrently.
///
/// # Examples
///
/// ```no_run
/// use tst_eval::{IntensityScorer, StyleScorer};
///
/// fn sti<S: StyleScorer>(scorer: S) -> Result<Vec<f32>, tst_eval::IntensityError<S::Error>> {
///     let calculator = IntensityScorer::new(scorer);
///     calculator.transfer_intensity(
///         &["the most serious scandal was the iran-contra affair."],
///         &["one controversy was the iran-contra affair."],
///     )
/// }
/// ```
#[derive(Debug, Clone)]
pub struct IntensityScorer<S> {
    scorer: S,
    target_class: usize,
}

impl<S: StyleScorer> IntensityScorer<S> {
    /// Create a calculator targeting class index 1, the conventional target
    /// slot for binary source/target classifiers.
    #[must_use]
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            target_class: DEFAULT_TARGET_CLASS,
        }
    }

    /// Override the target class index used for the direction correction.
    #[must_use]
    pub fn with_target_class(mut self, target_class: usize) -> Self {
        self.target_class = target_class;
        self
    }

    /// Style transfer intensity for each aligned `(input, output)` pair, in
    /// input order.
    ///
    /// The length check runs before any scoring so misaligned data never
    /// triggers partial model work.
    ///
    /// # Errors
    ///
    /// Returns [`IntensityError::LengthMismatch`] when the lists differ in
    /// length, [`IntensityError::Scorer`] when the classifier fails, and the
    /// distribution/target errors from [`calculate_emd`] for malformed
    /// scorer output.
    pub fn transfer_intensity(
        &self,
        input_texts: &[&str],
        output_texts: &[&str],
    ) -> Result<Vec<f32>, IntensityError<S::Error>> {
        if input_texts.len() != output_texts.len() {
            return Err(IntensityError::LengthMismatch {
                input: input_texts.len(),
                output: output_texts.len(),
            });
        }

        let input_cls = self.scorer.score(input_texts).map_err(IntensityError::Scorer)?;
        let output_cls = self
            .scorer
            .score(output_texts)
            .map_err(IntensityError::Scorer)?;

        let mut scores = Vec::with_capacity(input_cls.len());
        for (pair, (input, output)) in input_cls.iter().zip(output_cls.iter()).enumerate() {
            let score = calculate_emd(
                input.distribution.as_slice(),
                output.distribution.as_slice(),
                self.target_class,
            )
            .map_err(|error| match error {
                IntensityError::Distribution { source, .. } => {
                    IntensityError::Distribution { pair, source }
                }
                IntensityError::TargetOutOfBounds { target, classes } => {
                    IntensityError::TargetOutOfBounds { target, classes }
                }
                IntensityError::LengthMismatch { input, output } => {
                    IntensityError::LengthMismatch { input, output }
                }
                IntensityError::Scorer(infallible) => match infallible {},
            })?;
            scores.push(score);
        }
        Ok(scores)
    }

    /// Borrow the underlying scorer, e.g. to classify texts directly.
    #[must_use]
    pub fn scorer(&self) -> &S {
        &self.scorer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.9, 0.1], &[0.1, 0.9], 1, 0.8)]
    #[case(&[0.5, 0.5], &[0.4, 0.6], 1, 0.1)]
    #[case(&[0.2, 0.8], &[0.7, 0.3], 1, -0.5)]
    #[case(&[0.5, 0.5], &[0.5, 0.5], 1, 0.0)]
    #[case(&[0.5, 0.5], &[0.5, 0.5], 0, 0.0)]
    fn emd_reference_fixtures(
        #[case] input: &[f32],
        #[case] output: &[f32],
        #[case] target: usize,
        #[case] expected: f32,
    ) {
        let sti = calculate_emd(input, output, target).expect("valid pair");
        assert!((sti - expected).abs() < 1e-6, "sti={sti}");
    }

    #[test]
    fn equality_on_target_mass_resolves_positive() {
        // Mass shifts between non-target classes; the target coordinate is
        // unchanged, so the >= rule keeps the sign positive.
        let sti = calculate_emd(&[0.6, 0.2, 0.2], &[0.2, 0.2, 0.6], 1).expect("valid pair");
        assert!(sti >= 0.0);
        assert!((sti - 0.4).abs() < 1e-6);
    }

    #[test]
    fn target_index_out_of_bounds_is_an_error() {
        let err = calculate_emd(&[0.5, 0.5], &[0.5, 0.5], 2).expect_err("invalid target");
        assert!(matches!(
            err,
            IntensityError::TargetOutOfBounds {
                target: 2,
                classes: 2
            }
        ));
    }

    #[test]
    fn mismatched_class_counts_are_an_error() {
        let err = calculate_emd(&[0.5, 0.5], &[0.2, 0.3, 0.5], 1).expect_err("invalid pair");
        assert!(matches!(err, IntensityError::Distribution { .. }));
    }

    #[test]
    fn result_is_rounded_to_four_decimals() {
        let sti = calculate_emd(&[0.123_456, 0.876_544], &[0.0, 1.0], 1).expect("valid pair");
        assert!((sti - 0.1235).abs() < 1e-6, "sti={sti}");
    }
}
