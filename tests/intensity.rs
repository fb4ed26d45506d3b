//! End-to-end transfer intensity behaviour against a deterministic scorer.

mod support;

use rstest::rstest;
use support::{approx_eq, EncodedScorer, EncodedScorerError};
use tst_eval::{IntensityError, IntensityScorer};

#[rstest]
#[case("0.9 0.1", "0.1 0.9", 0.8)]
#[case("0.5 0.5", "0.4 0.6", 0.1)]
#[case("0.2 0.8", "0.7 0.3", -0.5)]
#[case("0.5 0.5", "0.5 0.5", 0.0)]
fn scores_each_pair_with_directed_distance(
    #[case] input: &str,
    #[case] output: &str,
    #[case] expected: f32,
) {
    let calculator = IntensityScorer::new(EncodedScorer);
    let scores = calculator
        .transfer_intensity(&[input], &[output])
        .expect("aligned pair");
    assert_eq!(scores.len(), 1);
    assert!(
        approx_eq(scores[0], expected, 1e-6),
        "score={} expected={expected}",
        scores[0]
    );
}

#[test]
fn batch_scores_preserve_input_order() {
    let calculator = IntensityScorer::new(EncodedScorer);
    let scores = calculator
        .transfer_intensity(
            &["0.9 0.1", "0.2 0.8", "0.5 0.5"],
            &["0.1 0.9", "0.7 0.3", "0.4 0.6"],
        )
        .expect("aligned batch");
    let expected = [0.8, -0.5, 0.1];
    assert_eq!(scores.len(), expected.len());
    for (score, want) in scores.iter().zip(expected.iter()) {
        assert!(approx_eq(*score, *want, 1e-6), "score={score} want={want}");
    }
}

#[test]
fn length_mismatch_is_rejected_before_scoring() {
    let calculator = IntensityScorer::new(EncodedScorer);
    // The second list contains an unparsable text; the mismatch error proves
    // the scorer was never consulted.
    let err = calculator
        .transfer_intensity(&["0.9 0.1"], &["0.1 0.9", "not a distribution"])
        .expect_err("misaligned lists");
    assert_eq!(err, IntensityError::LengthMismatch { input: 1, output: 2 });
}

#[test]
fn scorer_failures_surface_unchanged() {
    let calculator = IntensityScorer::new(EncodedScorer);
    let err = calculator
        .transfer_intensity(&["garbage"], &["0.1 0.9"])
        .expect_err("unparsable input");
    assert_eq!(
        err,
        IntensityError::Scorer(EncodedScorerError::Unparsable("garbage".to_string()))
    );
}

#[test]
fn custom_target_class_flips_the_direction() {
    let calculator = IntensityScorer::new(EncodedScorer).with_target_class(0);
    let scores = calculator
        .transfer_intensity(&["0.9 0.1"], &["0.1 0.9"])
        .expect("aligned pair");
    // Mass moved away from class 0, so the same magnitude carries the
    // opposite sign.
    assert!(approx_eq(scores[0], -0.8, 1e-6), "score={}", scores[0]);
}

#[test]
fn three_class_distributions_are_supported() {
    let calculator = IntensityScorer::new(EncodedScorer);
    let scores = calculator
        .transfer_intensity(&["0.6 0.2 0.2"], &["0.1 0.7 0.2"])
        .expect("aligned pair");
    assert!(approx_eq(scores[0], 0.5, 1e-6), "score={}", scores[0]);
}
