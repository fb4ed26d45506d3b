// Compiled once per test binary; not every binary uses every helper.
#![allow(dead_code)]

use thiserror::Error;
use tst_eval::{StyleClassification, StyleDistribution, StyleScorer};

#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
#[must_use]
pub fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() < tol
}

/// Deterministic scorer for tests: each text encodes its own distribution as
/// space-separated probabilities, e.g. `"0.9 0.1"`. Unparsable texts fail,
/// letting tests exercise error propagation.
#[derive(Debug, Default, Clone)]
pub struct EncodedScorer;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodedScorerError {
    #[error("text does not encode a probability distribution: {0}")]
    Unparsable(String),
}

impl StyleScorer for EncodedScorer {
    type Error = EncodedScorerError;

    fn score(&self, texts: &[&str]) -> Result<Vec<StyleClassification>, Self::Error> {
        texts
            .iter()
            .map(|text| {
                let values: Vec<f32> = text
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| EncodedScorerError::Unparsable((*text).to_string()))?;
                let distribution = StyleDistribution::try_from(values)
                    .map_err(|_| EncodedScorerError::Unparsable((*text).to_string()))?;
                let labels: Vec<String> = (0..distribution.len())
                    .map(|index| format!("class_{index}"))
                    .collect();
                StyleClassification::from_distribution(&labels, distribution)
                    .map_err(|_| EncodedScorerError::Unparsable((*text).to_string()))
            })
            .collect()
    }
}
