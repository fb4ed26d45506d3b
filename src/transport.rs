//! Optimal transport under a uniform ground cost.
//!
//! The style transfer intensity metric measures the Earth Mover's Distance
//! between two style-class distributions using an all-ones cost matrix:
//! moving probability mass between any pair of classes costs exactly one
//! unit. Under that cost only the *net* mass moved matters, so the optimal
//! transport value collapses to half the L1 distance between the vectors.
//! For the two-class case this is `|a - b|`.
//!
//! [`uniform_cost_emd`] implements the closed form. [`uniform_cost_transport`]
//! solves the underlying transportation problem explicitly by routing each
//! class's surplus to deficits; with a uniform cost any feasible routing of
//! the net mass is optimal, so the two must always agree. The solver exists
//! to validate the closed form, and the test suite holds the pair to that
//! equivalence.

use thiserror::Error;

/// Errors raised by the transport routines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The two distributions have different numbers of classes.
    #[error("distributions have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),
    /// A distribution contained no entries.
    #[error("distributions require at least one class")]
    Empty,
}

/// A single movement of probability mass between two classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    /// Class index mass moves from.
    pub from: usize,
    /// Class index mass moves to.
    pub to: usize,
    /// Amount of probability mass moved.
    pub mass: f32,
}

/// Earth Mover's Distance between `a` and `b` under the all-ones ground
/// cost, via the closed form `0.5 * Σ|a_i - b_i|`.
///
/// # Errors
///
/// Returns [`TransportError::LengthMismatch`] when the slices differ in
/// length and [`TransportError::Empty`] when they are empty.
///
/// # Examples
///
/// ```
/// use tst_eval::transport::uniform_cost_emd;
///
/// let emd = uniform_cost_emd(&[0.9, 0.1], &[0.1, 0.9]).expect("equal lengths");
/// assert!((emd - 0.8).abs() < 1e-6);
/// ```
#[expect(clippy::float_arithmetic, reason = "transport cost accumulation")]
pub fn uniform_cost_emd(a: &[f32], b: &[f32]) -> Result<f32, TransportError> {
    if a.len() != b.len() {
        return Err(TransportError::LengthMismatch(a.len(), b.len()));
    }
    if a.is_empty() {
        return Err(TransportError::Empty);
    }
    // Accumulate in f64: the per-class differences are small and alternate
    // in sign, which is where f32 summation loses digits first.
    let l1: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x - y).abs())
        .sum();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "half-L1 of simplex vectors is within f32 range"
    )]
    Ok((l1 / 2.0) as f32)
}

/// Solve the uniform-cost transportation problem explicitly.
///
/// Surpluses (`a_i > b_i`) are routed to deficits (`a_j < b_j`) greedily.
/// Every unit of routed mass costs one, so the objective equals the total
/// routed mass regardless of pairing; greedy routing is therefore exact.
/// Returns the flow list and the objective value.
///
/// # Errors
///
/// Returns [`TransportError::LengthMismatch`] when the slices differ in
/// length and [`TransportError::Empty`] when they are empty.
#[expect(clippy::float_arithmetic, reason = "transportation solve on floats")]
pub fn uniform_cost_transport(a: &[f32], b: &[f32]) -> Result<(Vec<Flow>, f32), TransportError> {
    if a.len() != b.len() {
        return Err(TransportError::LengthMismatch(a.len(), b.len()));
    }
    if a.is_empty() {
        return Err(TransportError::Empty);
    }

    let mut surpluses: Vec<(usize, f32)> = Vec::new();
    let mut deficits: Vec<(usize, f32)> = Vec::new();
    for (index, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = x - y;
        if diff > 0.0 {
            surpluses.push((index, diff));
        } else if diff < 0.0 {
            deficits.push((index, -diff));
        }
    }

    let mut flows = Vec::new();
    let mut cost = 0.0f32;
    let mut deficit_iter = deficits.into_iter();
    let mut current = deficit_iter.next();

    for (from, mut remaining) in surpluses {
        while remaining > 0.0 {
            let Some((to, capacity)) = current else {
                // Equal total mass means deficits cover surpluses; float
                // noise can leave a sliver behind, which we drop.
                break;
            };
            let moved = remaining.min(capacity);
            flows.push(Flow {
                from,
                to,
                mass: moved,
            });
            cost += moved;
            remaining -= moved;
            let left = capacity - moved;
            current = if left > 0.0 {
                Some((to, left))
            } else {
                deficit_iter.next()
            };
        }
    }

    Ok((flows, cost))
}
