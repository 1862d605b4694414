//! Auxiliary (look ahead) resampling.
//!
//! Log weights are normalised with the log-sum-exp pattern and ancestors are drawn from the resulting categorical distribution.
//! Each output slot of a generation draws from its own random stream so the result does not depend on the order slots are computed in.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_core::RngCore;

use crate::error::{FilterError, Result};

/// Normalise log weights to a probability distribution.
///
/// The maximum is subtracted before exponentiating so neither overflow nor total underflow can occur.
/// Fails if any log weight is NaN or +infinity, or if every log weight is -infinity.
pub fn normalize_log_weights(log_weights: &DVector<f64>) -> Result<DVector<f64>> {
    if log_weights.is_empty() {
        return Err(FilterError::DegenerateWeights("no weights"));
    }
    let mut max = f64::NEG_INFINITY;
    for &lw in log_weights.iter() {
        if lw.is_nan() {
            return Err(FilterError::DegenerateWeights("NaN log weight"));
        }
        if lw > max {
            max = lw;
        }
    }
    if max == f64::INFINITY {
        return Err(FilterError::DegenerateWeights("infinite log weight"));
    }
    if max == f64::NEG_INFINITY {
        return Err(FilterError::DegenerateWeights("all weights are zero"));
    }

    let mut w = log_weights.map(|lw| (lw - max).exp());
    // The maximum contributes exactly one so total >= 1
    let total = w.sum();
    w /= total;
    Ok(w)
}

/// Draws ancestor indices from a categorical distribution.
#[derive(Clone, Debug)]
pub struct AncestorSampler {
    /// Cumulative sum of the weights
    cumulative: Vec<f64>,
}

impl AncestorSampler {
    /// Weights need not be normalised but must be non-negative with a positive sum.
    pub fn new(weights: &DVector<f64>) -> Result<AncestorSampler> {
        // Cumulative sum of likelihood weights (Kahan algorithm), and find smallest weight
        let mut wmin = f64::MAX;
        let mut wcum = 0.;
        let mut cumulative = Vec::with_capacity(weights.nrows());
        {
            let mut c = 0.;
            for &wi in weights.iter() {
                if wi < wmin {
                    wmin = wi;
                }
                let y = wi - c;
                let t = wcum + y;
                c = (t - wcum) - y;
                wcum = t;
                // The compensation can step the sum back after a zero weight, cumulative must not decrease
                cumulative.push(match cumulative.last() {
                    Some(&last) if t < last => last,
                    _ => t,
                });
            }
        }
        if cumulative.is_empty() {
            return Err(FilterError::DegenerateWeights("no weights"));
        }
        if wmin < 0. {
            // bad weights
            return Err(FilterError::DegenerateWeights("negative weight"));
        }
        // Any numerical failure should cascade into cumulative sum
        if wcum.is_nan() {
            return Err(FilterError::DegenerateWeights("NaN cumulative weight sum"));
        }
        if !(wcum > 0.) || wcum.is_infinite() {
            return Err(FilterError::DegenerateWeights("zero or infinite cumulative weight sum"));
        }
        Ok(AncestorSampler { cumulative })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Non-decreasing cumulative sum of the weights.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Draw an index in 0..len().
    ///
    /// An index is chosen when its cumulative weight is the first to exceed a uniform draw scaled to the total weight.
    /// Particles with zero weight are never chosen.
    pub fn sample(&self, rng: &mut dyn RngCore) -> usize {
        let last = self.cumulative.len() - 1;
        let u = rng.gen::<f64>() * self.cumulative[last];
        let k = self.cumulative.partition_point(|&c| c <= u);
        // u can only reach the total by rounding
        k.min(last)
    }
}

/// Random stream of one output slot.
///
/// Counter based, the same (seed, slot) gives the same stream. The seed is mixed so nearby seeds and slots are decorrelated.
pub fn particle_rng(seed: u64, slot: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_mul(2654435761).wrapping_add(slot as u64))
}
