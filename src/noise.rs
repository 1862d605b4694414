#![allow(non_snake_case)]

//! Gaussian noise models.
//!
//! Noise is represented as structs. Particles are perturbed by drawing from [`CoupledNoise`].

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_core::RngCore;
use rand_distr::StandardNormal;

use crate::error::Result;
use crate::linalg::{check_positive_definite, cholesky};

/// Additive noise.
///
/// Noise represented as a the noise covariance matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelatedNoise {
    /// Noise covariance
    pub Q: DMatrix<f64>,
}

/// Additive noise.
///
/// Noise represented as a noise coupling matrix applied to independent unit variance noise.
/// The noise covariance is G.G'.
#[derive(Clone, Debug, PartialEq)]
pub struct CoupledNoise {
    /// Noise coupling
    pub G: DMatrix<f64>,
}

impl CoupledNoise {
    /// Creates a CoupledNoise from an CorrelatedNoise.
    /// The CorrelatedNoise must be PD, the coupling is its lower Cholesky factor.
    /// Positive definiteness is judged on the correlation matrix so noise components may have very different scales.
    pub fn from_correlated(correlated: &CorrelatedNoise) -> Result<Self> {
        let (G, rcond) = cholesky::scaled_lower_cholesky(&correlated.Q);
        check_positive_definite(rcond)?;
        Ok(CoupledNoise { G })
    }

    /// Noise with the coupling multiplied by scale, so the covariance is multiplied by scale^2.
    pub fn scaled(&self, scale: f64) -> Self {
        CoupledNoise { G: &self.G * scale }
    }

    pub fn dim(&self) -> usize {
        self.G.nrows()
    }

    /// Draw a noise vector.
    pub fn sample(&self, rng: &mut dyn RngCore) -> DVector<f64> {
        let n = self.G.ncols();
        let z = DVector::<f64>::from_iterator(n, (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)));
        &self.G * z
    }
}

/// A sampler for normally distributed noise with the coupling of noise.
pub fn normal_noise_sampler_coupled(noise: CoupledNoise) -> impl Fn(&mut dyn RngCore) -> DVector<f64> {
    move |rng: &mut dyn RngCore| noise.sample(rng)
}
