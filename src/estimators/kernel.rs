//! Liu-West kernel smoothing of parameter particles.
//!
//! The parameter particles are replaced by a mixture of Gaussian kernels. Kernel `i` is centred on the shrunk parameter
//! `a * p_i + (1 - a) * mean` and has covariance `h^2 * V`, where `V` is the sample covariance of the particles and `a = sqrt(1 - h^2)`.
//! Shrinkage reduces the variance of the centres to `a^2 V` which the kernel restores to exactly `V`.

use nalgebra::{DMatrix, DVector};
use num_traits::pow;

use crate::error::{FilterError, Result};
use crate::moments::SampleMoments;
use crate::noise::{CorrelatedNoise, CoupledNoise};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelSmoother {
    /// Kernel scale factor h
    h: f64,
    /// Shrinkage coefficient a
    a: f64,
}

impl KernelSmoother {
    /// The kernel scale factor must be strictly between 0 and 1.
    pub fn new(kernel_scale_factor: f64) -> Result<KernelSmoother> {
        // NaN fails both comparisons
        if !(kernel_scale_factor > 0. && kernel_scale_factor < 1.) {
            return Err(FilterError::InvalidArgument(
                "kernel scale factor must be strictly between 0 and 1",
            ));
        }
        Ok(KernelSmoother {
            h: kernel_scale_factor,
            a: (1. - pow(kernel_scale_factor, 2)).sqrt(),
        })
    }

    /// Kernel scale factor h, the kernel standard deviation relative to the particles'.
    pub fn scale(&self) -> f64 {
        self.h
    }

    /// Shrinkage coefficient a = sqrt(1 - h^2).
    pub fn shrinkage(&self) -> f64 {
        self.a
    }

    /// Kernel centre for a parameter particle.
    pub fn shrink(&self, parameter: &DVector<f64>, mean: &DVector<f64>) -> DVector<f64> {
        parameter * self.a + mean * (1. - self.a)
    }

    pub fn predicted_parameters(
        &self,
        parameters: &[DVector<f64>],
        mean: &DVector<f64>,
    ) -> Vec<DVector<f64>> {
        parameters.iter().map(|p| self.shrink(p, mean)).collect()
    }

    /// Kernel noise for a sample covariance, the coupling is h times its lower Cholesky factor.
    pub fn kernel_noise(&self, sample_covariance: &DMatrix<f64>) -> Result<CoupledNoise> {
        let noise = CoupledNoise::from_correlated(&CorrelatedNoise {
            Q: sample_covariance.clone(),
        })?;
        Ok(noise.scaled(self.h))
    }

    /// Kernel centres and kernel noise of a population of parameter particles.
    ///
    /// Fails with NotPositiveDefinite if the particles' sample covariance is singular, as happens when they have collapsed.
    pub fn smooth(&self, parameters: &[DVector<f64>]) -> Result<(Vec<DVector<f64>>, CoupledNoise)> {
        let dim = parameters.first().map_or(0, |p| p.nrows());
        let moments = SampleMoments::from_vectors(dim, parameters);
        let noise = self.kernel_noise(&moments.sample_covariance())?;
        Ok((self.predicted_parameters(parameters, moments.mean()), noise))
    }
}
