#![allow(non_snake_case)]

//! Sample moments of a population of vectors.
//!
//! [`SampleMoments`] accumulates the mean and sample covariance one vector at a time.
//! [`weighted_moments`] summarises a weighted population as a [`KalmanState`].
//!
//! [`KalmanState`]: ../models/struct.KalmanState.html

use nalgebra::{DMatrix, DVector};

use crate::models::KalmanState;

/// Running mean and sum of squared deviations.
///
/// Uses Welford's update so deviations are taken from the current mean, not from zero.
#[derive(Clone, Debug)]
pub struct SampleMoments {
    n: usize,
    mean: DVector<f64>,
    /// Sum of outer products of deviations from the mean
    S: DMatrix<f64>,
}

impl SampleMoments {
    pub fn new(dim: usize) -> SampleMoments {
        SampleMoments {
            n: 0,
            mean: DVector::zeros(dim),
            S: DMatrix::zeros(dim, dim),
        }
    }

    /// Accumulate the moments of all vectors.
    pub fn from_vectors(dim: usize, vectors: &[DVector<f64>]) -> SampleMoments {
        let mut moments = SampleMoments::new(dim);
        for x in vectors {
            moments.update(x);
        }
        moments
    }

    pub fn update(&mut self, x: &DVector<f64>) {
        assert_eq!(x.nrows(), self.mean.nrows());
        self.n += 1;
        let before = x - &self.mean;
        self.mean += &before / self.n as f64;
        let after = x - &self.mean;
        // S += (x - mean_before) (x - mean_after)'
        self.S.ger(1., &before, &after, 1.);
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Sample covariance with divisor n - 1.
    ///
    /// Zero with fewer than two samples.
    pub fn sample_covariance(&self) -> DMatrix<f64> {
        if self.n < 2 {
            return DMatrix::zeros(self.S.nrows(), self.S.ncols());
        }
        let mut X = &self.S / (self.n - 1) as f64;
        // Welford's S is only symmetric up to rounding
        X.fill_upper_triangle_with_lower_triangle();
        X
    }
}

/// Weighted mean and covariance of a population.
///
/// The weights must be normalised. Covariance is the weighted second central moment.
pub fn weighted_moments(values: &[DVector<f64>], weights: &DVector<f64>) -> KalmanState {
    assert_eq!(values.len(), weights.nrows());
    assert!(!values.is_empty());
    let dim = values[0].nrows();

    let mut x = DVector::zeros(dim);
    for (value, &w) in values.iter().zip(weights.iter()) {
        x.axpy(w, value, 1.);
    }

    let mut X = DMatrix::zeros(dim, dim);
    for (value, &w) in values.iter().zip(weights.iter()) {
        let diff = value - &x;
        X.ger(w, &diff, &diff, 1.);
    }

    KalmanState { x, X }
}
