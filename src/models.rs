#![allow(non_snake_case)]

//! Bayesian estimation models.
//!
//! State representations are modeled as structs.
//! The hidden Markov model to be filtered and the initialisation of particles are defined as traits.

use nalgebra::{DMatrix, DVector};
use rand_core::RngCore;

/// Kalman State.
///
/// Linear representation as a state vector and the state covariance (symmetric positive semi-definite) matrix.
/// Used to summarise a weighted particle population.
#[derive(PartialEq, Clone, Debug)]
pub struct KalmanState {
    /// State vector
    pub x: DVector<f64>,
    /// State covariance matrix (symmetric positive semi-definite)
    pub X: DMatrix<f64>,
}

/// A hidden Markov model with a continuous state.
///
/// The model's transition and observation laws depend on a vector of static parameters.
/// All operations take the parameters explicitly so a filter can evaluate the model for many parameter hypotheses,
/// the model itself is never modified.
pub trait HiddenMarkovModel {
    /// A single observation of the system.
    type Observation: ?Sized;

    /// Dimension of the state vector.
    fn state_dimension(&self) -> usize;

    /// The model's current parameters as a vector.
    ///
    /// `include_all` selects all parameters rather than only those being learnt.
    fn vectorize_params(&self, include_all: bool) -> DVector<f64>;

    /// Deterministic one step ahead forecast of the state mean at `time`.
    fn predicted_state_mean(
        &self,
        state: &DVector<f64>,
        time: i64,
        parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str>;

    /// Log density of an observation at `time` given the state.
    fn log_observation_density(
        &self,
        observation: &Self::Observation,
        state: &DVector<f64>,
        time: i64,
        parameters: &DVector<f64>,
    ) -> Result<f64, &'static str>;

    /// Stochastic state transition from `time_from` to `time_from + 1`.
    fn simulate_transition(
        &self,
        rng: &mut dyn RngCore,
        state: &DVector<f64>,
        time_from: i64,
        parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str>;
}

/// Initial particles.
///
/// Draws one (state, parameter) pair for each particle of a new population.
/// Implemented for closures so a prior can be supplied in place.
pub trait InitialSampler<M: HiddenMarkovModel + ?Sized> {
    fn sample(
        &mut self,
        model: &M,
        rng: &mut dyn RngCore,
    ) -> Result<(DVector<f64>, DVector<f64>), &'static str>;
}

impl<M, F> InitialSampler<M> for F
where
    M: HiddenMarkovModel + ?Sized,
    F: FnMut(&M, &mut dyn RngCore) -> Result<(DVector<f64>, DVector<f64>), &'static str>,
{
    fn sample(
        &mut self,
        model: &M,
        rng: &mut dyn RngCore,
    ) -> Result<(DVector<f64>, DVector<f64>), &'static str> {
        self(model, rng)
    }
}

/// Every particle at the model's point estimate.
///
/// States are zero and parameters are the model's vectorised parameters. No randomness is used.
/// All parameter particles are identical, so the parameter sample covariance is singular until the population is dispersed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointEstimateSampler;

impl<M: HiddenMarkovModel + ?Sized> InitialSampler<M> for PointEstimateSampler {
    fn sample(
        &mut self,
        model: &M,
        _rng: &mut dyn RngCore,
    ) -> Result<(DVector<f64>, DVector<f64>), &'static str> {
        Ok((DVector::zeros(model.state_dimension()), model.vectorize_params(true)))
    }
}
