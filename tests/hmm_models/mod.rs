//! Hidden Markov models to test the filter with.
//!
//! [`MeanRevertingModel`] is a linear Gaussian model whose unknown parameter is the level the state reverts to.
//! [`FlatModel`] observes nothing, the filter then only resamples and smooths its parameters.
//! [`FailingModel`] cannot simulate transitions.

#![allow(dead_code)]
#![allow(non_snake_case)]

use nalgebra::{DVector, Matrix2, Vector2};
use rand::Rng;
use rand_core::RngCore;
use rand_distr::{Distribution, Normal, StandardNormal};

use liu_west::models::HiddenMarkovModel;

pub type Draw = Result<(DVector<f64>, DVector<f64>), &'static str>;

/// Log density of a normal distribution.
pub fn normal_log_density(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    -0.5 * z * z - sd.ln() - 0.5 * (2. * std::f64::consts::PI).ln()
}

/// x(t) = level + phi * (x(t-1) - level) + w, y(t) = x(t) + v
pub struct MeanRevertingModel {
    pub phi: f64,
    pub transition_sd: f64,
    pub observation_sd: f64,
    /// The model's only parameter
    pub level: f64,
}

impl MeanRevertingModel {
    /// Standard deviation of the state about the level in the long run.
    pub fn stationary_sd(&self) -> f64 {
        self.transition_sd / (1. - self.phi * self.phi).sqrt()
    }

    /// Observations at times 1..=n simulated with the model's level.
    pub fn simulate(&self, rng: &mut dyn RngCore, n: usize) -> Vec<f64> {
        let w = Normal::new(0., self.transition_sd).unwrap();
        let v = Normal::new(0., self.observation_sd).unwrap();
        let mut x = self.level + self.stationary_sd() * rng.sample::<f64, _>(StandardNormal);
        (0..n)
            .map(|_| {
                x = self.level + self.phi * (x - self.level) + w.sample(rng);
                x + v.sample(rng)
            })
            .collect()
    }

    /// Exact posterior of [level, state] after the observations, for a level prior N(level_mean, level_sd^2) as [`level_prior`].
    ///
    /// The model is linear Gaussian in the augmented state so a Kalman filter is exact.
    pub fn exact_posterior(&self, level_mean: f64, level_sd: f64, observations: &[f64]) -> (Vector2<f64>, Matrix2<f64>) {
        let level_var = level_sd * level_sd;
        let mut x = Vector2::new(level_mean, level_mean);
        let mut X = Matrix2::new(level_var, level_var, level_var, level_var + self.stationary_sd().powi(2));

        let F = Matrix2::new(1., 0., 1. - self.phi, self.phi);
        let Q = Matrix2::new(0., 0., 0., self.transition_sd.powi(2));
        for y in observations {
            x = F * x;
            X = F * X * F.transpose() + Q;

            // Observe the state
            let S = X[(1, 1)] + self.observation_sd.powi(2);
            let K: Vector2<f64> = X.column(1) / S;
            let innovation = y - x[1];
            x += K * innovation;
            let KX = K * X.row(1);
            X -= KX;
        }
        (x, X)
    }
}

impl HiddenMarkovModel for MeanRevertingModel {
    type Observation = f64;

    fn state_dimension(&self) -> usize {
        1
    }

    fn vectorize_params(&self, _include_all: bool) -> DVector<f64> {
        DVector::from_element(1, self.level)
    }

    fn predicted_state_mean(
        &self,
        state: &DVector<f64>,
        _time: i64,
        parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        let level = parameters[0];
        Ok(DVector::from_element(1, level + self.phi * (state[0] - level)))
    }

    fn log_observation_density(
        &self,
        observation: &f64,
        state: &DVector<f64>,
        _time: i64,
        _parameters: &DVector<f64>,
    ) -> Result<f64, &'static str> {
        Ok(normal_log_density(*observation, state[0], self.observation_sd))
    }

    fn simulate_transition(
        &self,
        rng: &mut dyn RngCore,
        state: &DVector<f64>,
        time_from: i64,
        parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        let w = Normal::new(0., self.transition_sd).map_err(|_| "transition sd must be finite")?;
        let mean = self.predicted_state_mean(state, time_from + 1, parameters)?;
        Ok(mean.add_scalar(w.sample(rng)))
    }
}

/// Prior for the level and the state at its stationary distribution about that level.
pub fn level_prior(
    level_mean: f64,
    level_sd: f64,
) -> impl FnMut(&MeanRevertingModel, &mut dyn RngCore) -> Draw {
    move |model: &MeanRevertingModel, rng: &mut dyn RngCore| -> Draw {
        let level = level_mean + level_sd * rng.sample::<f64, _>(StandardNormal);
        let state = level + model.stationary_sd() * rng.sample::<f64, _>(StandardNormal);
        Ok((DVector::from_element(1, state), DVector::from_element(1, level)))
    }
}

/// A model whose observations carry no information, with two parameters.
pub struct FlatModel;

impl HiddenMarkovModel for FlatModel {
    type Observation = ();

    fn state_dimension(&self) -> usize {
        1
    }

    fn vectorize_params(&self, _include_all: bool) -> DVector<f64> {
        DVector::zeros(2)
    }

    fn predicted_state_mean(
        &self,
        state: &DVector<f64>,
        _time: i64,
        _parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        Ok(state.clone())
    }

    fn log_observation_density(
        &self,
        _observation: &(),
        _state: &DVector<f64>,
        _time: i64,
        _parameters: &DVector<f64>,
    ) -> Result<f64, &'static str> {
        Ok(0.)
    }

    fn simulate_transition(
        &self,
        _rng: &mut dyn RngCore,
        state: &DVector<f64>,
        _time_from: i64,
        _parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        Ok(state.clone())
    }
}

/// A mean reverting model which fails to simulate transitions.
pub struct FailingModel {
    pub inner: MeanRevertingModel,
}

impl HiddenMarkovModel for FailingModel {
    type Observation = f64;

    fn state_dimension(&self) -> usize {
        self.inner.state_dimension()
    }

    fn vectorize_params(&self, include_all: bool) -> DVector<f64> {
        self.inner.vectorize_params(include_all)
    }

    fn predicted_state_mean(
        &self,
        state: &DVector<f64>,
        time: i64,
        parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        self.inner.predicted_state_mean(state, time, parameters)
    }

    fn log_observation_density(
        &self,
        observation: &f64,
        state: &DVector<f64>,
        time: i64,
        parameters: &DVector<f64>,
    ) -> Result<f64, &'static str> {
        self.inner.log_observation_density(observation, state, time, parameters)
    }

    fn simulate_transition(
        &self,
        _rng: &mut dyn RngCore,
        _state: &DVector<f64>,
        _time_from: i64,
        _parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        Err("transition failed")
    }
}

/// The test model with the level at 2.
pub fn level_two() -> MeanRevertingModel {
    MeanRevertingModel {
        phi: 0.5,
        transition_sd: 0.5,
        observation_sd: 0.5,
        level: 2.,
    }
}
