//! Particle population.
//!
//! Particles are stored as parallel state, parameter and log weight arrays. The arrays always have the same non zero length:
//! a population can only be built through the checked constructors and is replaced as a whole.

use nalgebra::DVector;

use crate::error::{FilterError, Result};
use crate::estimators::auxiliary::normalize_log_weights;
use crate::models::KalmanState;
use crate::moments::weighted_moments;

/// A single particle, the result of propagating one output slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub state: DVector<f64>,
    pub parameter: DVector<f64>,
    pub log_weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePopulation {
    states: Vec<DVector<f64>>,
    parameters: Vec<DVector<f64>>,
    log_weights: DVector<f64>,
}

impl ParticlePopulation {
    pub fn new(
        states: Vec<DVector<f64>>,
        parameters: Vec<DVector<f64>>,
        log_weights: DVector<f64>,
    ) -> Result<ParticlePopulation> {
        if states.is_empty() {
            return Err(FilterError::InvalidArgument("population must have at least one particle"));
        }
        if states.len() != parameters.len() || states.len() != log_weights.nrows() {
            return Err(FilterError::InvalidArgument("particle arrays differ in length"));
        }
        Ok(ParticlePopulation {
            states,
            parameters,
            log_weights,
        })
    }

    /// A population with equal (zero) log weights.
    pub fn new_equal_likelihood(
        states: Vec<DVector<f64>>,
        parameters: Vec<DVector<f64>>,
    ) -> Result<ParticlePopulation> {
        let n = states.len();
        ParticlePopulation::new(states, parameters, DVector::zeros(n))
    }

    pub fn from_particles(particles: Vec<Particle>) -> Result<ParticlePopulation> {
        let n = particles.len();
        let mut states = Vec::with_capacity(n);
        let mut parameters = Vec::with_capacity(n);
        let mut log_weights = DVector::zeros(n);
        for (i, particle) in particles.into_iter().enumerate() {
            states.push(particle.state);
            parameters.push(particle.parameter);
            log_weights[i] = particle.log_weight;
        }
        ParticlePopulation::new(states, parameters, log_weights)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[DVector<f64>] {
        &self.states
    }

    pub fn parameters(&self) -> &[DVector<f64>] {
        &self.parameters
    }

    /// Unnormalised log weights.
    pub fn log_weights(&self) -> &DVector<f64> {
        &self.log_weights
    }

    pub fn particle(&self, i: usize) -> Particle {
        Particle {
            state: self.states[i].clone(),
            parameter: self.parameters[i].clone(),
            log_weight: self.log_weights[i],
        }
    }

    /// Weights normalised to sum to one.
    pub fn normalized_weights(&self) -> Result<DVector<f64>> {
        normalize_log_weights(&self.log_weights)
    }

    /// Effective sample size 1 / sum(w^2) of the normalised weights.
    ///
    /// Ranges from 1 when a single particle has all the weight to the number of particles when weights are equal.
    pub fn effective_sample_size(&self) -> Result<f64> {
        let w = self.normalized_weights()?;
        Ok(1. / w.norm_squared())
    }

    /// Weighted mean and covariance of the state particles.
    pub fn state_estimate(&self) -> Result<KalmanState> {
        Ok(weighted_moments(&self.states, &self.normalized_weights()?))
    }

    /// Weighted mean and covariance of the parameter particles.
    pub fn parameter_estimate(&self) -> Result<KalmanState> {
        Ok(weighted_moments(&self.parameters, &self.normalized_weights()?))
    }
}
