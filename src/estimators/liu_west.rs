//! Liu-West particle filter.
//!
//! Joint estimation of the state and the static parameters of a [`HiddenMarkovModel`].
//!
//! An auxiliary particle filter is used. Ancestors are selected with a deterministic forecast of each particle, which is cheap and
//! looks ahead to the new observation. Parameters are then drawn from a kernel density estimate of the parameter particles and the
//! state is propagated stochastically. The weights correct for ancestor selection having used the forecast.
//!
//! The update either completes and replaces the whole population or fails and leaves it unchanged.
//!
//! [`HiddenMarkovModel`]: ../../models/trait.HiddenMarkovModel.html

use log::{debug, trace, warn};
use nalgebra::DVector;
use rand::rngs::mock::StepRng;
use rand_core::RngCore;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::estimators::auxiliary::{normalize_log_weights, AncestorSampler};
use crate::estimators::kernel::KernelSmoother;
use crate::estimators::population::{Particle, ParticlePopulation};
use crate::estimators::propagate::{first_stage_log_density, Propagator};
use crate::models::{HiddenMarkovModel, InitialSampler, KalmanState, PointEstimateSampler};
use crate::noise::CoupledNoise;

/// Default kernel scale factor.
pub const DEFAULT_KERNEL_SCALE_FACTOR: f64 = 0.01;

/// Filter configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LiuWestConfig {
    pub number_of_particles: usize,
    /// The kernel density estimate of the parameters has variance kernel_scale_factor^2 * sample variance of the parameter particles.
    pub kernel_scale_factor: f64,
}

impl Default for LiuWestConfig {
    fn default() -> Self {
        LiuWestConfig {
            number_of_particles: 1000,
            kernel_scale_factor: DEFAULT_KERNEL_SCALE_FACTOR,
        }
    }
}

impl LiuWestConfig {
    pub fn new(number_of_particles: usize) -> Self {
        LiuWestConfig {
            number_of_particles,
            ..Default::default()
        }
    }

    pub fn with_kernel_scale_factor(mut self, kernel_scale_factor: f64) -> Self {
        self.kernel_scale_factor = kernel_scale_factor;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.number_of_particles == 0 {
            return Err(FilterError::InvalidArgument("the number of particles must be positive"));
        }
        KernelSmoother::new(self.kernel_scale_factor).map(|_| ())
    }
}

pub struct LiuWestFilter<'a, M: HiddenMarkovModel + ?Sized> {
    model: &'a M,
    population: ParticlePopulation,
    kernel: KernelSmoother,
    last_observation_time: Option<i64>,
}

impl<'a, M: HiddenMarkovModel + ?Sized> LiuWestFilter<'a, M> {
    /// A filter with every particle at the model's point estimate, see [`PointEstimateSampler`].
    ///
    /// [`PointEstimateSampler`]: ../../models/struct.PointEstimateSampler.html
    pub fn new(model: &'a M, number_of_particles: usize, kernel_scale_factor: f64) -> Result<Self> {
        Self::with_config(
            model,
            &LiuWestConfig::new(number_of_particles).with_kernel_scale_factor(kernel_scale_factor),
        )
    }

    pub fn with_config(model: &'a M, config: &LiuWestConfig) -> Result<Self> {
        // The point estimate sampler makes no draws
        let mut rng = StepRng::new(0, 0);
        Self::with_initial_sampler(model, config, PointEstimateSampler, &mut rng)
    }

    /// A filter with particles drawn by `sampler`.
    ///
    /// Each particle's state must have the model's state dimension and its parameter the dimension of the model's vectorised parameters.
    pub fn with_initial_sampler(
        model: &'a M,
        config: &LiuWestConfig,
        mut sampler: impl InitialSampler<M>,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        config.validate()?;
        let kernel = KernelSmoother::new(config.kernel_scale_factor)?;

        let n = config.number_of_particles;
        let state_dim = model.state_dimension();
        let parameter_dim = model.vectorize_params(true).nrows();
        let mut states = Vec::with_capacity(n);
        let mut parameters = Vec::with_capacity(n);
        for _ in 0..n {
            let (state, parameter) = sampler.sample(model, rng)?;
            if state.nrows() != state_dim {
                return Err(FilterError::InvalidArgument("initial state has wrong dimension"));
            }
            if parameter.nrows() != parameter_dim {
                return Err(FilterError::InvalidArgument("initial parameter has wrong dimension"));
            }
            states.push(state);
            parameters.push(parameter);
        }

        Ok(LiuWestFilter {
            model,
            population: ParticlePopulation::new_equal_likelihood(states, parameters)?,
            kernel,
            last_observation_time: None,
        })
    }

    pub fn number_of_particles(&self) -> usize {
        self.population.len()
    }

    pub fn kernel_scale_factor(&self) -> f64 {
        self.kernel.scale()
    }

    pub fn shrinkage(&self) -> f64 {
        self.kernel.shrinkage()
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn population(&self) -> &ParticlePopulation {
        &self.population
    }

    pub fn state_particles(&self) -> &[DVector<f64>] {
        self.population.states()
    }

    pub fn parameter_particles(&self) -> &[DVector<f64>] {
        self.population.parameters()
    }

    pub fn log_weights(&self) -> &DVector<f64> {
        self.population.log_weights()
    }

    pub fn normalized_weights(&self) -> Result<DVector<f64>> {
        self.population.normalized_weights()
    }

    pub fn effective_sample_size(&self) -> Result<f64> {
        self.population.effective_sample_size()
    }

    /// The filter's estimate of the state, as weighted mean and covariance.
    pub fn state_estimate(&self) -> Result<KalmanState> {
        self.population.state_estimate()
    }

    /// The filter's estimate of the parameters, as weighted mean and covariance.
    pub fn parameter_estimate(&self) -> Result<KalmanState> {
        self.population.parameter_estimate()
    }

    /// Time of the last successful update.
    pub fn last_observation_time(&self) -> Option<i64> {
        self.last_observation_time
    }

    /// Update the particles with a new observation made at `observation_time`.
    ///
    /// Observation times must not decrease from one update to the next.
    /// On error the population is unchanged. A NotPositiveDefinite error means the parameter particles have collapsed, more particles or a
    /// larger kernel scale factor are required.
    pub fn update(
        &mut self,
        rng: &mut dyn RngCore,
        observation: &M::Observation,
        observation_time: i64,
    ) -> Result<()> {
        let (predicted_parameters, kernel_noise) = self.prepare(observation_time)?;
        let model = self.model;
        let previous = &self.population;

        let first_stage_log_densities = (0..previous.len())
            .map(|i| {
                first_stage_log_density(model, previous, &predicted_parameters, observation, observation_time, i)
            })
            .collect::<Result<Vec<_>>>()?;

        self.advance(
            rng,
            observation_time,
            predicted_parameters,
            first_stage_log_densities,
            kernel_noise,
            |propagator, previous| {
                (0..previous.len())
                    .map(|slot| propagator.propagate(model, previous, observation, observation_time, slot))
                    .collect()
            },
        )
    }

    /// Check the observation time and smooth the parameters.
    fn prepare(&self, observation_time: i64) -> Result<(Vec<DVector<f64>>, CoupledNoise)> {
        if let Some(last) = self.last_observation_time {
            if observation_time < last {
                return Err(FilterError::TimeOrder {
                    time: observation_time,
                    last,
                });
            }
        }

        let smoothed = self.kernel.smooth(self.population.parameters());
        match &smoothed {
            Ok(_) => trace!(
                "kernel scale {} shrinkage {}",
                self.kernel.scale(),
                self.kernel.shrinkage()
            ),
            Err(e) => warn!("parameter particles have collapsed: {}", e),
        }
        smoothed
    }

    /// Resample with the auxiliary weights, propagate every slot and replace the population.
    fn advance(
        &mut self,
        rng: &mut dyn RngCore,
        observation_time: i64,
        predicted_parameters: Vec<DVector<f64>>,
        first_stage_log_densities: Vec<f64>,
        kernel_noise: CoupledNoise,
        propagate: impl FnOnce(&Propagator, &ParticlePopulation) -> Result<Vec<Particle>>,
    ) -> Result<()> {
        let aux_log_weights =
            self.population.log_weights() + DVector::from_column_slice(&first_stage_log_densities);
        let ancestors = normalize_log_weights(&aux_log_weights)
            .and_then(|w| AncestorSampler::new(&w))
            .map_err(|e| {
                warn!("auxiliary weights cannot be resampled: {}", e);
                e
            })?;

        let propagator = Propagator {
            predicted_parameters,
            first_stage_log_densities,
            ancestors,
            kernel_noise,
            seed: rng.next_u64(),
        };
        let particles = propagate(&propagator, &self.population)?;

        self.replace(ParticlePopulation::from_particles(particles)?, observation_time);
        Ok(())
    }

    fn replace(&mut self, population: ParticlePopulation, observation_time: i64) {
        self.population = population;
        self.last_observation_time = Some(observation_time);
        debug!(
            "update at time {}: {} particles, effective sample size {:?}",
            observation_time,
            self.population.len(),
            self.population.effective_sample_size().ok()
        );
    }
}

impl<'a, M> LiuWestFilter<'a, M>
where
    M: HiddenMarkovModel + Sync + ?Sized,
    M::Observation: Sync,
{
    /// Update computing particles in parallel.
    ///
    /// For the same random generator state the result is identical to [`update`].
    ///
    /// [`update`]: #method.update
    pub fn par_update(
        &mut self,
        rng: &mut dyn RngCore,
        observation: &M::Observation,
        observation_time: i64,
    ) -> Result<()> {
        let (predicted_parameters, kernel_noise) = self.prepare(observation_time)?;
        let model = self.model;
        let previous = &self.population;

        let first_stage_log_densities = (0..previous.len())
            .into_par_iter()
            .map(|i| {
                first_stage_log_density(model, previous, &predicted_parameters, observation, observation_time, i)
            })
            .collect::<Result<Vec<_>>>()?;

        self.advance(
            rng,
            observation_time,
            predicted_parameters,
            first_stage_log_densities,
            kernel_noise,
            |propagator, previous| {
                (0..previous.len())
                    .into_par_iter()
                    .map(|slot| propagator.propagate(model, previous, observation, observation_time, slot))
                    .collect()
            },
        )
    }
}
