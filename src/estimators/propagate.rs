//! Propagation of the resampled particles.
//!
//! A [`Propagator`] holds everything a generation shares between output slots. Every slot reads only the previous generation
//! and these shared values, slots can therefore be computed in any order or in parallel.

use nalgebra::DVector;

use crate::error::Result;
use crate::estimators::auxiliary::{particle_rng, AncestorSampler};
use crate::estimators::population::{Particle, ParticlePopulation};
use crate::models::HiddenMarkovModel;
use crate::noise::CoupledNoise;

pub struct Propagator {
    /// Kernel centre of each previous particle
    pub predicted_parameters: Vec<DVector<f64>>,
    /// Log observation density at the forecast and kernel centre
    pub first_stage_log_densities: Vec<f64>,
    /// Ancestor distribution from the auxiliary weights
    pub ancestors: AncestorSampler,
    /// Parameter kernel
    pub kernel_noise: CoupledNoise,
    /// Seed of the generation's random streams
    pub seed: u64,
}

/// First stage log density of particle `i` of the previous generation.
///
/// The observation density at the particle's deterministic state forecast and its kernel centre.
pub fn first_stage_log_density<M: HiddenMarkovModel + ?Sized>(
    model: &M,
    previous: &ParticlePopulation,
    predicted_parameters: &[DVector<f64>],
    observation: &M::Observation,
    observation_time: i64,
    i: usize,
) -> Result<f64> {
    let forecast = model.predicted_state_mean(&previous.states()[i], observation_time, &previous.parameters()[i])?;
    Ok(model.log_observation_density(observation, &forecast, observation_time, &predicted_parameters[i])?)
}

impl Propagator {
    /// Compute output slot `slot` of the next generation.
    ///
    /// Draws an ancestor, a parameter from the ancestor's kernel and a state transition under that parameter.
    /// The log weight corrects for the ancestor having been chosen with the forecast rather than the simulated state.
    pub fn propagate<M: HiddenMarkovModel + ?Sized>(
        &self,
        model: &M,
        previous: &ParticlePopulation,
        observation: &M::Observation,
        observation_time: i64,
        slot: usize,
    ) -> Result<Particle> {
        let mut rng = particle_rng(self.seed, slot);
        let k = self.ancestors.sample(&mut rng);

        let parameter = &self.predicted_parameters[k] + self.kernel_noise.sample(&mut rng);
        let state = model.simulate_transition(
            &mut rng,
            &previous.states()[k],
            observation_time - 1,
            &parameter,
        )?;
        let log_weight = model.log_observation_density(observation, &state, observation_time, &parameter)?
            - self.first_stage_log_densities[k];

        Ok(Particle {
            state,
            parameter,
            log_weight,
        })
    }
}
