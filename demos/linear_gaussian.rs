//! Operation of the Liu-West filter in a simple example.
//!
//! The state of a linear Gaussian model reverts to an unknown level. The filter learns the level from noisy observations of the state.
//! Run with RUST_LOG=debug to see each update.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_core::RngCore;
use rand_distr::{Distribution, Normal, StandardNormal};

use liu_west::models::HiddenMarkovModel;
use liu_west::{LiuWestConfig, LiuWestFilter};

/// x(t) = level + phi * (x(t-1) - level) + w, y(t) = x(t) + v
struct MeanReverting {
    phi: f64,
    transition_sd: f64,
    observation_sd: f64,
}

impl HiddenMarkovModel for MeanReverting {
    type Observation = f64;

    fn state_dimension(&self) -> usize {
        1
    }

    fn vectorize_params(&self, _include_all: bool) -> DVector<f64> {
        DVector::zeros(1)
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
        let z = (observation - state[0]) / self.observation_sd;
        Ok(-0.5 * z * z - self.observation_sd.ln())
    }

    fn simulate_transition(
        &self,
        rng: &mut dyn RngCore,
        state: &DVector<f64>,
        time_from: i64,
        parameters: &DVector<f64>,
    ) -> Result<DVector<f64>, &'static str> {
        let w: f64 = rng.sample(StandardNormal);
        let mean = self.predicted_state_mean(state, time_from + 1, parameters)?;
        Ok(mean.add_scalar(self.transition_sd * w))
    }
}

fn main() {
    env_logger::init();

    // We need reproducible random numbers
    let mut rng = StdRng::seed_from_u64(2020);

    let model = MeanReverting {
        phi: 0.5,
        transition_sd: 0.5,
        observation_sd: 0.5,
    };
    let true_level = 2.;

    // Simulate observations with the true level
    let w = Normal::new(0., model.transition_sd).unwrap();
    let v = Normal::new(0., model.observation_sd).unwrap();
    let mut x = true_level;
    let observations: Vec<f64> = (0..200)
        .map(|_| {
            x = true_level + model.phi * (x - true_level) + w.sample(&mut rng);
            x + v.sample(&mut rng)
        })
        .collect();

    // A vague prior for the level, states start about the level
    let prior = |_: &MeanReverting, rng: &mut dyn RngCore| -> Result<_, &'static str> {
        let level = 2. * rng.sample::<f64, _>(StandardNormal);
        let state = level + rng.sample::<f64, _>(StandardNormal);
        Ok((DVector::from_element(1, state), DVector::from_element(1, level)))
    };
    let config = LiuWestConfig::new(1000).with_kernel_scale_factor(0.2);
    let mut filter = LiuWestFilter::with_initial_sampler(&model, &config, prior, &mut rng).unwrap();

    for (t, y) in observations.iter().enumerate() {
        filter.par_update(&mut rng, y, t as i64 + 1).unwrap();
        if (t + 1) % 50 == 0 {
            let level = filter.parameter_estimate().unwrap();
            println!(
                "t {} level {:.3} sd {:.3} effective sample size {:.0}",
                t + 1,
                level.x[0],
                level.X[(0, 0)].sqrt(),
                filter.effective_sample_size().unwrap()
            );
        }
    }
    println!("state {}", filter.state_estimate().unwrap().x);
}
