//! Particle estimation of hidden Markov models.
//!
//! [`liu_west`] is the filter. The remaining modules are its parts: the particle population, kernel smoothing of parameters,
//! auxiliary resampling and propagation of the resampled particles.

pub mod auxiliary;
pub mod kernel;
pub mod liu_west;
pub mod population;
pub mod propagate;
