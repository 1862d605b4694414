///
/// Liu-West the online parameter learning particle filter.
/// Copyright (c) 2020 Michael Stevens
///
/// Hidden Markov models describe a latent state evolving over time which is only seen through noisy observations.
/// Such models are rarely known exactly: the transition and observation laws depend on static parameters that must be learnt from the same
/// observations used to track the state.
///
/// Sequential Monte Carlo represents the joint posterior of state and parameters by a weighted population of particles. Each new
/// observation refreshes the population, so no batch inference needs to be rerun as data arrives. Static parameters cannot be propagated
/// like the state, resampling alone would collapse them onto a handful of values. The Liu-West filter replaces the empirical parameter
/// distribution by a shrunk Gaussian kernel density estimate which keeps the particle cloud's mean and variance.
///
/// Models are represented by the [`HiddenMarkovModel`] trait. The filter is generic over this trait and never depends on a concrete model.
/// The random number generator is always supplied by the caller, results are reproducible for a seeded generator.
///
/// [`HiddenMarkovModel`]: models/trait.HiddenMarkovModel.html
//
/// # Licensing
///
/// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction,
/// including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software,
/// and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
///
/// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
///
/// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
/// FITNESS FOR A PARTICULAR PURPOSE AND NON INFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY,
/// WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

pub mod error;
pub mod estimators;
pub mod linalg;
pub mod models;
pub mod moments;
pub mod noise;

pub use error::{FilterError, Result};
pub use estimators::liu_west::{LiuWestConfig, LiuWestFilter};
pub use models::{HiddenMarkovModel, InitialSampler, KalmanState, PointEstimateSampler};
