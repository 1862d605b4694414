//! Linear algebra support for particle filtering.
//!
//! Factorisations report a reciprocal condition number rather than failing. Callers decide the limit they accept.

pub mod cholesky;
pub mod rcond;

use crate::error::{FilterError, Result};

/// Minimum reciprocal condition number accepted for a positive definite factorisation.
pub const LIMIT_PD: f64 = std::f64::EPSILON;

/**
 * Checks a the reciprocal condition number exceeds LIMIT_PD
 * IEC 559 NaN values are never true
 */
pub fn check_positive_definite(rcond: f64) -> Result<f64> {
    if rcond > LIMIT_PD {
        Ok(rcond)
    } else {
        Err(FilterError::NotPositiveDefinite { rcond })
    }
}
