#![allow(non_snake_case)]

//! Cholesky factorisation.
//!
//! LL' factorisation of positive semi-definite matrices. Where:
//! L is lower triangular
//!
//! Storage:
//! LC format of LL' factor
//! lower_triangle(LC) = L, strict_upper_triangle(LC) zeroed

use nalgebra as na;
use na::{allocator::Allocator, DefaultAllocator};
use na::{Dim, MatrixMN, MatrixN, RealField};

use super::rcond;

pub struct LC<N: RealField> {
    pub zero: N,
    pub one: N,
    pub minus_one: N,
}

impl<N: RealField> LC<N> {
    pub fn new() -> LC<N> {
        LC {
            zero: N::zero(),
            one: N::one(),
            minus_one: -N::one(),
        }
    }

    /// Estimate the reciprocal condition number for inversion of the original PSD matrix for which L is the factor LL'
    ///
    /// The rcond of the original matrix is simply the square of the rcond of diagonal(LC).
    pub fn LCrcond<R: Dim, C: Dim>(&self, LC: &MatrixMN<N, R, C>) -> N
    where
        DefaultAllocator: Allocator<N, R, C>,
    {
        let rcond = rcond::rcond_symmetric(LC);
        // Square to get rcond of original matrix, take care to propogate rcond's sign!
        if rcond < self.zero {
            -(rcond * rcond)
        } else {
            rcond * rcond
        }
    }

    /// In place lower triangular Cholesky factor of a Positive definite or semi-definite matrix M.
    ///
    /// Reference: A+G p.218, column ordered lower variant
    ///
    /// Input: M, n=last column to be included in factorisation, Strict upper triangle of M is ignored in computation
    ///
    /// Output: M as LC*LC' factor, lower_triangle(M) = LC, strict_upper_triangle(M) zeroed
    ///
    /// Return: reciprocal condition number, -1 if negative, 0 if semi-definite (including zero)
    pub fn LCfactor_n<R: Dim, C: Dim>(&self, M: &mut MatrixMN<N, R, C>, n: usize) -> N
    where
        DefaultAllocator: Allocator<N, R, C>,
    {
        for j in 0..n {
            let mut d = M[(j, j)];
            for k in 0..j {
                d -= M[(j, k)] * M[(j, k)];
            }

            // Diagonal element
            if d > self.zero {
                // Positive definite
                d = N::sqrt(d);
                M[(j, j)] = d;
                d = self.one / d;

                for i in j + 1..n {
                    let mut e = M[(i, j)];
                    for k in 0..j {
                        e -= M[(i, k)] * M[(j, k)];
                    }
                    M[(i, j)] = e * d;
                }
            } else if d == self.zero {
                // Possibly semi-definite, check not negative, the whole column must be identically zero
                for i in j + 1..n {
                    let mut e = M[(i, j)];
                    for k in 0..j {
                        e -= M[(i, k)] * M[(j, k)];
                    }
                    if e != self.zero {
                        return self.minus_one;
                    }
                    M[(i, j)] = self.zero;
                }
                M[(j, j)] = self.zero;
            } else {
                // Negative or NaN
                return self.minus_one;
            }
        }

        self.Uzero(M);

        // Estimate the reciprocal condition number
        self.LCrcond(M)
    }

    /// Zero strict upper triangle of Matrix.
    pub fn Uzero<R: Dim, C: Dim>(&self, M: &mut MatrixMN<N, R, C>)
    where
        DefaultAllocator: Allocator<N, R, C>,
    {
        let n = M.nrows();
        assert_eq!(n, M.ncols());
        for j in 1..n {
            for i in 0..j {
                M[(i, j)] = self.zero;
            }
        }
    }
}

/// Lower triangular Cholesky factor of a symmetric matrix.
///
/// Only the lower triangle of M is used.
///
/// Return: the factor and its reciprocal condition number, -1 if negative, 0 if semi-definite (including zero).
/// The factor is only meaningful when the rcond is positive.
pub fn lower_cholesky<N: RealField, D: Dim>(M: &MatrixN<N, D>) -> (MatrixN<N, D>, N)
where
    DefaultAllocator: Allocator<N, D, D>,
{
    let mut L = M.clone();
    let n = L.nrows();
    let rcond = LC::new().LCfactor_n(&mut L, n);
    (L, rcond)
}

/// Lower triangular Cholesky factor of a symmetric matrix, conditioned on its correlation matrix.
///
/// M = D.C.D' where D is the square root of diagonal(M). C is factorised and the factor rescaled by D, so the reciprocal condition
/// number returned is that of C and does not depend on the scale of each variable.
///
/// Return: the factor and the rcond of C, or of diagonal(M) if that is not positive.
pub fn scaled_lower_cholesky<N: RealField, D: Dim>(M: &MatrixN<N, D>) -> (MatrixN<N, D>, N)
where
    DefaultAllocator: Allocator<N, D, D> + Allocator<N, D>,
{
    let d = M.diagonal();
    let rcond_d = rcond::rcond_vec(&d);
    if !(rcond_d > N::zero()) {
        return (M.clone(), rcond_d);
    }

    let n = M.nrows();
    let s = d.map(N::sqrt);
    let mut L = M.clone();
    for j in 0..n {
        for i in 0..n {
            L[(i, j)] /= s[i] * s[j];
        }
    }
    let rcond = LC::new().LCfactor_n(&mut L, n);
    for i in 0..n {
        for j in 0..n {
            L[(i, j)] *= s[i];
        }
    }
    (L, rcond)
}
