use nalgebra::{RealField, Dim, VectorN, MatrixMN, DefaultAllocator, allocator::Allocator};

/**
 * Numerical comparison of reciprocal condition numbers
 *  Required for all factorisations of sample covariances
 */

/* Estimate the reciprocal condition number of a Diagonal Matrix for inversion.
 * D represents a diagonal matrix, the parameter is actually passed as a vector
 *
 * The Condition Number is defined from a matrix norm.
 *  Choose max element of D as the norm of the original matrix.
 *  Assume this norm for inverse matrix is min element D.
 *  Therefore rcond = min/max
 *
 * Note:
 *  Defined to be 0 for semi-definite and 0 for an empty matrix
 *  Defined to be 0 for max and min infinite
 *  Defined to be <0 for negative matrix (D element a value  < 0)
 *  Defined to be <0 with any NaN element
 *
 *  By definition rcond <= 1 as min<=max
 */
pub fn rcond_vec<N: RealField, R: Dim>(dv: &VectorN<N, R>) -> N
    where DefaultAllocator: Allocator<N, R>
{
    rcond_diagonal(dv.nrows(), |i| dv[i])
}

/// Reciprocal condition number of the diagonal of a square matrix.
///
/// Off diagonal elements are ignored. Applied to a triangular factor or the d of a UdU' factor.
pub fn rcond_symmetric<N: RealField, R: Dim, C: Dim>(sm: &MatrixMN<N, R, C>) -> N
    where DefaultAllocator: Allocator<N, R, C>
{
    assert_eq!(sm.nrows(), sm.ncols());
    rcond_diagonal(sm.nrows(), |i| sm[(i, i)])
}

fn rcond_diagonal<N: RealField>(n: usize, element: impl Fn(usize) -> N) -> N {
    // Special case an empty matrix
    if n == 0 {
        return N::zero();
    }
    let mut mind = element(0);
    let mut maxd = mind;

    for i in 0..n {
        let d = element(i);
        if d != d {
            // NaN
            return -N::one();
        }
        if d < mind {
            mind = d;
        }
        if d > maxd {
            maxd = d;
        }
    }

    rcond_min_max(mind, maxd)
}

fn rcond_min_max<N: RealField>(mind: N, maxd: N) -> N {
    if mind < N::zero() {
        // matrix is negative
        mind    // mind < 0 but does not represent a rcond
    } else {
        // ISSUE mind may still be -0, this is progated into rcond
        assert!(mind <= maxd); // check sanity

        let rcond = mind / maxd; // rcond from min/max norm
        if rcond != rcond {
            // NaN, singular due to (mind == maxd) == (zero or infinity)
            N::zero()
        } else {
            assert!(rcond <= N::one());
            rcond
        }
    }
}
