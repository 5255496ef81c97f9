//! Gram matrix utilities.
//!
//! A kernel engine returns a dense symmetric matrix of pairwise similarities. Downstream
//! learners usually want it normalized to unit self similarity, and discard matrices
//! containing non finite entries (which happen with ill chosen hyper parameters).


use ndarray::Array2;

/// normalize in place : K[i][j] <- K[i][j] / sqrt(K[i][i] * K[j][j]).
/// Entries with a non positive diagonal produce non finite values, left to the caller to detect.
pub fn normalize_gram(kmatrix: &mut Array2<f64>) {
    let n = kmatrix.nrows();
    let diag: Vec<f64> = (0..n).map(|i| kmatrix[[i, i]]).collect();
    for i in 0..n {
        for j in 0..n {
            if i != j {
                kmatrix[[i, j]] /= (diag[i] * diag[j]).sqrt();
            }
        }
    }
    for i in 0..n {
        kmatrix[[i, i]] = 1.;
    }
} // end of normalize_gram

/// true if the matrix contains a nan or an infinite entry
pub fn has_non_finite(kmatrix: &Array2<f64>) -> bool {
    kmatrix.iter().any(|x| !x.is_finite())
}

/// symmetry check within tolerance. Mostly for tests
pub fn is_symmetric(kmatrix: &Array2<f64>, tol: f64) -> bool {
    let n = kmatrix.nrows();
    if n != kmatrix.ncols() {
        return false;
    }
    for i in 0..n {
        for j in i + 1..n {
            if (kmatrix[[i, j]] - kmatrix[[j, i]]).abs() > tol {
                return false;
            }
        }
    }
    true
} // end of is_symmetric


//==============================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_normalize_gram() {
        let mut k = arr2(&[[4., 2.], [2., 9.]]);
        normalize_gram(&mut k);
        assert!((k[[0, 0]] - 1.).abs() < 1.0e-12);
        assert!((k[[1, 1]] - 1.).abs() < 1.0e-12);
        assert!((k[[0, 1]] - 2. / 6.).abs() < 1.0e-12);
        assert!(is_symmetric(&k, 1.0e-12));
    } // end of test_normalize_gram

    #[test]
    fn test_has_non_finite() {
        let mut k = arr2(&[[1., 0.], [0., 0.]]);
        assert!(!has_non_finite(&k));
        normalize_gram(&mut k);
        // zero self similarity propagates a nan off diagonal
        assert!(has_non_finite(&k));
    } // end of test_has_non_finite
} // end of mod tests
