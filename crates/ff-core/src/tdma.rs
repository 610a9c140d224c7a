//! Thomas algorithm for tridiagonal systems.
//!
//! Row `i` of the system reads
//! `sub[i]·x[i-1] + diag[i]·x[i] + sup[i]·x[i+1] = rhs[i]`;
//! `sub[0]` and `sup[n-1]` are ignored.

use crate::error::{LinalgError, LinalgResult};

/// Default pivot magnitude below which a system is reported singular.
pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-14;

/// Tridiagonal solver with a configurable singularity threshold.
///
/// Stateless apart from the threshold, so one instance can be shared across
/// threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdmaSolver {
    pub pivot_epsilon: f64,
}

impl Default for TdmaSolver {
    fn default() -> Self {
        Self {
            pivot_epsilon: DEFAULT_PIVOT_EPSILON,
        }
    }
}

impl TdmaSolver {
    pub fn new(pivot_epsilon: f64) -> Self {
        Self { pivot_epsilon }
    }

    /// Solve the tridiagonal system, returning `x` with `x.len() == rhs.len()`.
    pub fn solve(
        &self,
        sub: &[f64],
        diag: &[f64],
        sup: &[f64],
        rhs: &[f64],
    ) -> LinalgResult<Vec<f64>> {
        let n = rhs.len();
        if n == 0 {
            return Err(LinalgError::Empty);
        }
        check_len("sub-diagonal", n, sub.len())?;
        check_len("diagonal", n, diag.len())?;
        check_len("super-diagonal", n, sup.len())?;

        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        // Forward elimination
        let pivot = self.check_pivot(0, diag[0])?;
        c_prime[0] = sup[0] / pivot;
        d_prime[0] = rhs[0] / pivot;

        for i in 1..n {
            let pivot = self.check_pivot(i, diag[i] - sub[i] * c_prime[i - 1])?;
            if i < n - 1 {
                c_prime[i] = sup[i] / pivot;
            }
            d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / pivot;
        }

        // Back substitution
        let mut x = d_prime;
        for i in (0..n - 1).rev() {
            x[i] -= c_prime[i] * x[i + 1];
        }

        Ok(x)
    }

    fn check_pivot(&self, row: usize, pivot: f64) -> LinalgResult<f64> {
        if pivot.abs() < self.pivot_epsilon || !pivot.is_finite() {
            Err(LinalgError::Singular { row, pivot })
        } else {
            Ok(pivot)
        }
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> LinalgResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LinalgError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Solve with the default pivot threshold.
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> LinalgResult<Vec<f64>> {
    TdmaSolver::default().solve(sub, diag, sup, rhs)
}
