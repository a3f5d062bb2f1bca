// src/kernel.rs

//! The numerical kernel behind the driver.
//!
//! The driver only ever talks to a [`SymmetricEigenKernel`], which follows the
//! `?syevd` calling convention: character codes for the job and the stored
//! triangle, a column-major matrix with an explicit leading dimension, an
//! output slice for the eigenvalues, and an integer status (`0` on success).

use log::debug;
use nalgebra::{DMatrix, SymmetricEigen};

use crate::options::{JobMode, Triangle};
use crate::window::required_len;

/// QL sweeps allowed per unit of matrix order before giving up.
const SWEEPS_PER_ORDER: usize = 64;

/// Contract of a divide-and-conquer symmetric eigensolver.
///
/// On status `0`, `w[..n]` holds the eigenvalues in ascending order and, for
/// `jobz == b'V'`, column `k` of `a` (stride `lda`) holds the normalised
/// eigenvector of `w[k]`. For `jobz == b'N'` the contents of `a` are
/// unspecified afterwards. Any nonzero status means both buffers are undefined.
pub trait SymmetricEigenKernel {
    fn syevd(
        &self,
        jobz: u8,
        uplo: u8,
        n: usize,
        a: &mut [f64],
        lda: usize,
        w: &mut [f64],
    ) -> i32;
}

/// Pure-Rust kernel built on `nalgebra::SymmetricEigen`.
///
/// Status codes follow LAPACK's `INFO`:
/// * `-1`, `-2`: unknown job or triangle code
/// * `-5`: `lda < max(1, n)` or `a` shorter than `(n-1)*lda + n`
/// * `-6`: `w` shorter than `n`
/// * `j` (1-based): column `j` of the stored triangle holds a non-finite value
/// * `n + 1`: the iteration did not converge
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraKernel;

impl NalgebraKernel {
    pub fn new() -> Self {
        NalgebraKernel
    }
}

impl SymmetricEigenKernel for NalgebraKernel {
    fn syevd(
        &self,
        jobz: u8,
        uplo: u8,
        n: usize,
        a: &mut [f64],
        lda: usize,
        w: &mut [f64],
    ) -> i32 {
        let job = match JobMode::from_code(jobz) {
            Some(job) => job,
            None => return -1,
        };
        let triangle = match Triangle::from_code(uplo) {
            Some(triangle) => triangle,
            None => return -2,
        };
        if n == 0 {
            return 0;
        }
        if lda < n.max(1) || required_len(n, lda).map_or(true, |len| a.len() < len) {
            return -5;
        }
        if w.len() < n {
            return -6;
        }

        let full = match symmetric_from_triangle(a, n, lda, triangle) {
            Ok(full) => full,
            Err(column) => return failure_status(column + 1),
        };

        let decomposition =
            match SymmetricEigen::try_new(full, f64::EPSILON, SWEEPS_PER_ORDER * n) {
                Some(decomposition) => decomposition,
                None => {
                    debug!("nalgebra symmetric eigen did not converge for n = {}", n);
                    return failure_status(n.saturating_add(1));
                }
            };

        // nalgebra leaves the eigenpairs unordered.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&x, &y| {
            decomposition.eigenvalues[x].total_cmp(&decomposition.eigenvalues[y])
        });

        for (k, &idx) in order.iter().enumerate() {
            w[k] = decomposition.eigenvalues[idx];
        }

        if job.wants_vectors() {
            for (k, &idx) in order.iter().enumerate() {
                let column = decomposition.eigenvectors.column(idx);
                for i in 0..n {
                    a[i + k * lda] = column[i];
                }
            }
        }

        0
    }
}

/// Positive `INFO` value for a 1-based index, clamped so it never wraps to
/// zero or a negative (argument-error) status.
fn failure_status(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Expands the stored triangle of a strided column-major matrix into a full
/// symmetric matrix. On a non-finite entry returns its 0-based column.
fn symmetric_from_triangle(
    a: &[f64],
    n: usize,
    lda: usize,
    triangle: Triangle,
) -> Result<DMatrix<f64>, usize> {
    let mut full = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        let rows = match triangle {
            Triangle::Lower => j..n,
            Triangle::Upper => 0..j + 1,
        };
        for i in rows {
            let value = a[i + j * lda];
            if !value.is_finite() {
                return Err(j);
            }
            full[(i, j)] = value;
            full[(j, i)] = value;
        }
    }
    Ok(full)
}

/// Adapts a plain function or closure with the kernel signature.
#[derive(Clone, Copy, Debug)]
pub struct FnKernel<F>(F);

pub fn kernel_fn<F>(f: F) -> FnKernel<F>
where
    F: Fn(u8, u8, usize, &mut [f64], usize, &mut [f64]) -> i32,
{
    FnKernel(f)
}

impl<F> SymmetricEigenKernel for FnKernel<F>
where
    F: Fn(u8, u8, usize, &mut [f64], usize, &mut [f64]) -> i32,
{
    fn syevd(
        &self,
        jobz: u8,
        uplo: u8,
        n: usize,
        a: &mut [f64],
        lda: usize,
        w: &mut [f64],
    ) -> i32 {
        (self.0)(jobz, uplo, n, a, lda, w)
    }
}
