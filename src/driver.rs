// src/driver.rs

//! Validation and dispatch in front of the symmetric eigensolver kernel.
//!
//! The driver never allocates or frees caller buffers. It resolves the
//! options against the matrix, checks every addressing invariant the kernel
//! relies on, carves the two windows out of the caller's buffers and makes
//! exactly one kernel call.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::{EigenError, Result};
use crate::kernel::{NalgebraKernel, SymmetricEigenKernel};
use crate::matrix::{FloatMatrix, Matrix, MatrixShape};
use crate::options::{EigenOptions, JobMode, Triangle};
use crate::window::{matrix_extent, required_len, ColumnMajorWindow, VectorWindow};

/// Fully resolved arguments of one kernel call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedCall {
    pub job: JobMode,
    pub triangle: Triangle,
    pub n: usize,
    pub ld: usize,
    pub offset_a: usize,
    pub offset_w: usize,
}

impl ResolvedCall {
    /// Number of matrix elements the kernel may touch, starting at `offset_a`.
    /// `None` if the span does not fit in `usize`.
    pub fn matrix_span(&self) -> Option<usize> {
        required_len(self.n, self.ld)
    }

    /// Exclusive end of the matrix window.
    pub fn matrix_end(&self) -> Option<usize> {
        matrix_extent(self.offset_a, self.n, self.ld)
    }

    /// Exclusive end of the eigenvalue window.
    pub fn eigenvalue_end(&self) -> Option<usize> {
        self.offset_w.checked_add(self.n)
    }
}

/// Outcome of validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallPlan {
    /// `n == 0`: nothing to do.
    Empty,
    Dispatch(ResolvedCall),
}

/// Matrix-side arguments resolved by [`validate_matrix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatrixView {
    pub n: usize,
    pub ld: usize,
    pub offset_a: usize,
}

/// Runs the checks that involve only the matrix: squareness when `n` is
/// defaulted, the empty problem, element kind, leading dimension, matrix
/// offset and extent. `Ok(None)` means `n == 0`.
pub fn validate_matrix(matrix: &Matrix, options: &EigenOptions) -> Result<Option<MatrixView>> {
    let n = match options.n {
        Some(n) => n,
        None => {
            if matrix.rows() != matrix.cols() {
                return Err(EigenError::shape("matrix not square"));
            }
            matrix.rows()
        }
    };
    if n == 0 {
        return Ok(None);
    }

    if let Matrix::Complex(_) = matrix {
        debug!("syevd: rejecting {} matrix", matrix.kind());
        return Err(EigenError::UnsupportedType(
            "complex input not supported".to_string(),
        ));
    }

    // Zero is never a usable stride and stands for "unset".
    let ld = options
        .leading_dimension
        .filter(|&ld| ld != 0)
        .unwrap_or_else(|| matrix.rows().max(1));
    if ld < n.max(1) {
        return Err(EigenError::layout("leading dimension too small"));
    }

    let offset_a = usize::try_from(options.offset_a)
        .map_err(|_| EigenError::range("negative matrix offset"))?;
    match matrix_extent(offset_a, n, ld) {
        Some(end) if end <= matrix.num_elements() => {}
        _ => {
            return Err(EigenError::range(
                "matrix buffer too small for requested view",
            ))
        }
    }

    Ok(Some(MatrixView { n, ld, offset_a }))
}

/// Runs the defaulting and validation sequence without calling a kernel.
///
/// Checks, in order: squareness when `n` is defaulted, the empty problem,
/// element kind, leading dimension, matrix offset and extent, eigenvalue
/// offset and extent. The first failing check wins.
pub fn validate(
    matrix: &Matrix,
    eigenvalues: &FloatMatrix,
    options: &EigenOptions,
) -> Result<CallPlan> {
    let view = match validate_matrix(matrix, options)? {
        Some(view) => view,
        None => return Ok(CallPlan::Empty),
    };

    let offset_w = usize::try_from(options.offset_w)
        .map_err(|_| EigenError::range("negative eigenvalue-buffer offset"))?;
    match offset_w.checked_add(view.n) {
        Some(end) if end <= eigenvalues.num_elements() => {}
        _ => return Err(EigenError::range("eigenvalue buffer too small")),
    }

    Ok(CallPlan::Dispatch(ResolvedCall {
        job: options.job,
        triangle: options.triangle,
        n: view.n,
        ld: view.ld,
        offset_a: view.offset_a,
        offset_w,
    }))
}

/// Computes eigenvalues (and optionally eigenvectors) of a real symmetric
/// matrix with the bundled [`NalgebraKernel`].
///
/// On success `eigenvalues[offset_w..offset_w + n]` holds the eigenvalues in
/// ascending order. With [`JobMode::EigenvaluesAndVectors`] the matrix window
/// is overwritten with the matching orthonormal eigenvectors, one per column;
/// otherwise its contents are unspecified after the call.
pub fn solve_symmetric_eigen(
    matrix: &mut Matrix,
    eigenvalues: &mut FloatMatrix,
    options: &EigenOptions,
) -> Result<()> {
    solve_symmetric_eigen_with(&NalgebraKernel, matrix, eigenvalues, options)
}

/// Same as [`solve_symmetric_eigen`], dispatching to an arbitrary kernel.
pub fn solve_symmetric_eigen_with<K>(
    kernel: &K,
    matrix: &mut Matrix,
    eigenvalues: &mut FloatMatrix,
    options: &EigenOptions,
) -> Result<()>
where
    K: SymmetricEigenKernel + ?Sized,
{
    let call = match validate(matrix, eigenvalues, options)? {
        CallPlan::Empty => {
            debug!("syevd: empty problem, nothing to do");
            return Ok(());
        }
        CallPlan::Dispatch(call) => call,
    };

    let a = match matrix {
        Matrix::Float(a) => a,
        Matrix::Complex(_) => {
            return Err(EigenError::UnsupportedType(
                "complex input not supported".to_string(),
            ))
        }
    };

    let mut a_window = ColumnMajorWindow::new(a.as_mut_slice(), call.offset_a, call.n, call.ld)?;
    let mut w_window = VectorWindow::new(eigenvalues.as_mut_slice(), call.offset_w, call.n)?;

    debug!(
        "syevd: jobz={} uplo={} n={} lda={} offset_a={} offset_w={}",
        call.job.code() as char,
        call.triangle.code() as char,
        call.n,
        call.ld,
        call.offset_a,
        call.offset_w
    );

    let status = kernel.syevd(
        call.job.code(),
        call.triangle.code(),
        call.n,
        a_window.as_mut_slice(),
        call.ld,
        w_window.as_mut_slice(),
    );
    if status != 0 {
        warn!("syevd kernel returned status {} for n = {}", status, call.n);
        return Err(EigenError::kernel(status));
    }
    Ok(())
}

/// One self-contained problem for [`solve_batch`].
#[derive(Clone, Debug)]
pub struct EigenProblem {
    pub matrix: Matrix,
    pub eigenvalues: FloatMatrix,
    pub options: EigenOptions,
}

impl EigenProblem {
    /// A problem over a whole square matrix, with an eigenvalue buffer sized
    /// to its order.
    pub fn new(matrix: FloatMatrix, options: EigenOptions) -> Self {
        let eigenvalues = FloatMatrix::column_vector(matrix.rows());
        EigenProblem {
            matrix: Matrix::Float(matrix),
            eigenvalues,
            options,
        }
    }
}

/// Solves independent problems in parallel. Results come back in input order.
pub fn solve_batch(problems: &mut [EigenProblem]) -> Vec<Result<()>> {
    solve_batch_with(&NalgebraKernel, problems)
}

pub fn solve_batch_with<K>(kernel: &K, problems: &mut [EigenProblem]) -> Vec<Result<()>>
where
    K: SymmetricEigenKernel + Sync + ?Sized,
{
    debug!("syevd: solving batch of {} problems", problems.len());
    problems
        .par_iter_mut()
        .map(|problem| {
            solve_symmetric_eigen_with(
                kernel,
                &mut problem.matrix,
                &mut problem.eigenvalues,
                &problem.options,
            )
        })
        .collect()
}

/// Owned eigen-decomposition `A = Q · diag(λ) · Qᵗ`.
#[derive(Clone, Debug)]
pub struct EigenDecomposition {
    /// Ascending.
    pub eigenvalues: Vec<f64>,
    /// Column `i` pairs with `eigenvalues[i]`.
    pub eigenvectors: FloatMatrix,
}

impl EigenDecomposition {
    pub fn reconstruct(&self) -> FloatMatrix {
        let q = self.eigenvectors.to_dmatrix();
        let lambda = DMatrix::from_diagonal(&DVector::from_column_slice(&self.eigenvalues));
        FloatMatrix::from(&q * lambda * q.transpose())
    }

    /// Largest entry of `|QᵗQ - I|`.
    pub fn max_orthogonality_error(&self) -> f64 {
        let q = self.eigenvectors.to_dmatrix();
        let gram = q.transpose() * &q;
        let identity = DMatrix::<f64>::identity(gram.nrows(), gram.ncols());
        (gram - identity).amax()
    }
}

/// Convenience wrapper: decomposes a copy of `matrix`, reading `triangle`.
pub fn eigh(matrix: &FloatMatrix, triangle: Triangle) -> Result<EigenDecomposition> {
    let mut work = Matrix::Float(matrix.clone());
    let mut eigenvalues = FloatMatrix::column_vector(matrix.rows());
    let options = EigenOptions::new().with_vectors().with_triangle(triangle);
    solve_symmetric_eigen(&mut work, &mut eigenvalues, &options)?;

    let eigenvectors = match work {
        Matrix::Float(q) => q,
        Matrix::Complex(_) => {
            return Err(EigenError::UnsupportedType(
                "complex input not supported".to_string(),
            ))
        }
    };
    Ok(EigenDecomposition {
        eigenvalues: eigenvalues.into_vec(),
        eigenvectors,
    })
}
