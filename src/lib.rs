pub mod display;
pub mod driver;
pub mod error;
pub mod io;
pub mod kernel;
pub mod logging;
pub mod matrix;
pub mod options;
pub mod progress;
pub mod window;

pub use driver::{
    eigh, solve_batch, solve_symmetric_eigen, solve_symmetric_eigen_with, validate,
    validate_matrix, CallPlan, EigenDecomposition, EigenProblem, MatrixView, ResolvedCall,
};
pub use error::{EigenError, Result};
pub use kernel::{kernel_fn, NalgebraKernel, SymmetricEigenKernel};
pub use matrix::{ComplexMatrix, FloatMatrix, Matrix, MatrixShape};
pub use options::{EigenOptions, JobMode, Triangle};
