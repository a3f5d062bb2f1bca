// src/error.rs

//! Typed failures reported by the eigen-decomposition driver and its helpers.

use std::io;
use thiserror::Error;

/// Every way a call into the driver can fail.
///
/// Validation variants are always produced before the kernel is reached, so
/// none of them implies that a caller buffer was touched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EigenError {
    /// Logical dimension mismatch, e.g. a non-square matrix with the default order.
    #[error("ShapeError: {0}")]
    Shape(String),
    /// Leading dimension too small for the requested order.
    #[error("LayoutError: {0}")]
    Layout(String),
    /// Negative offset, or a buffer too small for the computed access window.
    #[error("RangeError: {0}")]
    Range(String),
    /// Element type the kernel cannot handle.
    #[error("UnsupportedTypeError: {0}")]
    UnsupportedType(String),
    /// Nonzero status returned by the kernel.
    #[error("KernelError: {message} (status {status})")]
    Kernel { message: String, status: i32 },
    /// Option string that names no known job mode or triangle.
    #[error("OptionError: {0}")]
    InvalidOption(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("npy error: {0}")]
    Npy(String),
}

impl EigenError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        EigenError::Shape(msg.into())
    }

    pub(crate) fn layout(msg: impl Into<String>) -> Self {
        EigenError::Layout(msg.into())
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        EigenError::Range(msg.into())
    }

    pub(crate) fn kernel(status: i32) -> Self {
        EigenError::Kernel {
            message: "eigen-decomposition kernel reported failure".to_string(),
            status,
        }
    }

    /// Raw kernel status, if this error came from the kernel.
    pub fn status(&self) -> Option<i32> {
        match self {
            EigenError::Kernel { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures detected before any kernel call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EigenError::Shape(_)
                | EigenError::Layout(_)
                | EigenError::Range(_)
                | EigenError::UnsupportedType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EigenError>;
