// src/options.rs

//! Per-call configuration for the symmetric eigen-decomposition driver.

use std::fmt;
use std::str::FromStr;

use crate::error::EigenError;

/// What the kernel should compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JobMode {
    /// Eigenvalues only. The matrix contents are destroyed.
    #[default]
    EigenvaluesOnly,
    /// Eigenvalues plus orthonormal eigenvectors written over the matrix.
    EigenvaluesAndVectors,
}

impl JobMode {
    /// Kernel character code (`JOBZ`).
    pub fn code(self) -> u8 {
        match self {
            JobMode::EigenvaluesOnly => b'N',
            JobMode::EigenvaluesAndVectors => b'V',
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code.to_ascii_uppercase() {
            b'N' => Some(JobMode::EigenvaluesOnly),
            b'V' => Some(JobMode::EigenvaluesAndVectors),
            _ => None,
        }
    }

    pub fn wants_vectors(self) -> bool {
        self == JobMode::EigenvaluesAndVectors
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobMode::EigenvaluesOnly => write!(f, "values"),
            JobMode::EigenvaluesAndVectors => write!(f, "vectors"),
        }
    }
}

impl FromStr for JobMode {
    type Err = EigenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "values" | "eigenvalues" => Ok(JobMode::EigenvaluesOnly),
            "v" | "vectors" | "eigenvectors" => Ok(JobMode::EigenvaluesAndVectors),
            other => Err(EigenError::InvalidOption(format!(
                "unknown job mode '{}' (expected N/values or V/vectors)",
                other
            ))),
        }
    }
}

/// Which half of the symmetric matrix holds valid data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Triangle {
    #[default]
    Lower,
    Upper,
}

impl Triangle {
    /// Kernel character code (`UPLO`).
    pub fn code(self) -> u8 {
        match self {
            Triangle::Lower => b'L',
            Triangle::Upper => b'U',
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code.to_ascii_uppercase() {
            b'L' => Some(Triangle::Lower),
            b'U' => Some(Triangle::Upper),
            _ => None,
        }
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Triangle::Lower => write!(f, "lower"),
            Triangle::Upper => write!(f, "upper"),
        }
    }
}

impl FromStr for Triangle {
    type Err = EigenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "lower" => Ok(Triangle::Lower),
            "u" | "upper" => Ok(Triangle::Upper),
            other => Err(EigenError::InvalidOption(format!(
                "unknown triangle '{}' (expected L/lower or U/upper)",
                other
            ))),
        }
    }
}

/// Options for one driver call.
///
/// Unset fields resolve against the matrix at call time:
///
/// | field               | default                  |
/// |---------------------|--------------------------|
/// | `job`               | `EigenvaluesOnly`        |
/// | `triangle`          | `Lower`                  |
/// | `n`                 | `rows(matrix)`           |
/// | `leading_dimension` | `max(1, rows(matrix))`   |
/// | `offset_a`          | `0`                      |
/// | `offset_w`          | `0`                      |
///
/// `leading_dimension = Some(0)` means the same as `None`: zero is never a
/// usable stride, so it resolves to the default.
///
/// Offsets are signed so that a negative value coming from outside (CLI,
/// arithmetic in the caller) is reported as a range error rather than wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EigenOptions {
    pub job: JobMode,
    pub triangle: Triangle,
    pub n: Option<usize>,
    pub leading_dimension: Option<usize>,
    pub offset_a: isize,
    pub offset_w: isize,
}

impl EigenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, job: JobMode) -> Self {
        self.job = job;
        self
    }

    pub fn with_vectors(self) -> Self {
        self.with_job(JobMode::EigenvaluesAndVectors)
    }

    pub fn with_triangle(mut self, triangle: Triangle) -> Self {
        self.triangle = triangle;
        self
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_leading_dimension(mut self, ld: usize) -> Self {
        self.leading_dimension = Some(ld);
        self
    }

    pub fn with_offset_a(mut self, offset: isize) -> Self {
        self.offset_a = offset;
        self
    }

    pub fn with_offset_w(mut self, offset: isize) -> Self {
        self.offset_w = offset;
        self
    }
}
