// src/matrix.rs

//! Dense column-major matrices handed to the driver.
//!
//! Element kind is a tagged variant: [`Matrix::Float`] is what the kernel
//! understands, [`Matrix::Complex`] exists so that callers holding complex
//! data get a typed rejection instead of a silent reinterpretation.

use approx::abs_diff_eq;
use nalgebra::{Complex, DMatrix};
use ndarray::{Array2, ArrayView2};

use crate::error::{EigenError, Result};

/// Shape information shared by every dense matrix representation.
pub trait MatrixShape {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    /// Length of the flat backing store.
    fn num_elements(&self) -> usize;

    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }
}

/// Real matrix stored column-major in a flat buffer of `rows * cols` values.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FloatMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        FloatMatrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = FloatMatrix::zeros(n, n);
        for i in 0..n {
            m.data[i + i * n] = 1.0;
        }
        m
    }

    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut m = FloatMatrix::zeros(n, n);
        for (i, &d) in diag.iter().enumerate() {
            m.data[i + i * n] = d;
        }
        m
    }

    /// A `len × 1` column vector, the usual shape of an eigenvalue buffer.
    pub fn column_vector(len: usize) -> Self {
        FloatMatrix::zeros(len, 1)
    }

    /// Wraps an existing column-major buffer.
    pub fn from_column_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EigenError::shape(format!(
                "buffer of {} elements cannot back a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(FloatMatrix { rows, cols, data })
    }

    /// Builds a matrix from row-major values, e.g. rows read from a CSV file.
    pub fn from_row_major(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(EigenError::shape(format!(
                "{} values cannot fill a {}x{} matrix",
                values.len(),
                rows,
                cols
            )));
        }
        let mut data = Vec::with_capacity(rows * cols);
        for j in 0..cols {
            for i in 0..rows {
                data.push(values[i * cols + j]);
            }
        }
        Ok(FloatMatrix { rows, cols, data })
    }

    pub fn from_array(array: ArrayView2<'_, f64>) -> Self {
        let (rows, cols) = array.dim();
        let mut data = Vec::with_capacity(rows * cols);
        for column in array.columns() {
            data.extend(column.iter().copied());
        }
        FloatMatrix { rows, cols, data }
    }

    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.cols), |(i, j)| self.data[i + j * self.rows])
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.rows, self.cols, &self.data)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[i + j * self.rows])
        } else {
            None
        }
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of bounds", i, j);
        self.data[i + j * self.rows] = value;
    }

    pub fn column(&self, j: usize) -> &[f64] {
        &self.data[j * self.rows..(j + 1) * self.rows]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Checks `|a_ij - a_ji| <= tol` over the whole matrix.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.rows;
        (0..n).all(|j| {
            (j + 1..n).all(|i| {
                abs_diff_eq!(self.data[i + j * n], self.data[j + i * n], epsilon = tol)
            })
        })
    }
}

impl MatrixShape for FloatMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn num_elements(&self) -> usize {
        self.data.len()
    }
}

impl From<DMatrix<f64>> for FloatMatrix {
    fn from(m: DMatrix<f64>) -> Self {
        let (rows, cols) = m.shape();
        FloatMatrix {
            rows,
            cols,
            data: m.as_slice().to_vec(),
        }
    }
}

/// Complex counterpart of [`FloatMatrix`]. Carried only to be rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex<f64>>,
}

impl ComplexMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        ComplexMatrix {
            rows,
            cols,
            data: vec![Complex::new(0.0, 0.0); rows * cols],
        }
    }

    pub fn from_column_major(rows: usize, cols: usize, data: Vec<Complex<f64>>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EigenError::shape(format!(
                "buffer of {} elements cannot back a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(ComplexMatrix { rows, cols, data })
    }
}

impl MatrixShape for ComplexMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn num_elements(&self) -> usize {
        self.data.len()
    }
}

/// A dense matrix of either element kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Matrix {
    Float(FloatMatrix),
    Complex(ComplexMatrix),
}

impl Matrix {
    pub fn as_float(&self) -> Option<&FloatMatrix> {
        match self {
            Matrix::Float(m) => Some(m),
            Matrix::Complex(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Matrix::Float(_) => "float",
            Matrix::Complex(_) => "complex",
        }
    }
}

impl MatrixShape for Matrix {
    fn rows(&self) -> usize {
        match self {
            Matrix::Float(m) => m.rows(),
            Matrix::Complex(m) => m.rows(),
        }
    }

    fn cols(&self) -> usize {
        match self {
            Matrix::Float(m) => m.cols(),
            Matrix::Complex(m) => m.cols(),
        }
    }

    fn num_elements(&self) -> usize {
        match self {
            Matrix::Float(m) => m.num_elements(),
            Matrix::Complex(m) => m.num_elements(),
        }
    }
}

impl From<FloatMatrix> for Matrix {
    fn from(m: FloatMatrix) -> Self {
        Matrix::Float(m)
    }
}

impl From<ComplexMatrix> for Matrix {
    fn from(m: ComplexMatrix) -> Self {
        Matrix::Complex(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn row_major_input_is_stored_column_major() {
        let m = FloatMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.column(1), &[2.0, 5.0]);
    }

    #[test]
    fn ndarray_conversion_preserves_layout() {
        let a = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let m = FloatMatrix::from_array(a.view());
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.as_slice(), &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        assert_eq!(m.to_array(), a);
    }

    #[test]
    fn nalgebra_round_trip_keeps_column_major_order() {
        let m = FloatMatrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let d = m.to_dmatrix();
        assert_eq!(d[(0, 1)], 2.0);
        assert_eq!(d[(1, 0)], 3.0);
        assert_eq!(FloatMatrix::from(d), m);
    }

    #[test]
    fn mismatched_buffer_is_a_shape_error() {
        let err = FloatMatrix::from_column_major(2, 2, vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, EigenError::Shape(_)));
    }

    #[test]
    fn symmetry_check() {
        let mut m = FloatMatrix::identity(3);
        m.set(0, 2, 0.5);
        assert!(!m.is_symmetric(1e-12));
        m.set(2, 0, 0.5);
        assert!(m.is_symmetric(1e-12));
        assert!(!FloatMatrix::zeros(2, 3).is_symmetric(1e-12));
    }

    #[test]
    fn tagged_variant_reports_shape() {
        let m: Matrix = ComplexMatrix::zeros(2, 3).into();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.num_elements(), 6);
        assert!(m.as_float().is_none());
        assert_eq!(m.kind(), "complex");
    }
}
