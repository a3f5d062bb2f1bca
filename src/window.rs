// src/window.rs

//! Bounds-checked windows over flat backing stores.
//!
//! Both window types validate their addressing on construction, so a
//! window that exists can be handed to a kernel without further checks.

use crate::error::{EigenError, Result};

/// Number of elements a column-major `n × n` view with column stride `ld`
/// touches: `(n - 1) * ld + n`, or `None` on overflow.
pub fn required_len(n: usize, ld: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    (n - 1).checked_mul(ld)?.checked_add(n)
}

/// End (exclusive) of the accessed span for a view starting at `offset`.
pub fn matrix_extent(offset: usize, n: usize, ld: usize) -> Option<usize> {
    offset.checked_add(required_len(n, ld)?)
}

/// A square `n × n` column-major window starting `offset` elements into a
/// buffer, with `ld` elements between the starts of consecutive columns.
#[derive(Debug)]
pub struct ColumnMajorWindow<'a> {
    data: &'a mut [f64],
    n: usize,
    ld: usize,
}

impl<'a> ColumnMajorWindow<'a> {
    pub fn new(buffer: &'a mut [f64], offset: usize, n: usize, ld: usize) -> Result<Self> {
        if ld < n.max(1) {
            return Err(EigenError::layout("leading dimension too small"));
        }
        let end = matrix_extent(offset, n, ld)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| EigenError::range("matrix buffer too small for requested view"))?;
        Ok(ColumnMajorWindow {
            data: &mut buffer[offset..end],
            n,
            ld,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn ld(&self) -> usize {
        self.ld
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.n && j < self.n {
            Some(self.data[i + j * self.ld])
        } else {
            None
        }
    }

    /// The accessed span, from element `(0, 0)` through `(n-1, n-1)`.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut *self.data
    }

    pub fn as_slice(&self) -> &[f64] {
        &*self.data
    }
}

/// A contiguous window of `len` elements starting at `offset`.
#[derive(Debug)]
pub struct VectorWindow<'a> {
    data: &'a mut [f64],
}

impl<'a> VectorWindow<'a> {
    pub fn new(buffer: &'a mut [f64], offset: usize, len: usize) -> Result<Self> {
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| EigenError::range("eigenvalue buffer too small"))?;
        Ok(VectorWindow {
            data: &mut buffer[offset..end],
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut *self.data
    }

    pub fn as_slice(&self) -> &[f64] {
        &*self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_len_counts_last_column_only_up_to_n() {
        assert_eq!(required_len(0, 5), Some(0));
        assert_eq!(required_len(1, 1), Some(1));
        assert_eq!(required_len(3, 3), Some(9));
        assert_eq!(required_len(3, 5), Some(13));
        assert_eq!(required_len(usize::MAX, 2), None);
        assert_eq!(matrix_extent(usize::MAX, 1, 1), None);
    }

    #[test]
    fn padded_window_addresses_with_stride() {
        // 2x2 view with ld = 3, starting at offset 1.
        let mut buffer: Vec<f64> = (0..6).map(|v| v as f64).collect();
        let window = ColumnMajorWindow::new(&mut buffer, 1, 2, 3).unwrap();
        assert_eq!(window.as_slice().len(), 5);
        assert_eq!(window.get(0, 0), Some(1.0));
        assert_eq!(window.get(1, 0), Some(2.0));
        assert_eq!(window.get(0, 1), Some(4.0));
        assert_eq!(window.get(1, 1), Some(5.0));
        assert_eq!(window.get(2, 0), None);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut exact = vec![0.0; 2 + required_len(3, 4).unwrap()];
        assert!(ColumnMajorWindow::new(&mut exact, 2, 3, 4).is_ok());

        let mut short = vec![0.0; 1 + required_len(3, 4).unwrap()];
        let err = ColumnMajorWindow::new(&mut short, 2, 3, 4).unwrap_err();
        assert!(matches!(err, EigenError::Range(_)));
    }

    #[test]
    fn small_stride_is_a_layout_error() {
        let mut buffer = vec![0.0; 16];
        let err = ColumnMajorWindow::new(&mut buffer, 0, 3, 2).unwrap_err();
        assert!(matches!(err, EigenError::Layout(_)));
        let err = ColumnMajorWindow::new(&mut buffer, 0, 0, 0).unwrap_err();
        assert!(matches!(err, EigenError::Layout(_)));
    }

    #[test]
    fn vector_window_bounds() {
        let mut buffer = vec![0.0; 5];
        assert_eq!(VectorWindow::new(&mut buffer, 2, 3).unwrap().len(), 3);
        assert!(VectorWindow::new(&mut buffer, 5, 0).unwrap().is_empty());
        let err = VectorWindow::new(&mut buffer, 3, 3).unwrap_err();
        assert!(matches!(err, EigenError::Range(_)));
        assert!(VectorWindow::new(&mut buffer, usize::MAX, 2).is_err());
    }
}
