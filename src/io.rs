// src/io.rs

//! Loading matrices and saving eigen-decomposition results.
//!
//! Two formats are understood: header-less CSV with one matrix row per line,
//! and 2-D float64 `.npy` arrays. The format is picked from the extension.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, WriterBuilder};
use ndarray::{Array1, Array2};
use ndarray_npy::{write_npy, ReadNpyExt};

use crate::error::{EigenError, Result};
use crate::matrix::{FloatMatrix, MatrixShape};

/// On-disk format for matrices and eigenvalues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Csv,
    Npy,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("npy") => FileFormat::Npy,
            _ => FileFormat::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Npy => "npy",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = EigenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "npy" => Ok(FileFormat::Npy),
            other => Err(EigenError::InvalidOption(format!(
                "unknown file format '{}' (expected csv or npy)",
                other
            ))),
        }
    }
}

/// Loads a matrix, choosing the reader from the file extension.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<FloatMatrix> {
    let path = path.as_ref();
    match FileFormat::from_path(path) {
        FileFormat::Csv => load_matrix_csv(path),
        FileFormat::Npy => load_matrix_npy(path),
    }
}

/// Reads a header-less CSV file where each line is one matrix row.
pub fn load_matrix_csv<P: AsRef<Path>>(path: P) -> Result<FloatMatrix> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .map_err(io::Error::from)?;

    let mut values = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0;

    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(io::Error::from)?;
        match cols {
            None => cols = Some(record.len()),
            Some(expected) if expected != record.len() => {
                return Err(EigenError::shape(format!(
                    "row {} has {} columns, expected {}",
                    line + 1,
                    record.len(),
                    expected
                )));
            }
            Some(_) => {}
        }
        for field in record.iter() {
            let value = field.parse::<f64>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("row {}: cannot parse '{}': {}", line + 1, field, e),
                )
            })?;
            values.push(value);
        }
        rows += 1;
    }

    FloatMatrix::from_row_major(rows, cols.unwrap_or(0), &values)
}

pub fn load_matrix_npy<P: AsRef<Path>>(path: P) -> Result<FloatMatrix> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let array = Array2::<f64>::read_npy(reader).map_err(|e| EigenError::Npy(e.to_string()))?;
    Ok(FloatMatrix::from_array(array.view()))
}

/// Writes a matrix row by row.
pub fn save_matrix<P: AsRef<Path>>(matrix: &FloatMatrix, path: P) -> Result<()> {
    let path = path.as_ref();
    match FileFormat::from_path(path) {
        FileFormat::Csv => {
            let mut wtr = WriterBuilder::new()
                .has_headers(false)
                .from_path(path)
                .map_err(io::Error::from)?;
            for row in matrix.to_array().rows() {
                wtr.serialize(row.to_vec()).map_err(io::Error::from)?;
            }
            wtr.flush()?;
        }
        FileFormat::Npy => {
            write_npy(path, &matrix.to_array()).map_err(|e| EigenError::Npy(e.to_string()))?;
        }
    }
    Ok(())
}

/// Writes eigenvalues as a single CSV row or a 1-D `.npy` array.
pub fn save_eigenvalues<P: AsRef<Path>>(eigenvalues: &[f64], path: P) -> Result<()> {
    let path = path.as_ref();
    match FileFormat::from_path(path) {
        FileFormat::Csv => {
            let mut wtr = WriterBuilder::new()
                .has_headers(false)
                .from_path(path)
                .map_err(io::Error::from)?;
            wtr.serialize(eigenvalues).map_err(io::Error::from)?;
            wtr.flush()?;
        }
        FileFormat::Npy => {
            let array = Array1::from_vec(eigenvalues.to_vec());
            write_npy(path, &array).map_err(|e| EigenError::Npy(e.to_string()))?;
        }
    }
    Ok(())
}

/// Saves `eigenvalues.<ext>` and, when present, `eigenvectors.<ext>` into
/// `dir`, creating it if needed. Returns the written paths.
pub fn save_decomposition<P: AsRef<Path>>(
    dir: P,
    eigenvalues: &[f64],
    eigenvectors: Option<&FloatMatrix>,
    format: FileFormat,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    let values_path = dir.join(format!("eigenvalues.{}", format.extension()));
    save_eigenvalues(eigenvalues, &values_path)?;
    written.push(values_path);

    if let Some(vectors) = eigenvectors {
        if vectors.num_elements() > 0 {
            let vectors_path = dir.join(format!("eigenvectors.{}", format.extension()));
            save_matrix(vectors, &vectors_path)?;
            written.push(vectors_path);
        }
    }
    Ok(written)
}
