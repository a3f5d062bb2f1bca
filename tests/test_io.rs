use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2};
use ndarray_npy::{read_npy, write_npy};
use std::fs;
use symeig::io::{
    load_matrix, load_matrix_csv, save_decomposition, save_eigenvalues, save_matrix, FileFormat,
};
use symeig::{eigh, EigenError, FloatMatrix, MatrixShape, Triangle};
use tempfile::tempdir;

#[test]
fn test_load_csv_matrix() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("matrix.csv");
    fs::write(&path, "2.0, -1.0, 0.0\n-1.0, 2.0, -1.0\n0.0, -1.0, 2.0\n").unwrap();

    let m = load_matrix(&path).expect("Failed to load CSV matrix");
    assert_eq!((m.rows(), m.cols()), (3, 3));
    assert_eq!(m.get(0, 1), Some(-1.0));
    assert_eq!(m.get(2, 2), Some(2.0));
    assert!(m.is_symmetric(0.0));
}

#[test]
fn test_ragged_csv_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "1.0,2.0\n3.0\n").unwrap();
    assert!(load_matrix_csv(&path).is_err());
}

#[test]
fn test_unparseable_csv_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "1.0,abc\n").unwrap();
    assert!(matches!(load_matrix_csv(&path), Err(EigenError::Io(_))));
}

#[test]
fn test_npy_matrix_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("matrix.npy");
    let array: Array2<f64> = array![[1.0, 2.0], [2.0, 5.0]];
    write_npy(&path, &array).unwrap();

    let m = load_matrix(&path).expect("Failed to load npy matrix");
    assert_eq!(m.to_array(), array);

    let out = dir.path().join("copy.npy");
    save_matrix(&m, &out).unwrap();
    let reloaded: Array2<f64> = read_npy(&out).unwrap();
    assert_eq!(reloaded, array);
}

#[test]
fn test_save_eigenvalues_csv_is_single_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("eigenvalues.csv");
    save_eigenvalues(&[1.0, 2.5, 4.0], &path).unwrap();

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .expect("Failed to create CSV reader");
    let rows: Vec<Vec<f64>> = rdr.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows, vec![vec![1.0, 2.5, 4.0]]);
}

#[test]
fn test_save_decomposition_writes_both_files() {
    let a = FloatMatrix::from_row_major(2, 2, &[2.0, 1.0, 1.0, 2.0]).unwrap();
    let decomposition = eigh(&a, Triangle::Lower).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("result");
    let written = save_decomposition(
        &out,
        &decomposition.eigenvalues,
        Some(&decomposition.eigenvectors),
        FileFormat::Npy,
    )
    .unwrap();
    assert_eq!(written.len(), 2);
    assert!(out.join("eigenvalues.npy").exists());
    assert!(out.join("eigenvectors.npy").exists());

    let values: Array1<f64> = read_npy(out.join("eigenvalues.npy")).unwrap();
    assert_abs_diff_eq!(values[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(values[1], 3.0, epsilon = 1e-12);

    let vectors: Array2<f64> = read_npy(out.join("eigenvectors.npy")).unwrap();
    assert_eq!(vectors, decomposition.eigenvectors.to_array());
}

#[test]
fn test_values_only_decomposition_skips_vectors_file() {
    let dir = tempdir().unwrap();
    let written = save_decomposition(dir.path(), &[1.0], None, FileFormat::Csv).unwrap();
    assert_eq!(written, vec![dir.path().join("eigenvalues.csv")]);
}

#[test]
fn test_file_format_parsing() {
    assert_eq!("NPY".parse::<FileFormat>().unwrap(), FileFormat::Npy);
    assert_eq!(FileFormat::from_path(std::path::Path::new("a/b.Npy")), FileFormat::Npy);
    assert_eq!(FileFormat::from_path(std::path::Path::new("a/b.txt")), FileFormat::Csv);
    assert!("json".parse::<FileFormat>().is_err());
}
