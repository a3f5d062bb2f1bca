
use approx::assert_abs_diff_eq;
use common_matrices::{assert_ascending, random_symmetric};
use symeig::driver::solve_batch_with;
use symeig::{
    solve_batch, EigenError, EigenOptions, EigenProblem, FloatMatrix, Matrix, NalgebraKernel,
};

#[test]
fn test_batch_results_keep_input_order() {
    let mut problems: Vec<EigenProblem> = (1..=12)
        .map(|n| EigenProblem::new(random_symmetric(n, n as u64), EigenOptions::new()))
        .collect();
    // A non-square problem in the middle must fail on its own.
    problems[5] = EigenProblem::new(FloatMatrix::zeros(2, 3), EigenOptions::new());

    let results = solve_batch(&mut problems);
    assert_eq!(results.len(), 12);
    for (i, (problem, result)) in problems.iter().zip(results.iter()).enumerate() {
        if i == 5 {
            assert!(matches!(result, Err(EigenError::Shape(_))));
            continue;
        }
        assert!(result.is_ok(), "problem {} failed: {:?}", i, result);
        assert_eq!(problem.eigenvalues.as_slice().len(), i + 1);
        assert_ascending(problem.eigenvalues.as_slice());
    }
}

#[test]
fn test_batch_matches_sequential_solves() {
    let matrices: Vec<FloatMatrix> = (0..6).map(|seed| random_symmetric(5, seed)).collect();
    let opts = EigenOptions::new().with_vectors();

    let mut problems: Vec<EigenProblem> = matrices
        .iter()
        .cloned()
        .map(|m| EigenProblem::new(m, opts))
        .collect();
    let results = solve_batch_with(&NalgebraKernel, &mut problems);
    assert!(results.iter().all(|r| r.is_ok()));

    for (m, problem) in matrices.into_iter().zip(problems.iter()) {
        let mut matrix = Matrix::Float(m);
        let mut eigenvalues = FloatMatrix::column_vector(5);
        symeig::solve_symmetric_eigen(&mut matrix, &mut eigenvalues, &opts).unwrap();
        for (x, y) in eigenvalues.as_slice().iter().zip(problem.eigenvalues.as_slice()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }
}
