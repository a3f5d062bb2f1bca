use clap::{Args, Parser, Subcommand};
use log::{error, info, LevelFilter};
use std::io::IsTerminal;
use std::path::PathBuf;
use symeig::{
    display, io as matrix_io, logging, progress, validate, validate_matrix, CallPlan, EigenError,
    EigenOptions, FloatMatrix, JobMode, Matrix, MatrixShape, MatrixView, NalgebraKernel,
    ResolvedCall, Triangle,
};
use symeig::io::FileFormat;

/// symeig: validated symmetric eigen-decomposition of dense matrices
#[derive(Parser, Debug)]
#[command(
    name = "symeig",
    about = "Validate and run divide-and-conquer symmetric eigen-decompositions on dense matrix files",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Print debug-level diagnostics
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decompose a symmetric matrix read from CSV or .npy
    Solve(SolveArgs),
    /// Resolve and validate a call without running the kernel
    Check(CallArgs),
}

#[derive(Args, Debug, Clone)]
struct CallArgs {
    /// Matrix file (CSV rows or 2-D float64 .npy)
    #[arg(short, long, value_name = "MATRIX")]
    input: PathBuf,
    /// values (N) or vectors (V)
    #[arg(long, value_name = "JOB", default_value = "values")]
    job: JobMode,
    /// Stored triangle: lower (L) or upper (U)
    #[arg(long, value_name = "UPLO", default_value = "lower")]
    triangle: Triangle,
    /// Order of the problem [default: rows of the matrix]
    #[arg(short, long, value_name = "N")]
    n: Option<usize>,
    /// Leading dimension [default: max(1, rows)]
    #[arg(long, value_name = "LDA")]
    lda: Option<usize>,
    /// Element offset into the matrix buffer
    #[arg(long, value_name = "K", default_value_t = 0, allow_negative_numbers = true)]
    offset_a: isize,
    /// Element offset into the eigenvalue buffer
    #[arg(long, value_name = "K", default_value_t = 0, allow_negative_numbers = true)]
    offset_w: isize,
}

impl CallArgs {
    fn options(&self) -> EigenOptions {
        EigenOptions {
            job: self.job,
            triangle: self.triangle,
            n: self.n,
            leading_dimension: self.lda,
            offset_a: self.offset_a,
            offset_w: self.offset_w,
        }
    }
}

#[derive(Args, Debug)]
struct SolveArgs {
    #[command(flatten)]
    call: CallArgs,
    /// Directory for eigenvalues/eigenvectors output
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Output format: csv or npy
    #[arg(long, value_name = "FORMAT", default_value = "csv")]
    format: FileFormat,
    /// Show a colour strip of the spectrum
    #[arg(long, default_value_t = false)]
    heatmap: bool,
    /// Maximum number of eigenvalues printed
    #[arg(long, value_name = "ROWS", default_value_t = 20)]
    limit: usize,
}

/// Eigenvalue buffer large enough for the requested window. Sized only after
/// the matrix-side checks have fixed `n`.
fn eigenvalue_buffer(view: Option<MatrixView>, options: &EigenOptions) -> Result<FloatMatrix, EigenError> {
    let too_small = || EigenError::Range("eigenvalue buffer too small".to_string());
    let n = view.map_or(0, |view| view.n);
    // Negative offsets are reported by `validate`.
    let offset = usize::try_from(options.offset_w).unwrap_or(0);
    let len = offset.checked_add(n).ok_or_else(too_small)?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| too_small())?;
    data.resize(len, 0.0);
    FloatMatrix::from_column_major(len, 1, data)
}

/// Copies the eigenvector block out of the (possibly padded) matrix buffer.
fn extract_eigenvectors(matrix: &FloatMatrix, call: &ResolvedCall) -> FloatMatrix {
    let data = matrix.as_slice();
    let mut vectors = FloatMatrix::zeros(call.n, call.n);
    for j in 0..call.n {
        for i in 0..call.n {
            vectors.set(i, j, data[call.offset_a + i + j * call.ld]);
        }
    }
    vectors
}

fn resolve(args: &CallArgs) -> Result<(Matrix, FloatMatrix, EigenOptions, CallPlan), EigenError> {
    let matrix = matrix_io::load_matrix(&args.input)?;
    info!(
        "Loaded {}x{} matrix from {}",
        matrix.rows(),
        matrix.cols(),
        args.input.display()
    );
    let options = args.options();
    let matrix = Matrix::Float(matrix);
    let view = validate_matrix(&matrix, &options)?;
    let eigenvalues = eigenvalue_buffer(view, &options)?;
    let plan = validate(&matrix, &eigenvalues, &options)?;
    Ok((matrix, eigenvalues, options, plan))
}

fn run_check(args: CallArgs) -> Result<(), EigenError> {
    let (_, _, _, plan) = resolve(&args)?;
    match plan {
        CallPlan::Empty => println!("n = 0: empty problem, the kernel would not be called"),
        CallPlan::Dispatch(call) => display::write_resolved_call(&mut std::io::stdout(), &call)?,
    }
    Ok(())
}

fn run_solve(args: SolveArgs, quiet: bool) -> Result<(), EigenError> {
    let (mut matrix, mut eigenvalues, options, plan) = resolve(&args.call)?;
    let call = match plan {
        CallPlan::Empty => {
            info!("Empty problem (n = 0); nothing to solve");
            return Ok(());
        }
        CallPlan::Dispatch(call) => call,
    };

    let pb = progress::solve_spinner(call.n, quiet);
    let result =
        symeig::solve_symmetric_eigen_with(&NalgebraKernel, &mut matrix, &mut eigenvalues, &options);
    pb.finish_and_clear();
    result?;

    let values = &eigenvalues.as_slice()[call.offset_w..call.offset_w + call.n];
    info!("Computed {} eigenvalues", values.len());

    let stdout = termcolor::StandardStream::stdout(termcolor::ColorChoice::Auto);
    let mut stdout = stdout.lock();
    display::write_eigenvalue_table(&mut stdout, values, args.limit)?;
    if args.heatmap {
        display::write_eigenvalue_heatmap(&mut stdout, values)?;
    }

    if let Some(dir) = args.output {
        let vectors = match (&matrix, call.job) {
            (Matrix::Float(a), JobMode::EigenvaluesAndVectors) => {
                Some(extract_eigenvectors(a, &call))
            }
            _ => None,
        };
        let written = matrix_io::save_decomposition(&dir, values, vectors.as_ref(), args.format)?;
        for path in written {
            info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(err) = logging::init(level) {
        eprintln!("[WARN] logger already initialised: {}", err);
    }

    let result = match cli.command {
        Command::Solve(args) => run_solve(args, !std::io::stderr().is_terminal()),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn call_args(input: PathBuf) -> CallArgs {
        CallArgs {
            input,
            job: JobMode::EigenvaluesOnly,
            triangle: Triangle::Lower,
            n: None,
            lda: None,
            offset_a: 0,
            offset_w: 0,
        }
    }

    #[test]
    fn eigenvalue_buffer_overflow_is_a_range_error() {
        let view = Some(MatrixView { n: usize::MAX, ld: usize::MAX, offset_a: 0 });
        let opts = EigenOptions::new().with_offset_w(1);
        assert!(matches!(eigenvalue_buffer(view, &opts), Err(EigenError::Range(_))));

        let view = Some(MatrixView { n: 2, ld: 2, offset_a: 0 });
        let opts = EigenOptions::new().with_offset_w(isize::MAX);
        assert!(matches!(eigenvalue_buffer(view, &opts), Err(EigenError::Range(_))));

        let buffer = eigenvalue_buffer(view, &EigenOptions::new().with_offset_w(3)).unwrap();
        assert_eq!(buffer.num_elements(), 5);
    }

    #[test]
    fn oversized_flags_fail_with_typed_errors() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("m.csv");
        fs::write(&input, "2,1\n1,2\n").unwrap();

        let mut args = call_args(input.clone());
        args.n = Some(usize::MAX);
        assert!(matches!(resolve(&args), Err(EigenError::Layout(_))));

        let mut args = call_args(input.clone());
        args.n = Some(2);
        args.offset_w = isize::MAX;
        assert!(matches!(resolve(&args), Err(EigenError::Range(_))));

        let mut args = call_args(input);
        args.lda = Some(0);
        let (_, _, _, plan) = resolve(&args).unwrap();
        match plan {
            CallPlan::Dispatch(call) => assert_eq!((call.n, call.ld), (2, 2)),
            CallPlan::Empty => panic!("expected a dispatch"),
        }
    }
}
