use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner-style progress bar with a uniform appearance.
pub fn spinner_progress(label: impl Into<String>, message: impl Into<String>) -> ProgressBar {
    let label = label.into();
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold.dim} {spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(label);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(75));
    pb
}

/// Spinner shown while the kernel runs. Hidden when `quiet` is set so that
/// piped output stays clean.
pub fn solve_spinner(n: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    spinner_progress("syevd", format!("decomposing {n}x{n} matrix"))
}
