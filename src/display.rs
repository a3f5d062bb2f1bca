// src/display.rs

//! Terminal output for eigenvalues and resolved calls.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::driver::ResolvedCall;

/// Maps `value` onto a blue→red ramp over `[min, max]`. Zero stays black.
fn heat_color(value: f64, min: f64, max: f64) -> Color {
    if value == 0.0 {
        return Color::Black;
    }
    let intensity = if (max - min) != 0.0 {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Color::Rgb(
        (intensity * 255.0) as u8,
        0,
        ((1.0 - intensity) * 255.0) as u8,
    )
}

/// Writes one coloured cell per eigenvalue, preceded by the range.
pub fn write_eigenvalue_heatmap<W: WriteColor>(out: &mut W, eigenvalues: &[f64]) -> io::Result<()> {
    let max_value = eigenvalues.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_value = eigenvalues.iter().cloned().fold(f64::INFINITY, f64::min);

    if eigenvalues.is_empty() {
        writeln!(out, "Eigenvalue spectrum: (empty)")?;
        return Ok(());
    }
    writeln!(
        out,
        "Eigenvalue spectrum [min: {:.4e}, max: {:.4e}]:",
        min_value, max_value
    )?;

    for &value in eigenvalues {
        let mut color_spec = ColorSpec::new();
        color_spec.set_fg(Some(heat_color(value, min_value, max_value)));
        out.set_color(&color_spec)?;
        write!(out, "██")?;
    }
    out.reset()?;
    writeln!(out)?;
    Ok(())
}

/// Writes eigenvalues as an indexed table, `limit` rows at most.
pub fn write_eigenvalue_table<W: WriteColor>(
    out: &mut W,
    eigenvalues: &[f64],
    limit: usize,
) -> io::Result<()> {
    let mut header = ColorSpec::new();
    header.set_bold(true);
    out.set_color(&header)?;
    writeln!(out, "{:>6}  {:>22}", "index", "eigenvalue")?;
    out.reset()?;

    for (i, value) in eigenvalues.iter().take(limit).enumerate() {
        writeln!(out, "{:>6}  {:>22.12e}", i, value)?;
    }
    if eigenvalues.len() > limit {
        writeln!(out, "{:>6}  ({} more)", "...", eigenvalues.len() - limit)?;
    }
    Ok(())
}

fn write_window<W: Write>(out: &mut W, label: &str, start: usize, end: Option<usize>) -> io::Result<()> {
    match end {
        Some(end) => writeln!(out, "{} = [{}, {})", label, start, end),
        None => writeln!(out, "{} = [{}, overflow)", label, start),
    }
}

/// Writes the resolved kernel arguments, one per line.
pub fn write_resolved_call<W: Write>(out: &mut W, call: &ResolvedCall) -> io::Result<()> {
    writeln!(out, "jobz      = '{}' ({})", call.job.code() as char, call.job)?;
    writeln!(out, "uplo      = '{}' ({})", call.triangle.code() as char, call.triangle)?;
    writeln!(out, "n         = {}", call.n)?;
    writeln!(out, "lda       = {}", call.ld)?;
    writeln!(out, "offset_a  = {}", call.offset_a)?;
    writeln!(out, "offset_w  = {}", call.offset_w)?;
    write_window(out, "a window ", call.offset_a, call.matrix_end())?;
    write_window(out, "w window ", call.offset_w, call.eigenvalue_end())?;
    Ok(())
}
