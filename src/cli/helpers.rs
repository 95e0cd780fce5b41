//! Shared helper functions for CLI output
//!
//! Every number that may be missing (a test that could not run) goes through
//! these so the degraded state prints as "N/A" instead of failing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use miette::{IntoDiagnostic, Result};

/// Placeholder for values that could not be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Format with fixed precision; "N/A" when absent or not finite
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// p-values are shown with five decimals
pub fn format_p_value(p: Option<f64>) -> String {
    format_optional(p, 5)
}

/// Percentage with two decimals and a trailing `%`
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// "yes"/"no" for a significance flag, "N/A" without a test
pub fn format_significance(significant: Option<bool>) -> &'static str {
    match significant {
        Some(true) => "yes",
        Some(false) => "no",
        None => NOT_AVAILABLE,
    }
}

/// Write rendered content to a file
pub fn write_file(content: &str, path: &Path) -> Result<()> {
    let file = File::create(path).into_diagnostic()?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).into_diagnostic()?;
    writer.flush().into_diagnostic()?;
    Ok(())
}
