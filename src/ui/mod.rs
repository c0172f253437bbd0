//! User interface module - printing results and diagnostics.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Deciding what goes to stdout and what to stderr
//!
//! Only the tag (and the `--show` explanation) is written to stdout so the
//! output can be captured by scripts.

use crate::analyzer::Analysis;

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, render_error, render_explanation, render_warning,
};

/// Print the outcome of an analysis.
///
/// Warnings go to stderr. With nothing to release stdout stays empty.
pub fn display_analysis(analysis: &Analysis, show: bool) {
    for warning in &analysis.warnings {
        display_boundary_warning(warning);
    }

    if let Some(next) = &analysis.next {
        println!("{}", next.formatted);
        if show {
            println!();
            print!("{}", render_explanation(next));
        }
    }
}
