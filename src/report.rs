use anyhow::Result;

use crate::types::AnalysisResult;

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Renders an analysis for output.
pub trait Reporter {
    fn report(&self, result: &AnalysisResult) -> Result<String>;

    /// Rendered when there is nothing to analyze (no sessions found).
    fn nothing_to_report(&self, reason: &str) -> Result<String>;
}

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
