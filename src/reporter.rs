//! Progress and warning reporting.
//!
//! Conversions take an explicitly passed reporting capability rather than
//! writing to process-wide state, so library consumers decide where
//! messages go.

/// A sink for conversion progress and warnings
pub trait Reporter {
    /// Report a progress message
    fn info(&self, message: &str);
    /// Report a recoverable problem
    fn warn(&self, message: &str);
}

/// Forwards reports to the `log` facade. This is what the command-line
/// tool injects.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}
