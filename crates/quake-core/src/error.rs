//! Unified error types for the quake workspace
//!
//! [`QuakeError`] covers the failures that abort a dataset build before any
//! aggregation starts: unparseable values and invalid configuration. The I/O
//! crates use `anyhow` with context and wrap these errors as they pass through.
//!
//! # Example
//!
//! ```ignore
//! use quake_core::{QuakeError, QuakeResult};
//!
//! fn check_step(step_days: u32) -> QuakeResult<()> {
//!     if step_days == 0 {
//!         return Err(QuakeError::Validation("window_days_step must be positive".into()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for configuration and data problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuakeError {
    /// Parsing errors (dates, numbers)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (unknown preset, missing fields)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using QuakeError.
pub type QuakeResult<T> = Result<T, QuakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuakeError::Config("unknown preset 'foo'".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("unknown preset"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = QuakeError::Parse("start_date '2024-13-45' is not a YYYY-MM-DD date".into());
        assert!(err.to_string().starts_with("Parse error: start_date"));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> QuakeResult<()> {
            Err(QuakeError::Validation("test".into()))
        }

        fn outer() -> QuakeResult<()> {
            inner()?;
            Ok(())
        }

        assert_eq!(outer(), Err(QuakeError::Validation("test".into())));
    }
}
