//! Unified error types for the fragility toolkit
//!
//! [`FragError`] is the common error for library boundaries. Engine-specific
//! errors (degenerate design life, missing installation year) live next to the
//! engine in `frag-algo` and convert into `FragError` when they cross a crate
//! boundary.
//!
//! # Example
//!
//! ```ignore
//! use frag_core::{FragError, FragResult};
//!
//! fn check_sweep(max_mph: u32) -> FragResult<()> {
//!     if max_mph < 120 {
//!         return Err(FragError::Config(format!("sweep must reach 120 mph, got {max_mph}")));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for fragility operations.
#[derive(Error, Debug)]
pub enum FragError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Asset data that cannot be evaluated (e.g. non-positive design life)
    #[error("Data error: {0}")]
    Data(String),
}

/// Convenience type alias for Results using FragError.
pub type FragResult<T> = Result<T, FragError>;
