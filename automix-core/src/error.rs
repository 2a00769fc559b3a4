//! Common error types for AutoMix

use thiserror::Error;

/// Common result type for AutoMix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across AutoMix modules
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid user input or request parameter
    ///
    /// Rejected synchronously, before any search work begins.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal engine error
    #[error("Internal error: {0}")]
    Internal(String),
}
