//! Shared primitives for all Rust crates in Dealdesk.

#![forbid(unsafe_code)]

/// Identity primitives shared across services.
pub mod identity;

use thiserror::Error;

pub use identity::Identity;

/// Result type used across Dealdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
///
/// `Clone` is derived because resolution failures are published through a
/// shared watch channel and read by multiple consumers.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness-constrained lookup matched more than one record.
    #[error("ambiguous lookup: {0}")]
    Ambiguous(String),

    /// A directory call could not complete or returned a malformed record.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
