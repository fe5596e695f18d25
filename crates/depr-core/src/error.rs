//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `DeprError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The base error type for `depr-core` and a common variant for sub-crates.
#[derive(Debug, Error)]
pub enum DeprError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// More than `u32::MAX + 1` ids of one kind were requested.
    #[error("{kind} id space exhausted at index {index}")]
    IdOverflow { kind: &'static str, index: usize },
}

/// Shorthand result type for `depr-core`.
pub type DeprResult<T> = Result<T, DeprError>;
