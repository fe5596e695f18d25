//! Error types for depr-io.

use thiserror::Error;

use depr_core::DeprError;
use depr_model::ModelError;
use depr_privacy::PrivacyError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row deserialized but its contents are not acceptable.
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] DeprError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Privacy(#[from] PrivacyError),
}

/// Alias for `Result<T, TableError>`.
pub type TableResult<T> = Result<T, TableError>;
