use depr_core::DeprError;
use thiserror::Error;

/// Degenerate or malformed model input.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid input: origin {origin:?} has zero total outflow")]
    ZeroOutflow { origin: String },

    #[error("invalid input: flow {origin:?} -> {destination:?} is {flow}, expected a finite value >= 0")]
    InvalidFlow {
        origin:      String,
        destination: String,
        flow:        f64,
    },

    #[error("invalid input: location {0:?} has no outgoing weights")]
    NoWeights(String),

    #[error("invalid input: weight matrix has no rows")]
    EmptyMatrix,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Core(#[from] DeprError),
}

pub type ModelResult<T> = Result<T, ModelError>;
