use depr_core::{DeprError, LocationId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrivacyError {
    #[error("unknown privacy mechanism {0:?}")]
    UnknownMechanism(String),

    #[error("OD pair {origin} -> {destination} is not in the OD domain")]
    DomainMismatch {
        origin:      LocationId,
        destination: LocationId,
    },

    #[error("mechanism {mechanism} requires parameter {parameter}")]
    MissingParameter {
        mechanism: &'static str,
        parameter: &'static str,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Core(#[from] DeprError),
}

pub type PrivacyResult<T> = Result<T, PrivacyError>;
