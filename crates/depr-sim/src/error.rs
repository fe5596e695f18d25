use depr_core::DeprError;
use depr_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("trip buffer capacity exceeded: {required} records needed, {capacity} reserved")]
    CapacityExceeded {
        capacity: usize,
        required: usize,
    },

    #[error("home location {0:?} is not in the weight matrix")]
    UnknownHome(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("simulation configuration error: {0}")]
    Config(#[from] DeprError),

    #[cfg(feature = "parallel")]
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
