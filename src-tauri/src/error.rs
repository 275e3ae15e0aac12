use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediPredictError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A prediction is already being analyzed")]
    Busy,

    #[error("Prediction result is stale (generation {0})")]
    Stale(u64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Rules error: {0}")]
    Rules(String),
}

impl MediPredictError {
    /// True for failures the user caused and can fix by changing input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Busy)
    }
}

impl From<MediPredictError> for String {
    fn from(err: MediPredictError) -> Self {
        err.to_string()
    }
}

pub type Result<T, E = MediPredictError> = std::result::Result<T, E>;
