use thiserror::Error;

/// Why a stored slot value could not be turned back into a collection.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed slot content: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate record id {0:?}")]
    DuplicateId(String),
    #[error("record {id:?} is invalid: {reason}")]
    Invalid { id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("store is not ready")]
    NotReady,
    #[error("suggestion service error: {0}")]
    Suggestion(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn persistence(slot: &str, err: impl std::fmt::Display) -> Self {
        Self::Persistence(format!("slot {slot}: {err}"))
    }

    /// Bad user input, whichever layer caught it.
    pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_) | Self::Model(_)) }
}
