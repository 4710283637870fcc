use notify_store::StoreError;
use notify_types::{EventDecodeError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a notification session is already active")]
    SessionActive,
    #[error("invalid notification id: {0}")]
    InvalidId(#[from] notify_ids::IdError),
    #[error("{0}")]
    Decode(#[from] EventDecodeError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<TextError> for NotifyError {
    fn from(e: TextError) -> Self {
        NotifyError::InvalidInput(e.to_string())
    }
}

pub type NotifyResult<T> = std::result::Result<T, NotifyError>;
