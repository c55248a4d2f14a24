use super::{CollectionFailure, PersistenceError, ReadingError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Reading error: {0}")]
    ReadingError(#[from] ReadingError),

    #[error("Collection error: {0}")]
    CollectionError(#[from] CollectionFailure),

    #[error("Persistence error: {0}")]
    PersistenceError(#[from] PersistenceError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
