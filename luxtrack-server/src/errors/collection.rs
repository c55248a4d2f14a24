use std::time::Duration;

use axum::http::StatusCode;

use super::PersistenceError;

/// Failure to obtain a reading from the device source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("device did not answer within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("device api answered with status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else if error.is_decode() {
            FetchError::MalformedPayload(error.to_string())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionCause {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A device whose reading could not be collected. Nothing was written.
#[derive(Debug, thiserror::Error)]
#[error("Collection failed for device {device_code}: {cause}")]
pub struct CollectionFailure {
    pub device_code: String,
    #[source]
    pub cause: CollectionCause,
}

impl CollectionFailure {
    pub fn new(device_code: impl Into<String>, cause: impl Into<CollectionCause>) -> Self {
        Self {
            device_code: device_code.into(),
            cause: cause.into(),
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self.cause, CollectionCause::Fetch(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self.cause {
            CollectionCause::Fetch(FetchError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            CollectionCause::Fetch(_) => StatusCode::BAD_GATEWAY,
            CollectionCause::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
