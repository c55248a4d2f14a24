use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ReadingError {
    #[error("Either deviceId or deviceCode must be provided")]
    MissingDeviceIdentifier,

    #[error("Invalid request parameters: {0}")]
    InvalidRequest(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("No reading found for device: {0}")]
    ReadingNotFound(String),
}

impl ReadingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReadingError::MissingDeviceIdentifier => StatusCode::BAD_REQUEST,
            ReadingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ReadingError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            ReadingError::ReadingNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}
