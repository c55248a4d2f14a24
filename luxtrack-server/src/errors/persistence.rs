#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Write task did not complete: {0}")]
    WriteInterrupted(#[from] tokio::task::JoinError),
}
