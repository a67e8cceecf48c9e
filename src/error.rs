use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("morph toggle rejected: batch {pending_batch} has not been committed")]
    MorphToggleInProgress { pending_batch: u64 },

    #[error("morph batch {batch} does not match pending batch {pending:?}")]
    StaleMorphBatch { batch: u64, pending: Option<u64> },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
