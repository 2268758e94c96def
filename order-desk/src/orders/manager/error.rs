use super::super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::order::OrderError;
use thiserror::Error;

/// Table view errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl ManagerError {
    /// Bad operator input; nothing changed and the operator may retry
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Order(e) if e.is_validation())
    }
}

/// Map a storage failure to an error code (the UI localizes)
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    match e {
        StorageError::Parse { .. } => ErrorCode::StorageCorrupted,
        StorageError::Io { .. } => ErrorCode::StorageIo,
        StorageError::Serialization(_) => ErrorCode::InternalError,
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                AppError::with_message(code, e.to_string())
            }
            ManagerError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order not found: {id}"))
                    .with_detail("order_id", id)
            }
            ManagerError::Order(e) => e.into(),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
