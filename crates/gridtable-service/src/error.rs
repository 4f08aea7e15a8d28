//! Service-layer errors.

use gridtable_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A field patch named a field the model type does not have.
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("model serialization error: {0}")]
    Serialization(String),
}
