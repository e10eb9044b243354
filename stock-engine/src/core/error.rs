//! Engine error types

use crate::storage::StorageError;
use shared::error::ErrorCode;
use thiserror::Error;

/// Engine-level errors
///
/// The taxonomy the host application renders from:
/// - `Validation` / `Authorization` are rejected before any write.
/// - `PartialWrite` means a multi-step operation failed after earlier
///   steps committed; `completed` names the steps that did.
/// - `Storage` propagates collaborator failures (including
///   `StorageError::Unavailable` for an unreachable remote).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not allowed: {0}")]
    Authorization(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("partial write during {operation}: completed steps {completed:?}")]
    PartialWrite {
        operation: &'static str,
        completed: Vec<&'static str>,
        #[source]
        source: StorageError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Build a partial-write failure and log the inconsistent state so the
    /// completed steps can be reconciled later
    pub fn partial_write(
        operation: &'static str,
        completed: Vec<&'static str>,
        source: StorageError,
    ) -> Self {
        tracing::error!(
            operation,
            completed = ?completed,
            error = %source,
            "inconsistent state: multi-step write failed after earlier steps committed"
        );
        Self::PartialWrite {
            operation,
            completed,
            source,
        }
    }

    /// Stable error code for host-side message mapping
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Authorization(_) => ErrorCode::Authorization,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::PartialWrite { .. } => ErrorCode::PartialWrite,
            Self::Storage(e) => match e {
                StorageError::NotFound(_) => ErrorCode::NotFound,
                StorageError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                StorageError::Unavailable(_) => ErrorCode::RemoteUnavailable,
                _ => ErrorCode::Internal,
            },
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
