//! Error types for port operations.

use polvo_shared::ErrorCode;

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Conditional create (or rename) found an existing entity.
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store aborted the transaction (deadlock or other transient failure).
    #[error("{operation} aborted by the store: {message}")]
    Aborted {
        operation: &'static str,
        message: String,
    },

    /// A store-side uniqueness constraint rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The caller cancelled before the operation committed.
    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },

    /// The request deadline passed before the operation committed.
    #[error("{operation} exceeded its deadline")]
    DeadlineExceeded { operation: &'static str },

    /// The backend has no way to perform this operation.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create an AlreadyExists error with entity type and ID context.
    pub fn already_exists(entity_type: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn unsupported(operation: &'static str, backend: &'static str) -> Self {
        Self::Unsupported { operation, backend }
    }

    /// Attribute a constraint violation to the entity whose write caused it.
    pub fn on_conflict(self, entity_type: &'static str, id: impl ToString) -> Self {
        match self {
            Self::ConstraintViolation(_) => Self::already_exists(entity_type, id),
            other => other,
        }
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an AlreadyExists error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Classification for callers outside the engine.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::AlreadyExists { .. } | Self::ConstraintViolation(_) => ErrorCode::AlreadyExists,
            Self::Aborted { .. } => ErrorCode::Aborted,
            Self::Database { .. } | Self::Serialization(_) => ErrorCode::Internal,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::DeadlineExceeded { .. } => ErrorCode::DeadlineExceeded,
            Self::Unsupported { .. } => ErrorCode::Unimplemented,
        }
    }
}
