//! Undo/redo errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::model::ModelError;

/// Errors raised while saving or playing back history records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UndoRedoError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<UndoRedoError> for DomainError {
    fn from(err: UndoRedoError) -> Self {
        match err {
            UndoRedoError::UserNotFound(name) => {
                DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", name))
                    .with_detail("username", name)
            }
            UndoRedoError::Model(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_not_found_keeps_username_detail() {
        let err: DomainError = UndoRedoError::UserNotFound("beth".into()).into();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        assert_eq!(err.details.get("username"), Some(&"beth".to_string()));
    }
}
