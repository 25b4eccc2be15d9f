//! Preference model errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Kind of entity whose identity invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Objective,
    Alternative,
    User,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Objective => write!(f, "objective"),
            EntityKind::Alternative => write!(f, "alternative"),
            EntityKind::User => write!(f, "user"),
        }
    }
}

/// Errors raised at the preference model boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("Score {score} for element '{element}' is outside [0, 1]")]
    ScoreOutOfRange { element: String, score: f64 },

    #[error("Weight {weight} for objective '{objective}' must be a non-negative number")]
    InvalidWeight { objective: String, weight: f64 },

    #[error("Element '{element}' is not valid for this score function")]
    InvalidElement { element: String },

    #[error("Objective not found: {0}")]
    ObjectiveNotFound(String),

    #[error("Alternative not found: {0}")]
    AlternativeNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Index {index} is out of range for {len} alternatives")]
    AlternativeIndexOutOfRange { index: usize, len: usize },
}

impl ModelError {
    /// Creates a duplicate name error.
    pub fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        ModelError::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

impl From<ModelError> for DomainError {
    fn from(err: ModelError) -> Self {
        let code = match &err {
            ModelError::DuplicateName { .. } => ErrorCode::DuplicateName,
            ModelError::ScoreOutOfRange { .. } => ErrorCode::ScoreOutOfRange,
            ModelError::InvalidWeight { .. } | ModelError::InvalidElement { .. } => {
                ErrorCode::ValidationFailed
            }
            ModelError::ObjectiveNotFound(_) => ErrorCode::ObjectiveNotFound,
            ModelError::AlternativeNotFound(_) => ErrorCode::AlternativeNotFound,
            ModelError::UserNotFound(_) => ErrorCode::UserNotFound,
            ModelError::AlternativeIndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_displays_entity_kind() {
        let err = ModelError::duplicate(EntityKind::Alternative, "Hyatt");
        assert_eq!(err.to_string(), "Duplicate alternative name: Hyatt");
    }

    #[test]
    fn duplicate_name_maps_to_duplicate_code() {
        let err: DomainError = ModelError::duplicate(EntityKind::User, "aaron").into();
        assert_eq!(err.code, ErrorCode::DuplicateName);
    }

    #[test]
    fn user_not_found_maps_to_user_not_found_code() {
        let err: DomainError = ModelError::UserNotFound("ghost".to_string()).into();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        assert!(err.message.contains("ghost"));
    }
}
