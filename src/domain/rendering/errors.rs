//! Reconciliation errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while building or refreshing the view model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("Alternative '{alternative}' has no consequence for objective '{objective}'")]
    MissingConsequence {
        alternative: String,
        objective: String,
    },

    #[error("User '{user}' has no weight for objective '{objective}'")]
    MissingWeight { user: String, objective: String },

    #[error("User '{user}' has no score function for objective '{objective}'")]
    MissingScoreFunction { user: String, objective: String },

    #[error("Score of '{value}' is undefined in user '{user}' score function for objective '{objective}'")]
    UndefinedScore {
        user: String,
        objective: String,
        value: String,
    },

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("View no longer matches the chart: {0}")]
    StaleView(String),
}

impl ReconcileError {
    /// Returns true for the missing-lookup family of errors.
    pub fn is_model_incomplete(&self) -> bool {
        matches!(
            self,
            ReconcileError::MissingConsequence { .. }
                | ReconcileError::MissingWeight { .. }
                | ReconcileError::MissingScoreFunction { .. }
                | ReconcileError::UndefinedScore { .. }
        )
    }
}

impl From<ReconcileError> for DomainError {
    fn from(err: ReconcileError) -> Self {
        let code = match &err {
            ReconcileError::UnknownUser(_) => ErrorCode::UserNotFound,
            ReconcileError::StaleView(_) => ErrorCode::InternalError,
            _ => ErrorCode::ModelIncomplete,
        };
        DomainError::new(code, err.to_string())
    }
}
