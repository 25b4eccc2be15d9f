//! Reorder interaction errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::model::ModelError;
use crate::domain::rendering::ReconcileError;

/// Errors raised by the alternative ordering interaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReorderError {
    /// No jump-point interval contains the coordinate. The jump points were built wrong.
    #[error("No jump-point interval contains coordinate {center}")]
    IndexOutOfRange { center: f64 },

    #[error("Track layout has {extents} extents for {alternatives} alternatives")]
    LayoutMismatch { extents: usize, alternatives: usize },

    #[error("Objective not found: {0}")]
    ObjectiveNotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl From<ReorderError> for DomainError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::Model(inner) => inner.into(),
            ReorderError::Reconcile(inner) => inner.into(),
            ReorderError::IndexOutOfRange { .. } => {
                DomainError::new(ErrorCode::IndexOutOfRange, err.to_string())
            }
            ReorderError::LayoutMismatch { .. } => {
                DomainError::new(ErrorCode::ValidationFailed, err.to_string())
            }
            ReorderError::ObjectiveNotFound(_) => {
                DomainError::new(ErrorCode::ObjectiveNotFound, err.to_string())
            }
            ReorderError::InvalidTransition(_) => {
                DomainError::new(ErrorCode::InvalidStateTransition, err.to_string())
            }
        }
    }
}
