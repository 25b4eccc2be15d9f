//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, event plumbing, the state machine
//! trait and the error types used by every other domain module.

mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::ChartId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
