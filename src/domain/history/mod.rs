//! History - undo/redo for score function, weight, alternative order and
//! objective changes.
//!
//! Callers save a record of the state they are about to change; the
//! engine plays records back onto the chart and tells listeners.

mod errors;
mod memento;
mod undo_redo;

pub use errors::UndoRedoError;
pub use memento::{AlternativesRecord, Memento, ObjectivesRecord, ScoreFunctionRecord, WeightMapRecord};
pub use undo_redo::{ChartUndoRedo, HistoryListener};
