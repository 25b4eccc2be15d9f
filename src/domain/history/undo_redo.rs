//! Undo/redo engine - four kinds of change on two shared stacks.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::model::{
    Alternative, ChangeKind, Chart, HistoryDirection, Objective, ScoreFunction, WeightMap,
};

use super::{
    AlternativesRecord, Memento, ObjectivesRecord, ScoreFunctionRecord, UndoRedoError,
    WeightMapRecord,
};

/// Receives every record applied by undo or redo.
pub trait HistoryListener: Send + Sync {
    /// Called after `record` has been written back into the chart.
    fn record_applied(&self, direction: HistoryDirection, record: &Memento);
}

/// Undo/redo history for one chart.
///
/// # Invariants
///
/// - every save of a record different from the newest one clears redo
/// - undo/redo capture the live state before applying a record, so
///   `undo` then `redo` restores the state before the `undo`
/// - a failed undo/redo leaves both stacks untouched
#[derive(Default)]
pub struct ChartUndoRedo {
    undo_stack: Vec<Memento>,
    redo_stack: Vec<Memento>,
    listeners: Vec<Arc<dyn HistoryListener>>,
}

impl fmt::Debug for ChartUndoRedo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartUndoRedo")
            .field("undo_stack", &self.undo_stack)
            .field("redo_stack", &self.redo_stack)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ChartUndoRedo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Listeners are called in registration order.
    pub fn subscribe(&mut self, listener: Arc<dyn HistoryListener>) {
        self.listeners.push(listener);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a user's score function for an objective before it changes.
    pub fn save_score_function_record(
        &mut self,
        username: &str,
        objective: &str,
        score_function: &ScoreFunction,
    ) -> bool {
        self.save(ScoreFunctionRecord::new(username, objective, Some(score_function.clone())).into())
    }

    /// Records a user's weight map before it changes.
    pub fn save_weight_map_record(&mut self, username: &str, weight_map: &WeightMap) -> bool {
        self.save(WeightMapRecord::new(username, weight_map.clone()).into())
    }

    /// Records the alternative order before it changes.
    pub fn save_alternatives_record(&mut self, alternatives: &[Alternative]) -> bool {
        self.save(AlternativesRecord::new(alternatives.to_vec()).into())
    }

    /// Records the objective tree before it changes.
    pub fn save_objectives_record(&mut self, root_objectives: &[Objective]) -> bool {
        self.save(ObjectivesRecord::new(root_objectives.to_vec()).into())
    }

    /// Pushes a record unless it equals the newest one.
    ///
    /// Returns true if the record was pushed (and redo cleared).
    pub fn save(&mut self, record: Memento) -> bool {
        if self.undo_stack.last() == Some(&record) {
            debug!(kind = %record.kind(), "Skipped saving unchanged history record");
            return false;
        }
        self.clear_redo();
        debug!(kind = %record.kind(), depth = self.undo_stack.len() + 1, "Saved history record");
        self.undo_stack.push(record);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Playback
    // ─────────────────────────────────────────────────────────────────────────

    /// Reverts the newest change.
    ///
    /// Returns `Ok(None)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the record names a user no longer in the chart
    pub fn undo(&mut self, chart: &mut Chart) -> Result<Option<ChangeKind>, UndoRedoError> {
        let applied = Self::transfer(&mut self.undo_stack, &mut self.redo_stack, chart)?;
        Ok(applied.map(|record| self.announce(HistoryDirection::Undo, &record)))
    }

    /// Re-applies the newest undone change.
    ///
    /// Returns `Ok(None)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the record names a user no longer in the chart
    pub fn redo(&mut self, chart: &mut Chart) -> Result<Option<ChangeKind>, UndoRedoError> {
        let applied = Self::transfer(&mut self.redo_stack, &mut self.undo_stack, chart)?;
        Ok(applied.map(|record| self.announce(HistoryDirection::Redo, &record)))
    }

    /// Pops from `from`, captures the live state onto `to`, then applies.
    fn transfer(
        from: &mut Vec<Memento>,
        to: &mut Vec<Memento>,
        chart: &mut Chart,
    ) -> Result<Option<Memento>, UndoRedoError> {
        let Some(record) = from.pop() else {
            return Ok(None);
        };
        let current = match record.capture_current(chart) {
            Ok(current) => current,
            Err(err) => {
                from.push(record);
                return Err(err);
            }
        };
        if let Err(err) = record.apply(chart) {
            from.push(record);
            return Err(err);
        }
        to.push(current);
        Ok(Some(record))
    }

    fn announce(&self, direction: HistoryDirection, record: &Memento) -> ChangeKind {
        info!(?direction, kind = %record.kind(), "Applied history record");
        for listener in &self.listeners {
            listener.record_applied(direction, record);
        }
        record.kind()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection and housekeeping
    // ─────────────────────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The record the next `undo` would apply.
    pub fn newest_record(&self) -> Option<&Memento> {
        self.undo_stack.last()
    }

    /// Drops the newest undo record without applying it.
    pub fn delete_newest_record(&mut self) -> Option<Memento> {
        self.undo_stack.pop()
    }

    pub fn clear_undo(&mut self) {
        self.undo_stack.clear();
    }

    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Empties both stacks. Listeners stay registered.
    pub fn reset(&mut self) {
        self.clear_undo();
        self.clear_redo();
    }
}
