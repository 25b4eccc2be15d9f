//! Alternative ordering interaction - manual drag plus automatic sorts.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::history::ChartUndoRedo;
use crate::domain::model::{Alternative, Chart, ModelError};
use crate::domain::rendering::{ReconcileError, ReconciledView};

use super::ordering::{alphabetical, by_objective_scores, restore_order};
use super::{DragPhase, DragSession, DragUpdate, ReorderError, TrackLayout};

/// Which ordering gestures the chart currently accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Alternatives keep their order.
    #[default]
    None,
    /// Clicking an objective label sorts by that objective's scores.
    Objective,
    /// Alternatives are dragged into place.
    Manual,
}

/// A committed drag: the alternative at `from` now sits at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reordered {
    pub from: usize,
    pub to: usize,
}

/// Reorders a chart's alternatives.
///
/// Every ordering saves the previous order to the history before it
/// changes anything. The drag gesture runs `Idle → Dragging → Idle`.
#[derive(Debug, Clone)]
pub struct SortAlternativesInteraction {
    phase: DragPhase,
    drag: Option<DragSession>,
    original_order: Vec<String>,
}

impl SortAlternativesInteraction {
    /// Creates the interaction, remembering the chart's current order for resets.
    pub fn new(chart: &Chart) -> Self {
        Self {
            phase: DragPhase::Idle,
            drag: None,
            original_order: names(chart.alternatives()),
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn active_drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Order the alternatives had when the interaction was created.
    pub fn original_order(&self) -> &[String] {
        &self.original_order
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Manual drag
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts dragging the alternative at `index`.
    ///
    /// Saves the current order to the history first.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if a drag is already running
    /// - `LayoutMismatch` if the layout does not have one extent per alternative
    /// - `Model` if `index` is past the last alternative
    pub fn start_drag(
        &mut self,
        chart: &Chart,
        history: &mut ChartUndoRedo,
        index: usize,
        layout: &TrackLayout,
    ) -> Result<(), ReorderError> {
        let next = self.phase.transition_to(DragPhase::Dragging)?;
        let alternatives = chart.alternatives();
        if layout.extents.len() != alternatives.len() {
            return Err(ReorderError::LayoutMismatch {
                extents: layout.extents.len(),
                alternatives: alternatives.len(),
            });
        }
        let alternative = alternatives
            .get(index)
            .ok_or(ModelError::AlternativeIndexOutOfRange {
                index,
                len: alternatives.len(),
            })?;
        let session = DragSession::begin(alternative.name(), index, layout)?;

        history.save_alternatives_record(alternatives);
        debug!(
            alternative = alternative.name(),
            index,
            jump_points = ?session.jump_points().as_slice(),
            "Started alternative drag"
        );
        self.drag = Some(session);
        self.phase = next;
        Ok(())
    }

    /// Moves the dragged alternative along the track.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if no drag is running
    /// - `IndexOutOfRange` if the jump points do not cover the new position
    pub fn drag(&mut self, delta: f64) -> Result<DragUpdate, ReorderError> {
        let session = self.drag.as_mut().ok_or_else(not_dragging)?;
        session.move_by(delta)
    }

    /// Finishes the drag, moving the alternative if its slot changed.
    ///
    /// The alternative is spliced from its old slot to the new one in the
    /// chart. Callers holding a view move its cells with
    /// [`ReconciledView::move_alternative`]. Returns `None` when nothing
    /// moved; the order saved at drag start stays in the history either way.
    ///
    /// The interaction is back in `Idle` once this returns, even on error.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if no drag is running
    /// - `Model` if the chart lost alternatives since the drag began
    pub fn end_drag(&mut self, chart: &mut Chart) -> Result<Option<Reordered>, ReorderError> {
        let next = self.phase.transition_to(DragPhase::Idle)?;
        let session = self.drag.take().ok_or_else(not_dragging)?;
        self.phase = next;

        let (from, to) = (session.original_index(), session.new_index());
        if from == to {
            debug!(alternative = session.alternative(), "Drag ended without a move");
            return Ok(None);
        }
        let len = chart.alternatives().len();
        if to >= len || from >= len {
            return Err(ModelError::AlternativeIndexOutOfRange {
                index: from.max(to),
                len,
            }
            .into());
        }
        chart.move_alternative(from, to)?;
        info!(alternative = session.alternative(), from, to, "Moved alternative");
        Ok(Some(Reordered { from, to }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Automatic orderings
    // ─────────────────────────────────────────────────────────────────────────

    /// Sorts the alternatives by name. Returns true if the order changed.
    pub fn sort_alphabetically(
        &mut self,
        chart: &mut Chart,
        history: &mut ChartUndoRedo,
    ) -> Result<bool, ReorderError> {
        self.ensure_idle()?;
        history.save_alternatives_record(chart.alternatives());
        let sorted = alphabetical(chart.alternatives());
        self.commit(chart, sorted, "alphabetical")
    }

    /// Restores the order captured at construction.
    ///
    /// Saves to the history only if the order actually changes.
    pub fn reset_order(
        &mut self,
        chart: &mut Chart,
        history: &mut ChartUndoRedo,
    ) -> Result<bool, ReorderError> {
        self.ensure_idle()?;
        let restored = restore_order(chart.alternatives(), &self.original_order);
        if names(&restored) == names(chart.alternatives()) {
            return Ok(false);
        }
        history.save_alternatives_record(chart.alternatives());
        self.commit(chart, restored, "reset")
    }

    /// Sorts by descending score on an objective.
    ///
    /// An abstract objective sorts by the weighted sum over its primitives.
    /// Scores are read from `view`, which must match the chart's order.
    ///
    /// # Errors
    ///
    /// - `ObjectiveNotFound` if the chart has no such objective
    /// - `Reconcile` if `view` does not line up with the chart
    pub fn sort_by_objective(
        &mut self,
        chart: &mut Chart,
        history: &mut ChartUndoRedo,
        view: &ReconciledView,
        objective: &str,
    ) -> Result<bool, ReorderError> {
        self.ensure_idle()?;
        let target = chart
            .find_objective(objective)
            .ok_or_else(|| ReorderError::ObjectiveNotFound(objective.to_string()))?;
        let primitives: Vec<&str> = target.primitives().iter().map(|p| p.name()).collect();

        let current = names(chart.alternatives());
        if view.alternative_order() != current {
            return Err(ReconcileError::StaleView(
                "cell order does not match the chart's alternatives".to_string(),
            )
            .into());
        }
        let indices = by_objective_scores(view, &primitives)?;
        let sorted: Vec<Alternative> = indices
            .iter()
            .filter_map(|i| chart.alternatives().get(*i))
            .cloned()
            .collect();

        history.save_alternatives_record(chart.alternatives());
        self.commit(chart, sorted, "objective")
    }

    fn commit(
        &self,
        chart: &mut Chart,
        alternatives: Vec<Alternative>,
        ordering: &'static str,
    ) -> Result<bool, ReorderError> {
        let changed = names(&alternatives) != names(chart.alternatives());
        chart.set_alternatives(alternatives)?;
        info!(ordering, changed, "Sorted alternatives");
        Ok(changed)
    }

    fn ensure_idle(&self) -> Result<(), ReorderError> {
        if self.phase == DragPhase::Idle {
            Ok(())
        } else {
            Err(ValidationError::invalid_format(
                "sort",
                "Cannot sort while an alternative is being dragged",
            )
            .into())
        }
    }
}

fn names(alternatives: &[Alternative]) -> Vec<String> {
    alternatives.iter().map(|a| a.name().to_string()).collect()
}

fn not_dragging() -> ReorderError {
    ValidationError::invalid_format("drag", "No alternative is being dragged").into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        ChartType, Domain, PrimitiveObjective, ScoreFunction, ScoreFunctionMap, User, WeightMap,
    };
    use crate::domain::rendering::{Orientation, RendererDataUtility};

    fn chart(names: &[(&str, f64)]) -> Chart {
        let mut chart = Chart::new("Hotels", "aaron", ChartType::Individual);
        chart
            .add_root_objective(PrimitiveObjective::new("rate", Domain::continuous(0.0, 10.0)).into())
            .unwrap();
        for (name, rate) in names {
            chart
                .add_alternative(Alternative::new(*name).with_consequence("rate", *rate))
                .unwrap();
        }
        let mut functions = ScoreFunctionMap::new();
        functions.set("rate", ScoreFunction::continuous([(0.0, 0.0), (10.0, 1.0)]).unwrap());
        chart
            .add_user(
                User::new("aaron")
                    .with_weight_map(WeightMap::uniform(["rate"]))
                    .with_score_functions(functions),
            )
            .unwrap();
        chart
    }

    fn order(chart: &Chart) -> Vec<&str> {
        chart.alternatives().iter().map(|a| a.name()).collect()
    }

    fn view(chart: &Chart) -> ReconciledView {
        RendererDataUtility::reconcile(chart, &["aaron"], Orientation::Vertical, false).unwrap()
    }

    #[test]
    fn drag_forward_past_two_boxes_commits_new_order() {
        let mut chart = chart(&[("A", 1.0), ("B", 2.0), ("C", 3.0), ("D", 4.0)]);
        let mut view = view(&chart);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        sorter
            .start_drag(&chart, &mut history, 0, &TrackLayout::uniform(4, 400.0))
            .unwrap();
        assert_eq!(sorter.phase(), DragPhase::Dragging);
        assert_eq!(sorter.drag(260.0).unwrap().new_index, 2);
        let moved = sorter.end_drag(&mut chart).unwrap();

        assert_eq!(moved, Some(Reordered { from: 0, to: 2 }));
        assert_eq!(order(&chart), vec!["B", "C", "A", "D"]);
        view.move_alternative(0, 2).unwrap();
        assert_eq!(view.alternative_order(), order(&chart));
        assert_eq!(sorter.phase(), DragPhase::Idle);

        history.undo(&mut chart).unwrap();
        assert_eq!(order(&chart), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn drag_without_slot_change_keeps_order_and_saved_record() {
        let mut chart = chart(&[("A", 1.0), ("B", 2.0)]);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        sorter
            .start_drag(&chart, &mut history, 1, &TrackLayout::uniform(2, 200.0))
            .unwrap();
        sorter.drag(-20.0).unwrap();

        assert_eq!(sorter.end_drag(&mut chart).unwrap(), None);
        assert_eq!(order(&chart), vec!["A", "B"]);
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn drag_events_out_of_phase_are_rejected() {
        let mut chart = chart(&[("A", 1.0)]);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        assert!(matches!(sorter.drag(5.0), Err(ReorderError::InvalidTransition(_))));
        assert!(sorter.end_drag(&mut chart).is_err());

        let layout = TrackLayout::uniform(1, 100.0);
        sorter.start_drag(&chart, &mut history, 0, &layout).unwrap();
        assert!(sorter.start_drag(&chart, &mut history, 0, &layout).is_err());
        assert!(sorter.sort_alphabetically(&mut chart, &mut history).is_err());
    }

    #[test]
    fn start_drag_rejects_layout_of_wrong_size() {
        let chart = chart(&[("A", 1.0), ("B", 2.0)]);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        let err = sorter
            .start_drag(&chart, &mut history, 0, &TrackLayout::uniform(3, 300.0))
            .unwrap_err();

        assert!(matches!(err, ReorderError::LayoutMismatch { extents: 3, alternatives: 2 }));
        assert_eq!(sorter.phase(), DragPhase::Idle);
        assert!(!history.can_undo());
    }

    #[test]
    fn alphabetical_sort_saves_previous_order() {
        let mut chart = chart(&[("Ramada", 1.0), ("Hyatt", 2.0), ("Marriott", 3.0)]);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        assert!(sorter.sort_alphabetically(&mut chart, &mut history).unwrap());

        assert_eq!(order(&chart), vec!["Hyatt", "Marriott", "Ramada"]);
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn reset_restores_original_order_and_saves_once() {
        let mut chart = chart(&[("Ramada", 1.0), ("Hyatt", 2.0)]);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        assert!(!sorter.reset_order(&mut chart, &mut history).unwrap());
        assert!(!history.can_undo());

        sorter.sort_alphabetically(&mut chart, &mut history).unwrap();
        assert!(sorter.reset_order(&mut chart, &mut history).unwrap());

        assert_eq!(order(&chart), vec!["Ramada", "Hyatt"]);
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn sort_by_objective_is_descending_and_stable() {
        let mut chart = chart(&[("C", 3.0), ("A", 5.0), ("B", 5.0)]);
        let view = view(&chart);
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        assert!(sorter
            .sort_by_objective(&mut chart, &mut history, &view, "rate")
            .unwrap());

        assert_eq!(order(&chart), vec!["A", "B", "C"]);
    }

    #[test]
    fn sort_by_objective_rejects_stale_view() {
        let mut chart = chart(&[("A", 1.0), ("B", 2.0)]);
        let view = view(&chart);
        chart.move_alternative(0, 1).unwrap();
        let mut history = ChartUndoRedo::new();
        let mut sorter = SortAlternativesInteraction::new(&chart);

        let err = sorter
            .sort_by_objective(&mut chart, &mut history, &view, "rate")
            .unwrap_err();
        assert!(matches!(err, ReorderError::Reconcile(ReconcileError::StaleView(_))));
        assert!(!history.can_undo());
    }
}
