//! Gesture dispatch - turns raw gesture events into session calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::foundation::DomainError;
use crate::domain::model::ChangeKind;
use crate::domain::sorting::{DragUpdate, Reordered, TrackLayout};

use super::ChartSession;

/// An event delivered by the gesture source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Pointer went down on the alternative at `index`.
    DragStart { index: usize, layout: TrackLayout },
    /// Pointer moved `delta` pixels along the alternatives axis.
    DragMove { delta: f64 },
    /// Pointer released.
    DragEnd,
    /// An objective label was clicked.
    ObjectiveClicked { objective: String },
    /// The "alphabetical" control was clicked.
    Alphabetical,
    /// The "reset" control was clicked.
    Reset,
    Undo,
    Redo,
}

/// What a dispatched gesture did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    DragStarted,
    Dragged(DragUpdate),
    /// `None` when the alternative was dropped back into its own slot.
    Dropped(Option<Reordered>),
    /// Whether the sort changed the order.
    Sorted(bool),
    /// The kind of change replayed, if any.
    Replayed(Option<ChangeKind>),
}

impl ChartSession {
    /// Routes one gesture to the matching session operation.
    ///
    /// # Errors
    ///
    /// Whatever the routed operation returns.
    pub fn dispatch(&mut self, event: GestureEvent) -> Result<GestureOutcome, DomainError> {
        debug!(?event, "Dispatching gesture");
        match event {
            GestureEvent::DragStart { index, layout } => {
                self.start_drag(index, &layout)?;
                Ok(GestureOutcome::DragStarted)
            }
            GestureEvent::DragMove { delta } => self.drag(delta).map(GestureOutcome::Dragged),
            GestureEvent::DragEnd => self.end_drag().map(GestureOutcome::Dropped),
            GestureEvent::ObjectiveClicked { objective } => {
                self.sort_by_objective(&objective).map(GestureOutcome::Sorted)
            }
            GestureEvent::Alphabetical => self.sort_alphabetically().map(GestureOutcome::Sorted),
            GestureEvent::Reset => self.reset_order().map(GestureOutcome::Sorted),
            GestureEvent::Undo => self.undo().map(GestureOutcome::Replayed),
            GestureEvent::Redo => self.redo().map(GestureOutcome::Replayed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gestures_deserialize_from_tagged_json() {
        let event: GestureEvent =
            serde_json::from_str(r#"{"gesture":"drag_move","delta":12.5}"#).unwrap();
        assert_eq!(event, GestureEvent::DragMove { delta: 12.5 });

        let event: GestureEvent =
            serde_json::from_str(r#"{"gesture":"objective_clicked","objective":"rate"}"#).unwrap();
        assert_eq!(event, GestureEvent::ObjectiveClicked { objective: "rate".into() });
    }
}
