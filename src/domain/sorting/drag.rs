//! Manual reorder gesture state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

use super::{Extent, JumpPoints, ReorderError, TrackLayout};

/// Phase of the manual reorder gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

impl StateMachine for DragPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DragPhase::*;
        matches!((self, target), (Idle, Dragging) | (Dragging, Idle))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            DragPhase::Idle => vec![DragPhase::Dragging],
            DragPhase::Dragging => vec![DragPhase::Idle],
        }
    }
}

/// What a single drag move did, for adapters that move the box on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragUpdate {
    /// The delta actually applied after clamping to the track.
    pub applied_delta: f64,
    /// Sum of applied deltas since the drag began.
    pub total_delta: f64,
    /// New start coordinate of the dragged box.
    pub position: f64,
    /// Slot the alternative would drop into now.
    pub new_index: usize,
}

/// State held while one alternative is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    alternative: String,
    original_index: usize,
    new_index: usize,
    extent: Extent,
    total_delta: f64,
    track_length: f64,
    jump_points: JumpPoints,
}

impl DragSession {
    /// Begins a drag of the box at `index`.
    ///
    /// # Errors
    ///
    /// - `LayoutMismatch` if the layout has no extent at `index`
    pub fn begin(
        alternative: impl Into<String>,
        index: usize,
        layout: &TrackLayout,
    ) -> Result<Self, ReorderError> {
        let extent = *layout
            .extents
            .get(index)
            .ok_or(ReorderError::LayoutMismatch {
                extents: layout.extents.len(),
                alternatives: index + 1,
            })?;
        Ok(Self {
            alternative: alternative.into(),
            original_index: index,
            new_index: index,
            extent,
            total_delta: 0.0,
            track_length: layout.track_length,
            jump_points: JumpPoints::from_layout(layout),
        })
    }

    /// Moves the box by `delta`, clamped so it stays on the track.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if the jump points do not cover the new position;
    ///   the session is left as it was
    pub fn move_by(&mut self, delta: f64) -> Result<DragUpdate, ReorderError> {
        let max_start = (self.track_length - self.extent.size).max(0.0);
        let position = (self.extent.start + delta).clamp(0.0, max_start);
        let applied_delta = position - self.extent.start;
        let total_delta = self.total_delta + applied_delta;

        let moved = Extent::new(position, self.extent.size);
        let new_index = self.jump_points.target_index(moved.center(), total_delta)?;

        self.extent = moved;
        self.total_delta = total_delta;
        self.new_index = new_index;
        Ok(DragUpdate {
            applied_delta,
            total_delta,
            position,
            new_index,
        })
    }

    pub fn alternative(&self) -> &str {
        &self.alternative
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn new_index(&self) -> usize {
        self.new_index
    }

    pub fn total_delta(&self) -> f64 {
        self.total_delta
    }

    pub fn jump_points(&self) -> &JumpPoints {
        &self.jump_points
    }
}
