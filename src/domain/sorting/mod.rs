//! Sorting - the order alternatives are shown in.
//!
//! # Components
//!
//! - `SortAlternativesInteraction` - Drag gesture plus alphabetical, reset
//!   and by-objective orderings
//! - `JumpPoints` / `TrackLayout` - Maps a drag position to a slot
//! - `DragSession` / `DragPhase` - State of the running drag

mod drag;
mod errors;
mod interaction;
mod jump_points;
mod ordering;

pub use drag::{DragPhase, DragSession, DragUpdate};
pub use errors::ReorderError;
pub use interaction::{Reordered, SortAlternativesInteraction, SortMode};
pub use jump_points::{DragDirection, Extent, JumpPoints, TrackLayout};
pub use ordering::{alphabetical, by_objective_scores, restore_order};
