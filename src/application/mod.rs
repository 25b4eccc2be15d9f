//! Application layer - the chart session and gesture dispatch.
//!
//! `ChartSession` orchestrates the domain engines for one chart: it saves
//! history before every change, keeps the view current and tells
//! observers and render sinks what happened.

mod gestures;
mod session;

pub use gestures::{GestureEvent, GestureOutcome};
pub use session::{ChartSession, StructureUpdate};
