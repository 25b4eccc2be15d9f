//! Ports - Interfaces for the collaborators around a chart session.
//!
//! The session depends only on these traits; adapters implement them.
//!
//! - `ChartObserver` - Receives chart notifications (persistence, logging)
//! - `RenderSink` - Receives renderer updates (drawing)

mod chart_observer;
mod render_sink;

pub use chart_observer::ChartObserver;
pub use render_sink::RenderSink;
