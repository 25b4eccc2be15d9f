//! RenderSink port - Interface for the drawing collaborator.

use crate::domain::rendering::RendererUpdate;

/// Port that receives a full renderer update after every reconciliation.
///
/// The update carries everything needed to draw the chart; sinks should
/// not keep references into the session.
pub trait RenderSink: Send + Sync {
    fn render(&self, update: &RendererUpdate);
}
