//! Observer that writes every chart notification to the tracing log.

use tracing::info;

use crate::domain::model::ChartNotification;
use crate::ports::ChartObserver;

/// Logs chart notifications at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ChartObserver for TracingObserver {
    fn notify(&self, notification: &ChartNotification) {
        let chart_id = notification.chart_id();
        match notification {
            ChartNotification::AlternativesReordered(e) => {
                info!(%chart_id, order = ?e.order, "Alternatives reordered");
            }
            ChartNotification::WeightMapChanged(e) => {
                info!(%chart_id, username = %e.username, "Weight map changed");
            }
            ChartNotification::ScoreFunctionChanged(e) => {
                info!(
                    %chart_id,
                    username = %e.username,
                    objective = %e.objective,
                    "Score function changed"
                );
            }
            ChartNotification::ObjectivesChanged(e) => {
                info!(%chart_id, primitives = e.primitive_objectives.len(), "Objectives changed");
            }
            ChartNotification::ChartStructureChanged(e) => {
                info!(%chart_id, changes = ?e.changes, "Chart structure changed");
            }
            ChartNotification::UndoRedoApplied(e) => {
                info!(
                    %chart_id,
                    direction = ?e.direction,
                    kind = %e.kind,
                    "Undo/redo applied"
                );
            }
        }
    }
}
