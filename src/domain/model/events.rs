//! Chart domain events.
//!
//! Events published after the chart is changed:
//! - `AlternativesReordered` - Alternative display order changed
//! - `WeightMapChanged` - A user's weights changed
//! - `ScoreFunctionChanged` - A user's score function for one objective changed
//! - `ObjectivesChanged` - The objective tree was replaced
//! - `ChartStructureChanged` - Objectives/alternatives/details were replaced wholesale
//! - `UndoRedoApplied` - A history record was played back

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, ChartId, EventEnvelope, EventId, Timestamp};

use super::{ScoreFunction, WeightMap};

/// The four independently tracked kinds of chart change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    ScoreFunction,
    WeightMap,
    AlternativeOrder,
    Objectives,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::ScoreFunction => "score_function",
            ChangeKind::WeightMap => "weight_map",
            ChangeKind::AlternativeOrder => "alternative_order",
            ChangeKind::Objectives => "objectives",
        };
        write!(f, "{}", s)
    }
}

/// Which history stack a record was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDirection {
    Undo,
    Redo,
}

// ════════════════════════════════════════════════════════════════════════════
// AlternativesReordered
// ════════════════════════════════════════════════════════════════════════════

/// Published when the alternatives are shown in a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesReordered {
    pub event_id: EventId,
    pub chart_id: ChartId,

    /// Alternative names in their new order.
    pub order: Vec<String>,

    pub reordered_at: Timestamp,
}

impl AlternativesReordered {
    pub fn new(chart_id: ChartId, order: Vec<String>) -> Self {
        Self {
            event_id: EventId::new(),
            chart_id,
            order,
            reordered_at: Timestamp::now(),
        }
    }
}

domain_event!(
    AlternativesReordered,
    event_type = "chart.alternatives_reordered.v1",
    aggregate_id = chart_id,
    aggregate_type = "Chart",
    occurred_at = reordered_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WeightMapChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user's weight map is replaced or edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMapChanged {
    pub event_id: EventId,
    pub chart_id: ChartId,
    pub username: String,
    pub weight_map: WeightMap,
    pub changed_at: Timestamp,
}

impl WeightMapChanged {
    pub fn new(chart_id: ChartId, username: impl Into<String>, weight_map: WeightMap) -> Self {
        Self {
            event_id: EventId::new(),
            chart_id,
            username: username.into(),
            weight_map,
            changed_at: Timestamp::now(),
        }
    }
}

domain_event!(
    WeightMapChanged,
    event_type = "chart.weight_map_changed.v1",
    aggregate_id = chart_id,
    aggregate_type = "Chart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ScoreFunctionChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user's score function for one objective changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFunctionChanged {
    pub event_id: EventId,
    pub chart_id: ChartId,
    pub username: String,
    pub objective: String,
    pub score_function: ScoreFunction,
    pub changed_at: Timestamp,
}

impl ScoreFunctionChanged {
    pub fn new(
        chart_id: ChartId,
        username: impl Into<String>,
        objective: impl Into<String>,
        score_function: ScoreFunction,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            chart_id,
            username: username.into(),
            objective: objective.into(),
            score_function,
            changed_at: Timestamp::now(),
        }
    }
}

domain_event!(
    ScoreFunctionChanged,
    event_type = "chart.score_function_changed.v1",
    aggregate_id = chart_id,
    aggregate_type = "Chart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ObjectivesChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when the objective tree is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectivesChanged {
    pub event_id: EventId,
    pub chart_id: ChartId,

    /// Primitive objective names after the change, depth-first.
    pub primitive_objectives: Vec<String>,

    pub changed_at: Timestamp,
}

impl ObjectivesChanged {
    pub fn new(chart_id: ChartId, primitive_objectives: Vec<String>) -> Self {
        Self {
            event_id: EventId::new(),
            chart_id,
            primitive_objectives,
            changed_at: Timestamp::now(),
        }
    }
}

domain_event!(
    ObjectivesChanged,
    event_type = "chart.objectives_changed.v1",
    aggregate_id = chart_id,
    aggregate_type = "Chart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ChartStructureChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published after a new chart structure has been merged in.
///
/// `changes` holds the human-readable change list shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStructureChanged {
    pub event_id: EventId,
    pub chart_id: ChartId,
    pub changes: Vec<String>,
    pub changed_at: Timestamp,
}

impl ChartStructureChanged {
    pub fn new(chart_id: ChartId, changes: Vec<String>) -> Self {
        Self {
            event_id: EventId::new(),
            chart_id,
            changes,
            changed_at: Timestamp::now(),
        }
    }
}

domain_event!(
    ChartStructureChanged,
    event_type = "chart.structure_changed.v1",
    aggregate_id = chart_id,
    aggregate_type = "Chart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// UndoRedoApplied
// ════════════════════════════════════════════════════════════════════════════

/// Published after an undo or redo record has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoRedoApplied {
    pub event_id: EventId,
    pub chart_id: ChartId,
    pub direction: HistoryDirection,
    pub kind: ChangeKind,
    pub applied_at: Timestamp,
}

impl UndoRedoApplied {
    pub fn new(chart_id: ChartId, direction: HistoryDirection, kind: ChangeKind) -> Self {
        Self {
            event_id: EventId::new(),
            chart_id,
            direction,
            kind,
            applied_at: Timestamp::now(),
        }
    }
}

domain_event!(
    UndoRedoApplied,
    event_type = "chart.undo_redo_applied.v1",
    aggregate_id = chart_id,
    aggregate_type = "Chart",
    occurred_at = applied_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ChartNotification
// ════════════════════════════════════════════════════════════════════════════

/// Every event an observer of a chart can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notification", rename_all = "snake_case")]
pub enum ChartNotification {
    AlternativesReordered(AlternativesReordered),
    WeightMapChanged(WeightMapChanged),
    ScoreFunctionChanged(ScoreFunctionChanged),
    ObjectivesChanged(ObjectivesChanged),
    ChartStructureChanged(ChartStructureChanged),
    UndoRedoApplied(UndoRedoApplied),
}

impl ChartNotification {
    /// The routing string of the wrapped event.
    pub fn event_type(&self) -> &'static str {
        use crate::domain::foundation::DomainEvent;
        match self {
            ChartNotification::AlternativesReordered(e) => e.event_type(),
            ChartNotification::WeightMapChanged(e) => e.event_type(),
            ChartNotification::ScoreFunctionChanged(e) => e.event_type(),
            ChartNotification::ObjectivesChanged(e) => e.event_type(),
            ChartNotification::ChartStructureChanged(e) => e.event_type(),
            ChartNotification::UndoRedoApplied(e) => e.event_type(),
        }
    }

    /// The chart the event belongs to.
    pub fn chart_id(&self) -> ChartId {
        match self {
            ChartNotification::AlternativesReordered(e) => e.chart_id,
            ChartNotification::WeightMapChanged(e) => e.chart_id,
            ChartNotification::ScoreFunctionChanged(e) => e.chart_id,
            ChartNotification::ObjectivesChanged(e) => e.chart_id,
            ChartNotification::ChartStructureChanged(e) => e.chart_id,
            ChartNotification::UndoRedoApplied(e) => e.chart_id,
        }
    }

    /// Wraps the event in a transport envelope.
    ///
    /// Preference changes record the user they belong to in the metadata.
    pub fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        match self {
            ChartNotification::AlternativesReordered(e) => EventEnvelope::from_event(e),
            ChartNotification::WeightMapChanged(e) => {
                Ok(EventEnvelope::from_event(e)?.with_user_id(e.username.as_str()))
            }
            ChartNotification::ScoreFunctionChanged(e) => {
                Ok(EventEnvelope::from_event(e)?.with_user_id(e.username.as_str()))
            }
            ChartNotification::ObjectivesChanged(e) => EventEnvelope::from_event(e),
            ChartNotification::ChartStructureChanged(e) => EventEnvelope::from_event(e),
            ChartNotification::UndoRedoApplied(e) => EventEnvelope::from_event(e),
        }
    }
}

macro_rules! impl_from_event {
    ($($event:ident),* $(,)?) => {
        $(
            impl From<$event> for ChartNotification {
                fn from(event: $event) -> Self {
                    ChartNotification::$event(event)
                }
            }
        )*
    };
}

impl_from_event!(
    AlternativesReordered,
    WeightMapChanged,
    ScoreFunctionChanged,
    ObjectivesChanged,
    ChartStructureChanged,
    UndoRedoApplied,
);
