//! Preference model - objectives, alternatives, users and their preferences.
//!
//! Pure data with accessors; nothing here knows how a chart is drawn.
//!
//! - `Objective` - Abstract/primitive objective tree
//! - `WeightMap` / `ScoreFunction` - Per-user preferences
//! - `Alternative` - Candidate with one consequence per primitive objective
//! - `Chart` - Aggregate root owning all of the above

mod alternative;
mod chart;
mod consequence;
mod errors;
mod events;
mod objective;
mod score_function;
mod user;
mod weight_map;

pub use alternative::Alternative;
pub use chart::{Chart, ChartType};
pub use consequence::{Consequence, Domain};
pub use errors::{EntityKind, ModelError};
pub use events::{
    AlternativesReordered, ChangeKind, ChartNotification, ChartStructureChanged, HistoryDirection,
    ObjectivesChanged, ScoreFunctionChanged, UndoRedoApplied, WeightMapChanged,
};
pub use objective::{AbstractObjective, Objective, PrimitiveObjective};
pub use score_function::{
    ContinuousScoreFunction, DiscreteScoreFunction, ScoreFunction, ScoreFunctionMap,
};
pub use user::User;
pub use weight_map::{WeightMap, WEIGHT_TOLERANCE_PER_OBJECTIVE};
