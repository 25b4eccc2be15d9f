//! History records - deep snapshots of one part of the chart.

use serde::{Deserialize, Serialize};

use crate::domain::model::{Alternative, ChangeKind, Chart, Objective, ScoreFunction, WeightMap};

use super::UndoRedoError;

/// A user's score function for one objective.
///
/// `score_function` is `None` when the user had no function for the
/// objective at capture time; applying such a record removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFunctionRecord {
    pub username: String,
    pub objective: String,
    pub score_function: Option<ScoreFunction>,
}

impl ScoreFunctionRecord {
    pub fn new(
        username: impl Into<String>,
        objective: impl Into<String>,
        score_function: Option<ScoreFunction>,
    ) -> Self {
        Self {
            username: username.into(),
            objective: objective.into(),
            score_function,
        }
    }

    /// Snapshots the user's current function for the objective.
    pub fn capture(chart: &Chart, username: &str, objective: &str) -> Result<Self, UndoRedoError> {
        let user = chart
            .user(username)
            .ok_or_else(|| UndoRedoError::UserNotFound(username.to_string()))?;
        Ok(Self::new(
            username,
            objective,
            user.score_functions().get(objective).cloned(),
        ))
    }

    fn apply(&self, chart: &mut Chart) -> Result<(), UndoRedoError> {
        let user = chart
            .user_mut(&self.username)
            .ok_or_else(|| UndoRedoError::UserNotFound(self.username.clone()))?;
        let functions = user.score_functions_mut();
        match &self.score_function {
            Some(function) => functions.set(self.objective.clone(), function.clone()),
            None => {
                functions.remove(&self.objective);
            }
        }
        Ok(())
    }
}

/// A user's whole weight map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMapRecord {
    pub username: String,
    pub weight_map: WeightMap,
}

impl WeightMapRecord {
    pub fn new(username: impl Into<String>, weight_map: WeightMap) -> Self {
        Self {
            username: username.into(),
            weight_map,
        }
    }

    pub fn capture(chart: &Chart, username: &str) -> Result<Self, UndoRedoError> {
        let user = chart
            .user(username)
            .ok_or_else(|| UndoRedoError::UserNotFound(username.to_string()))?;
        Ok(Self::new(username, user.weight_map().clone()))
    }

    fn apply(&self, chart: &mut Chart) -> Result<(), UndoRedoError> {
        chart
            .user_mut(&self.username)
            .ok_or_else(|| UndoRedoError::UserNotFound(self.username.clone()))?
            .set_weight_map(self.weight_map.clone());
        Ok(())
    }
}

/// The full alternative list, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesRecord {
    pub alternatives: Vec<Alternative>,
}

impl AlternativesRecord {
    pub fn new(alternatives: Vec<Alternative>) -> Self {
        Self { alternatives }
    }

    pub fn capture(chart: &Chart) -> Self {
        Self::new(chart.alternatives().to_vec())
    }

    /// Alternative names in recorded order.
    pub fn order(&self) -> Vec<&str> {
        self.alternatives.iter().map(|a| a.name()).collect()
    }

    fn apply(&self, chart: &mut Chart) -> Result<(), UndoRedoError> {
        chart.set_alternatives(self.alternatives.clone())?;
        Ok(())
    }
}

/// The full objective tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectivesRecord {
    pub root_objectives: Vec<Objective>,
}

impl ObjectivesRecord {
    pub fn new(root_objectives: Vec<Objective>) -> Self {
        Self { root_objectives }
    }

    pub fn capture(chart: &Chart) -> Self {
        Self::new(chart.root_objectives().to_vec())
    }

    fn apply(&self, chart: &mut Chart) -> Result<(), UndoRedoError> {
        chart.set_root_objectives(self.root_objectives.clone())?;
        Ok(())
    }
}

/// A tagged history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Memento {
    ScoreFunction(ScoreFunctionRecord),
    WeightMap(WeightMapRecord),
    AlternativeOrder(AlternativesRecord),
    Objectives(ObjectivesRecord),
}

impl Memento {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Memento::ScoreFunction(_) => ChangeKind::ScoreFunction,
            Memento::WeightMap(_) => ChangeKind::WeightMap,
            Memento::AlternativeOrder(_) => ChangeKind::AlternativeOrder,
            Memento::Objectives(_) => ChangeKind::Objectives,
        }
    }

    /// The user this record belongs to, for per-user kinds.
    pub fn username(&self) -> Option<&str> {
        match self {
            Memento::ScoreFunction(r) => Some(&r.username),
            Memento::WeightMap(r) => Some(&r.username),
            Memento::AlternativeOrder(_) | Memento::Objectives(_) => None,
        }
    }

    /// Snapshots the chart's live state for the same slot this record covers.
    pub(crate) fn capture_current(&self, chart: &Chart) -> Result<Memento, UndoRedoError> {
        Ok(match self {
            Memento::ScoreFunction(r) => {
                Memento::ScoreFunction(ScoreFunctionRecord::capture(chart, &r.username, &r.objective)?)
            }
            Memento::WeightMap(r) => Memento::WeightMap(WeightMapRecord::capture(chart, &r.username)?),
            Memento::AlternativeOrder(_) => Memento::AlternativeOrder(AlternativesRecord::capture(chart)),
            Memento::Objectives(_) => Memento::Objectives(ObjectivesRecord::capture(chart)),
        })
    }

    /// Writes the recorded state back into the chart.
    pub(crate) fn apply(&self, chart: &mut Chart) -> Result<(), UndoRedoError> {
        match self {
            Memento::ScoreFunction(r) => r.apply(chart),
            Memento::WeightMap(r) => r.apply(chart),
            Memento::AlternativeOrder(r) => r.apply(chart),
            Memento::Objectives(r) => r.apply(chart),
        }
    }
}

impl From<ScoreFunctionRecord> for Memento {
    fn from(record: ScoreFunctionRecord) -> Self {
        Memento::ScoreFunction(record)
    }
}

impl From<WeightMapRecord> for Memento {
    fn from(record: WeightMapRecord) -> Self {
        Memento::WeightMap(record)
    }
}

impl From<AlternativesRecord> for Memento {
    fn from(record: AlternativesRecord) -> Self {
        Memento::AlternativeOrder(record)
    }
}

impl From<ObjectivesRecord> for Memento {
    fn from(record: ObjectivesRecord) -> Self {
        Memento::Objectives(record)
    }
}
