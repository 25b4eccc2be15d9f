//! Chart aggregate - the root of the preference model.
//!
//! A chart owns its objective tree, its ordered alternatives and its
//! ordered users. All mutation goes through the aggregate so identity
//! invariants hold after every call.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ChartId;

use super::objective::check_tree_names;
use super::{Alternative, EntityKind, ModelError, Objective, PrimitiveObjective, User, WeightMap};

/// Whether a chart is used by one person or shared by a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Individual,
    Group,
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartType::Individual => write!(f, "Individual"),
            ChartType::Group => write!(f, "Group"),
        }
    }
}

/// Value chart aggregate.
///
/// # Invariants
///
/// - objective siblings never share a name
/// - primitive objective names are unique across the tree
/// - alternative names are unique
/// - usernames are unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    id: ChartId,
    name: String,
    #[serde(default)]
    description: String,
    creator: String,
    #[serde(default)]
    chart_type: ChartType,
    #[serde(default)]
    root_objectives: Vec<Objective>,
    #[serde(default)]
    alternatives: Vec<Alternative>,
    #[serde(default)]
    users: Vec<User>,
}

impl Chart {
    /// Creates an empty chart.
    pub fn new(name: impl Into<String>, creator: impl Into<String>, chart_type: ChartType) -> Self {
        Self {
            id: ChartId::new(),
            name: name.into(),
            description: String::new(),
            creator: creator.into(),
            chart_type,
            root_objectives: Vec::new(),
            alternatives: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ChartId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Basic details
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.creator = creator.into();
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Objectives
    // ─────────────────────────────────────────────────────────────────────────

    /// Root objectives in display order.
    pub fn root_objectives(&self) -> &[Objective] {
        &self.root_objectives
    }

    /// Appends a root objective.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if any objective name in the new subtree collides
    pub fn add_root_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let mut roots = self.root_objectives.clone();
        roots.push(objective);
        self.set_root_objectives(roots)
    }

    /// Replaces the whole objective tree.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if siblings or primitives share a name
    pub fn set_root_objectives(&mut self, roots: Vec<Objective>) -> Result<(), ModelError> {
        check_tree_names(&roots)?;
        self.root_objectives = roots;
        Ok(())
    }

    /// Primitive objectives in depth-first, left-to-right order.
    pub fn primitive_objectives(&self) -> Vec<&PrimitiveObjective> {
        self.root_objectives
            .iter()
            .flat_map(|root| root.primitives())
            .collect()
    }

    /// Finds any objective (abstract or primitive) by name.
    pub fn find_objective(&self, name: &str) -> Option<&Objective> {
        self.root_objectives.iter().find_map(|root| root.find(name))
    }

    /// Finds a primitive objective by name.
    pub fn primitive_objective(&self, name: &str) -> Option<&PrimitiveObjective> {
        match self.find_objective(name)? {
            Objective::Primitive(p) => Some(p),
            Objective::Abstract(_) => None,
        }
    }

    /// Equal weights over every primitive objective.
    pub fn default_weight_map(&self) -> WeightMap {
        WeightMap::uniform(self.primitive_objectives().iter().map(|p| p.name()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Alternatives
    // ─────────────────────────────────────────────────────────────────────────

    /// Alternatives in display order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn alternative(&self, name: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.name() == name)
    }

    pub fn alternative_mut(&mut self, name: &str) -> Option<&mut Alternative> {
        self.alternatives.iter_mut().find(|a| a.name() == name)
    }

    /// Position of an alternative in display order.
    pub fn alternative_index(&self, name: &str) -> Option<usize> {
        self.alternatives.iter().position(|a| a.name() == name)
    }

    /// Appends an alternative.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if an alternative with the same name exists
    pub fn add_alternative(&mut self, alternative: Alternative) -> Result<(), ModelError> {
        if self.alternative(alternative.name()).is_some() {
            return Err(ModelError::duplicate(
                EntityKind::Alternative,
                alternative.name(),
            ));
        }
        self.alternatives.push(alternative);
        Ok(())
    }

    /// Replaces the alternative list, keeping the given order.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if two alternatives share a name
    pub fn set_alternatives(&mut self, alternatives: Vec<Alternative>) -> Result<(), ModelError> {
        for (i, alternative) in alternatives.iter().enumerate() {
            if alternatives[..i].iter().any(|a| a.name() == alternative.name()) {
                return Err(ModelError::duplicate(
                    EntityKind::Alternative,
                    alternative.name(),
                ));
            }
        }
        self.alternatives = alternatives;
        Ok(())
    }

    /// Removes an alternative by name.
    pub fn remove_alternative(&mut self, name: &str) -> Result<Alternative, ModelError> {
        let index = self
            .alternative_index(name)
            .ok_or_else(|| ModelError::AlternativeNotFound(name.to_string()))?;
        Ok(self.alternatives.remove(index))
    }

    /// Moves the alternative at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// - `AlternativeIndexOutOfRange` if either index is past the end
    pub fn move_alternative(&mut self, from: usize, to: usize) -> Result<(), ModelError> {
        let len = self.alternatives.len();
        for index in [from, to] {
            if index >= len {
                return Err(ModelError::AlternativeIndexOutOfRange { index, len });
            }
        }
        let alternative = self.alternatives.remove(from);
        self.alternatives.insert(to, alternative);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    /// Users in display order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username() == username)
    }

    pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.username() == username)
    }

    /// Like [`Chart::user_mut`] but fails with `UserNotFound`.
    pub fn require_user_mut(&mut self, username: &str) -> Result<&mut User, ModelError> {
        self.user_mut(username)
            .ok_or_else(|| ModelError::UserNotFound(username.to_string()))
    }

    /// Appends a user.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the username is taken
    pub fn add_user(&mut self, user: User) -> Result<(), ModelError> {
        if self.user(user.username()).is_some() {
            return Err(ModelError::duplicate(EntityKind::User, user.username()));
        }
        self.users.push(user);
        Ok(())
    }

    /// Removes a user by name.
    pub fn remove_user(&mut self, username: &str) -> Result<User, ModelError> {
        let index = self
            .users
            .iter()
            .position(|u| u.username() == username)
            .ok_or_else(|| ModelError::UserNotFound(username.to_string()))?;
        Ok(self.users.remove(index))
    }

    pub(crate) fn alternatives_mut(&mut self) -> &mut [Alternative] {
        &mut self.alternatives
    }
}
