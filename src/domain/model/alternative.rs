//! Alternatives - the candidate options being compared.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Consequence;

/// A candidate option with one consequence per primitive objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    consequences: BTreeMap<String, Consequence>,
}

impl Alternative {
    /// Creates an alternative with no consequences.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            consequences: BTreeMap::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a consequence for an objective.
    pub fn with_consequence(
        mut self,
        objective: impl Into<String>,
        value: impl Into<Consequence>,
    ) -> Self {
        self.consequences.insert(objective.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The consequence this alternative takes on an objective.
    pub fn consequence(&self, objective: &str) -> Option<&Consequence> {
        self.consequences.get(objective)
    }

    /// Sets the consequence for an objective, returning the previous value.
    pub fn set_consequence(
        &mut self,
        objective: impl Into<String>,
        value: Consequence,
    ) -> Option<Consequence> {
        self.consequences.insert(objective.into(), value)
    }

    /// Removes the consequence for an objective.
    pub fn remove_consequence(&mut self, objective: &str) -> Option<Consequence> {
        self.consequences.remove(objective)
    }

    /// All `(objective, consequence)` pairs in objective name order.
    pub fn consequences(&self) -> impl Iterator<Item = (&String, &Consequence)> {
        self.consequences.iter()
    }
}
