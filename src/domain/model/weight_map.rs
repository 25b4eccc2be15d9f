//! Weight maps - relative importance of primitive objectives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ModelError;

/// Tolerance factor per objective used when checking that weights sum to one.
pub const WEIGHT_TOLERANCE_PER_OBJECTIVE: f64 = 1e-8;

/// Mapping from primitive objective name to a non-negative weight.
///
/// Partial maps are legal while a user is still editing; a map is
/// complete once its weights sum to 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMap(BTreeMap<String, f64>);

impl WeightMap {
    /// Creates an empty weight map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a weight map from pairs.
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, ModelError> {
        let mut map = Self::new();
        for (objective, weight) in pairs {
            map.set_weight(objective, weight)?;
        }
        Ok(map)
    }

    /// Equal weights over the given objectives.
    pub fn uniform<S: Into<String>>(objectives: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = objectives.into_iter().map(Into::into).collect();
        let weight = if names.is_empty() {
            0.0
        } else {
            1.0 / names.len() as f64
        };
        Self(names.into_iter().map(|n| (n, weight)).collect())
    }

    /// Returns the weight for an objective.
    pub fn weight(&self, objective: &str) -> Option<f64> {
        self.0.get(objective).copied()
    }

    /// Sets the weight for an objective.
    pub fn set_weight(&mut self, objective: impl Into<String>, weight: f64) -> Result<(), ModelError> {
        let objective = objective.into();
        if !weight.is_finite() || weight < 0.0 {
            return Err(ModelError::InvalidWeight { objective, weight });
        }
        self.0.insert(objective, weight);
        Ok(())
    }

    /// Removes an objective's weight.
    pub fn remove_weight(&mut self, objective: &str) -> Option<f64> {
        self.0.remove(objective)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Returns true if the weights sum to 1 within `1e-8 × objective_count`.
    pub fn is_complete(&self, objective_count: usize) -> bool {
        let error = WEIGHT_TOLERANCE_PER_OBJECTIVE * objective_count.max(1) as f64;
        (self.total() - 1.0).abs() < error
    }

    /// Rescales all weights so they sum to 1. No-op on a zero total.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        for weight in self.0.values_mut() {
            *weight /= total;
        }
    }

    /// Objective names with a weight.
    pub fn objectives(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterates `(objective, weight)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    /// Number of weighted objectives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no weight is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
