//! Users - one participant's preferences over the chart.

use serde::{Deserialize, Serialize};

use super::{ScoreFunctionMap, WeightMap};

/// A participant with their own weights and score functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default)]
    weight_map: WeightMap,
    #[serde(default)]
    score_functions: ScoreFunctionMap,
}

impl User {
    /// Creates a user with empty preferences.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            color: None,
            weight_map: WeightMap::new(),
            score_functions: ScoreFunctionMap::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_weight_map(mut self, weight_map: WeightMap) -> Self {
        self.weight_map = weight_map;
        self
    }

    pub fn with_score_functions(mut self, score_functions: ScoreFunctionMap) -> Self {
        self.score_functions = score_functions;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn weight_map(&self) -> &WeightMap {
        &self.weight_map
    }

    pub fn weight_map_mut(&mut self) -> &mut WeightMap {
        &mut self.weight_map
    }

    /// Replaces the weight map wholesale.
    pub fn set_weight_map(&mut self, weight_map: WeightMap) {
        self.weight_map = weight_map;
    }

    pub fn score_functions(&self) -> &ScoreFunctionMap {
        &self.score_functions
    }

    pub fn score_functions_mut(&mut self) -> &mut ScoreFunctionMap {
        &mut self.score_functions
    }
}
