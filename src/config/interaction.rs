//! Interaction configuration

use serde::Deserialize;

use crate::domain::sorting::SortMode;

/// Which gestures the chart accepts.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct InteractionConfig {
    /// How alternatives may be reordered (`none`, `objective`, `manual`)
    #[serde(default)]
    pub sort_mode: SortMode,

    /// Users may drag weights
    #[serde(default)]
    pub adjust_weights: bool,

    /// Users may edit their score functions
    #[serde(default)]
    pub adjust_score_functions: bool,
}

impl InteractionConfig {
    /// Alternatives can be dragged into place.
    pub fn reorder_by_drag(&self) -> bool {
        self.sort_mode == SortMode::Manual
    }

    /// Clicking an objective label sorts by it.
    pub fn sort_by_objective(&self) -> bool {
        self.sort_mode == SortMode::Objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_is_enabled_only_in_manual_mode() {
        let mut config = InteractionConfig::default();
        assert!(!config.reorder_by_drag());

        config.sort_mode = SortMode::Manual;
        assert!(config.reorder_by_drag());
        assert!(!config.sort_by_objective());
    }
}
