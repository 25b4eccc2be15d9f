//! Label tree shown beside the chart.

use serde::{Deserialize, Serialize};

/// One objective's label, with the summed weight of everything beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelData {
    pub objective: String,
    /// Sum of the maximum weights of the primitive objectives below (or at) this label.
    pub weight: f64,
    /// Distance from the root (roots are at depth 0).
    pub depth: usize,
    /// Height of the subtree below this label (0 for primitives).
    pub depth_of_children: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_label_data: Vec<LabelData>,
}

impl LabelData {
    /// Returns true for a primitive objective's label.
    pub fn is_leaf(&self) -> bool {
        self.sub_label_data.is_empty()
    }

    /// Finds a label by objective name in this subtree.
    pub fn find(&self, objective: &str) -> Option<&LabelData> {
        if self.objective == objective {
            return Some(self);
        }
        self.sub_label_data.iter().find_map(|l| l.find(objective))
    }
}
