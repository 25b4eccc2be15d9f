//! View-model records produced by reconciliation.

use serde::{Deserialize, Serialize};

use crate::domain::model::Consequence;

/// One displayed user's contribution to a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScoreData {
    pub username: String,
    pub objective: String,
    pub value: Consequence,
    pub score: f64,
    pub weight: f64,
    /// Sum of weighted scores of the users stacked before this one.
    pub offset: f64,
}

impl UserScoreData {
    /// `weight × score`, the bar height.
    pub fn weighted_score(&self) -> f64 {
        self.weight * self.score
    }

    /// Where this user's bar ends in the stack.
    pub fn top(&self) -> f64 {
        self.offset + self.weighted_score()
    }
}

/// One alternative's entry in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub alternative: String,
    pub value: Consequence,
    pub user_scores: Vec<UserScoreData>,
}

impl CellData {
    /// Full height of the stacked bars in this cell.
    pub fn stack_height(&self) -> f64 {
        self.user_scores.iter().map(UserScoreData::weighted_score).sum()
    }
}

/// One displayed primitive objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    pub objective: String,
    /// Sum of the maximum weights of the rows above.
    pub weight_offset: f64,
    pub cells: Vec<CellData>,
}

impl RowData {
    /// Moves the cell at `from` so it ends up at `to`.
    ///
    /// Indices are assumed valid; callers check them against the chart first.
    pub(crate) fn move_cell(&mut self, from: usize, to: usize) {
        let cell = self.cells.remove(from);
        self.cells.insert(to, cell);
    }
}
