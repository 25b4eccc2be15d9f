//! Per-alternative total scores, as shown in the summary chart.

use serde::{Deserialize, Serialize};

use super::{CellData, ReconciledView};

/// One user's total for one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTotal {
    pub username: String,
    /// `Σ rows weight × score`.
    pub total: f64,
    /// `total` divided by the user's weight total over the displayed rows.
    pub normalized: f64,
}

/// All displayed users' totals for one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeTotals {
    pub alternative: String,
    pub user_totals: Vec<UserTotal>,
}

/// Summary scores derived from a reconciled view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreTotals {
    pub alternatives: Vec<AlternativeTotals>,
}

impl ScoreTotals {
    /// Sums each user's weighted scores per alternative.
    ///
    /// # Edge Cases
    /// - No rows: every alternative list is empty
    /// - A user whose displayed weights sum to 0 gets a normalized total of 0
    pub fn compute(view: &ReconciledView) -> Self {
        let Some(first_row) = view.row_data.first() else {
            return Self::default();
        };

        let weight_totals: Vec<f64> = (0..view.displayed_users.len())
            .map(|u| {
                view.row_data
                    .iter()
                    .filter_map(|r| r.cells.first())
                    .filter_map(|c| c.user_scores.get(u))
                    .map(|b| b.weight)
                    .sum()
            })
            .collect();

        let alternatives = first_row
            .cells
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                let user_totals = view
                    .displayed_users
                    .iter()
                    .enumerate()
                    .map(|(u, username)| {
                        let total: f64 = view
                            .row_data
                            .iter()
                            .filter_map(|r| r.cells.get(j))
                            .filter_map(|c| c.user_scores.get(u))
                            .map(|b| b.weighted_score())
                            .sum();
                        let weight_total = weight_totals[u];
                        UserTotal {
                            username: username.clone(),
                            total,
                            normalized: if weight_total > 0.0 { total / weight_total } else { 0.0 },
                        }
                    })
                    .collect();
                AlternativeTotals {
                    alternative: cell.alternative.clone(),
                    user_totals,
                }
            })
            .collect();

        Self { alternatives }
    }

    /// A user's total for an alternative.
    pub fn total(&self, alternative: &str, username: &str) -> Option<f64> {
        self.alternatives
            .iter()
            .find(|a| a.alternative == alternative)?
            .user_totals
            .iter()
            .find(|t| t.username == username)
            .map(|t| t.total)
    }

    /// The alternative a user scores highest; the first one on ties.
    pub fn best_alternative(&self, username: &str) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for alternative in &self.alternatives {
            let Some(t) = alternative.user_totals.iter().find(|t| t.username == username) else {
                continue;
            };
            if best.map_or(true, |(_, b)| t.total > b) {
                best = Some((&alternative.alternative, t.total));
            }
        }
        best.map(|(name, _)| name)
    }

    /// Mean weighted score of a cell across its displayed users.
    pub fn average_cell_score(cell: &CellData) -> f64 {
        if cell.user_scores.is_empty() {
            return 0.0;
        }
        cell.stack_height() / cell.user_scores.len() as f64
    }
}
