//! Automatic alternative orderings.

use std::cmp::Ordering;

use crate::domain::model::Alternative;
use crate::domain::rendering::ReconciledView;

use super::ReorderError;

/// Alternatives sorted by name.
pub fn alphabetical(alternatives: &[Alternative]) -> Vec<Alternative> {
    let mut sorted = alternatives.to_vec();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));
    sorted
}

/// Alternatives put back into `original` order.
///
/// Alternatives missing from `original` (added since) follow in their
/// current relative order.
pub fn restore_order(alternatives: &[Alternative], original: &[String]) -> Vec<Alternative> {
    let mut restored: Vec<Alternative> = original
        .iter()
        .filter_map(|name| alternatives.iter().find(|a| a.name() == name))
        .cloned()
        .collect();
    restored.extend(
        alternatives
            .iter()
            .filter(|a| !original.iter().any(|n| n == a.name()))
            .cloned(),
    );
    restored
}

/// Cell indices ordered by descending score on the given objectives.
///
/// With one objective the key is the raw score; with several it is the
/// weighted sum. Either way it is summed over the displayed users. Ties
/// keep their current relative order.
///
/// # Errors
///
/// - `ObjectiveNotFound` if an objective has no row in the view
pub fn by_objective_scores(
    view: &ReconciledView,
    objectives: &[&str],
) -> Result<Vec<usize>, ReorderError> {
    let rows = objectives
        .iter()
        .map(|name| {
            view.row(name)
                .ok_or_else(|| ReorderError::ObjectiveNotFound(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let weighted = rows.len() > 1;
    let count = view.row_data.first().map_or(0, |r| r.cells.len());

    let keys: Vec<f64> = (0..count)
        .map(|j| {
            rows.iter()
                .filter_map(|row| row.cells.get(j))
                .flat_map(|cell| cell.user_scores.iter())
                .map(|bar| if weighted { bar.weighted_score() } else { bar.score })
                .sum()
        })
        .collect();

    let mut indices: Vec<usize> = (0..count).collect();
    indices.sort_by(|a, b| keys[*b].partial_cmp(&keys[*a]).unwrap_or(Ordering::Equal));
    Ok(indices)
}
