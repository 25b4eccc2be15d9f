//! Reconciliation - turning the preference model into row/cell/bar records.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::{Chart, Consequence, Objective, User, WeightMap};

use super::{
    CellData, LabelData, Orientation, ReconcileError, RendererConfig, RendererUpdate, RowData,
    UserScoreData,
};

/// The reconciled view model of a chart for a set of displayed users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledView {
    pub row_data: Vec<RowData>,
    pub maximum_weight_map: WeightMap,
    pub orientation: Orientation,
    /// Upper end of the score axis.
    pub score_scale_max: f64,
    pub displayed_users: Vec<String>,
    pub scaling_enabled: bool,
}

impl ReconciledView {
    /// Finds the row for a primitive objective.
    pub fn row(&self, objective: &str) -> Option<&RowData> {
        self.row_data.iter().find(|r| r.objective == objective)
    }

    /// Alternative names in the order the cells are laid out.
    pub fn alternative_order(&self) -> Vec<&str> {
        self.row_data
            .first()
            .map(|row| row.cells.iter().map(|c| c.alternative.as_str()).collect())
            .unwrap_or_default()
    }

    /// Moves the cell at `from` to `to` in every row.
    ///
    /// # Errors
    ///
    /// - `StaleView` if any row is too short; nothing is moved in that case
    pub fn move_alternative(&mut self, from: usize, to: usize) -> Result<(), ReconcileError> {
        if let Some(row) = self
            .row_data
            .iter()
            .find(|r| from >= r.cells.len() || to >= r.cells.len())
        {
            return Err(ReconcileError::StaleView(format!(
                "row '{}' has {} cells, cannot move {} to {}",
                row.objective,
                row.cells.len(),
                from,
                to
            )));
        }
        for row in &mut self.row_data {
            row.move_cell(from, to);
        }
        Ok(())
    }

    /// Packages the view for a rendering adapter.
    pub fn renderer_update(&self, chart: &Chart, width: f64, height: f64) -> RendererUpdate {
        RendererUpdate {
            row_data: self.row_data.clone(),
            maximum_weight_map: self.maximum_weight_map.clone(),
            label_data: RendererDataUtility::label_data(chart, &self.maximum_weight_map),
            orientation: self.orientation,
            renderer_config: RendererConfig::new(
                self.orientation,
                width,
                height,
                self.score_scale_max,
            ),
        }
    }
}

/// Pure functions producing and refreshing [`ReconciledView`]s.
pub struct RendererDataUtility;

impl RendererDataUtility {
    /// Builds the full view model.
    ///
    /// # Algorithm
    /// - one row per primitive objective, depth-first
    /// - `weight_offset(i) = Σ_{r<i} maximum_weight(r)`
    /// - one cell per alternative, in chart order
    /// - one bar per displayed user, `offset(j) = Σ_{u<j} weight_u × score_u`
    ///
    /// # Errors
    /// - `UnknownUser` if a displayed username is not in the chart
    /// - a model-incomplete error for any missing consequence, weight,
    ///   score function or undefined score
    pub fn reconcile<S: AsRef<str>>(
        chart: &Chart,
        users_to_display: &[S],
        orientation: Orientation,
        scaling_enabled: bool,
    ) -> Result<ReconciledView, ReconcileError> {
        let users = Self::resolve_users(chart, users_to_display)?;
        let maximum_weight_map = Self::maximum_weight_map(chart, &users);

        let mut row_data = Vec::new();
        let mut weight_offset = 0.0;
        for objective in chart.primitive_objectives() {
            let name = objective.name();
            let mut cells = Vec::with_capacity(chart.alternatives().len());
            for alternative in chart.alternatives() {
                let value = alternative.consequence(name).cloned().ok_or_else(|| {
                    ReconcileError::MissingConsequence {
                        alternative: alternative.name().to_string(),
                        objective: name.to_string(),
                    }
                })?;
                let mut user_scores = Vec::with_capacity(users.len());
                let mut offset = 0.0;
                for user in &users {
                    let (weight, score) = Self::lookup(user, name, &value)?;
                    user_scores.push(UserScoreData {
                        username: user.username().to_string(),
                        objective: name.to_string(),
                        value: value.clone(),
                        score,
                        weight,
                        offset,
                    });
                    offset += weight * score;
                }
                cells.push(CellData {
                    alternative: alternative.name().to_string(),
                    value,
                    user_scores,
                });
            }
            row_data.push(RowData {
                objective: name.to_string(),
                weight_offset,
                cells,
            });
            weight_offset += maximum_weight_map.weight(name).unwrap_or(0.0);
        }

        let score_scale_max = Self::score_scale_max(&row_data, &maximum_weight_map, scaling_enabled);
        debug!(
            chart_id = %chart.id(),
            rows = row_data.len(),
            users = users.len(),
            score_scale_max,
            "Reconciled chart view"
        );

        Ok(ReconciledView {
            row_data,
            maximum_weight_map,
            orientation,
            score_scale_max,
            displayed_users: users.iter().map(|u| u.username().to_string()).collect(),
            scaling_enabled,
        })
    }

    /// Refreshes numbers in place without rebuilding rows, cells or bars.
    ///
    /// Scores, weights, offsets, weight offsets, the maximum weight map and
    /// the scale are recomputed from the chart. The view's layout must still
    /// match the chart (same primitives, alternatives and displayed users in
    /// the same order).
    ///
    /// # Errors
    /// - `StaleView` if the layout no longer matches; the view is untouched
    /// - the `reconcile` lookup errors; the view may then be partially
    ///   refreshed and should be rebuilt
    pub fn recompute_offsets(chart: &Chart, view: &mut ReconciledView) -> Result<(), ReconcileError> {
        let users = Self::resolve_users(chart, &view.displayed_users)?;
        Self::check_layout(chart, view)?;

        view.maximum_weight_map = Self::maximum_weight_map(chart, &users);

        let mut weight_offset = 0.0;
        for row in &mut view.row_data {
            row.weight_offset = weight_offset;
            weight_offset += view.maximum_weight_map.weight(&row.objective).unwrap_or(0.0);

            for (cell, alternative) in row.cells.iter_mut().zip(chart.alternatives()) {
                cell.value = alternative
                    .consequence(&row.objective)
                    .cloned()
                    .ok_or_else(|| ReconcileError::MissingConsequence {
                        alternative: alternative.name().to_string(),
                        objective: row.objective.clone(),
                    })?;
                let mut offset = 0.0;
                for (bar, user) in cell.user_scores.iter_mut().zip(&users) {
                    let (weight, score) = Self::lookup(user, &row.objective, &cell.value)?;
                    bar.value = cell.value.clone();
                    bar.weight = weight;
                    bar.score = score;
                    bar.offset = offset;
                    offset += weight * score;
                }
            }
        }

        view.score_scale_max =
            Self::score_scale_max(&view.row_data, &view.maximum_weight_map, view.scaling_enabled);
        debug!(chart_id = %chart.id(), "Recomputed view offsets");
        Ok(())
    }

    /// Per primitive objective, the largest weight any displayed user gives it.
    ///
    /// # Edge Cases
    /// - A single user: that user's weight map as-is
    /// - No user weights an objective: the objective is absent from the result
    pub fn maximum_weight_map(chart: &Chart, users: &[&User]) -> WeightMap {
        if let [user] = users {
            return user.weight_map().clone();
        }
        let mut maximum = WeightMap::new();
        for objective in chart.primitive_objectives() {
            let best = users
                .iter()
                .filter_map(|u| u.weight_map().weight(objective.name()))
                .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))));
            if let Some(weight) = best {
                // weights read from valid maps are finite and non-negative
                let _ = maximum.set_weight(objective.name(), weight);
            }
        }
        maximum
    }

    /// Builds the label tree for the objective hierarchy.
    pub fn label_data(chart: &Chart, maximum_weight_map: &WeightMap) -> Vec<LabelData> {
        chart
            .root_objectives()
            .iter()
            .map(|root| Self::label_for(root, 0, maximum_weight_map))
            .collect()
    }

    fn label_for(objective: &Objective, depth: usize, weights: &WeightMap) -> LabelData {
        let sub_label_data: Vec<LabelData> = match objective {
            Objective::Abstract(a) => a
                .children()
                .iter()
                .map(|child| Self::label_for(child, depth + 1, weights))
                .collect(),
            Objective::Primitive(_) => Vec::new(),
        };
        let weight = match objective {
            Objective::Primitive(p) => weights.weight(p.name()).unwrap_or(0.0),
            Objective::Abstract(_) => sub_label_data.iter().map(|l| l.weight).sum(),
        };
        LabelData {
            objective: objective.name().to_string(),
            weight,
            depth,
            depth_of_children: objective.depth_of_children(),
            sub_label_data,
        }
    }

    /// Upper end of the score axis.
    ///
    /// With scaling enabled this is the tallest alternative column;
    /// otherwise the total of the maximum weight map. Zero falls back to 1.
    pub fn score_scale_max(rows: &[RowData], maximum_weight_map: &WeightMap, scaling_enabled: bool) -> f64 {
        let max = if scaling_enabled {
            let columns = rows.first().map_or(0, |r| r.cells.len());
            (0..columns)
                .map(|j| {
                    rows.iter()
                        .filter_map(|r| r.cells.get(j))
                        .map(CellData::stack_height)
                        .sum::<f64>()
                })
                .fold(0.0, f64::max)
        } else {
            maximum_weight_map.total()
        };
        if max > 0.0 && max.is_finite() {
            max
        } else {
            1.0
        }
    }

    fn resolve_users<'a, S: AsRef<str>>(
        chart: &'a Chart,
        usernames: &[S],
    ) -> Result<Vec<&'a User>, ReconcileError> {
        usernames
            .iter()
            .map(|name| {
                chart
                    .user(name.as_ref())
                    .ok_or_else(|| ReconcileError::UnknownUser(name.as_ref().to_string()))
            })
            .collect()
    }

    fn lookup(
        user: &User,
        objective: &str,
        value: &Consequence,
    ) -> Result<(f64, f64), ReconcileError> {
        let weight = user.weight_map().weight(objective).ok_or_else(|| {
            ReconcileError::MissingWeight {
                user: user.username().to_string(),
                objective: objective.to_string(),
            }
        })?;
        let function = user.score_functions().get(objective).ok_or_else(|| {
            ReconcileError::MissingScoreFunction {
                user: user.username().to_string(),
                objective: objective.to_string(),
            }
        })?;
        let score = function
            .score(value)
            .ok_or_else(|| ReconcileError::UndefinedScore {
                user: user.username().to_string(),
                objective: objective.to_string(),
                value: value.to_string(),
            })?;
        Ok((weight, score))
    }

    fn check_layout(chart: &Chart, view: &ReconciledView) -> Result<(), ReconcileError> {
        let primitives = chart.primitive_objectives();
        if primitives.len() != view.row_data.len() {
            return Err(ReconcileError::StaleView(format!(
                "{} rows for {} primitive objectives",
                view.row_data.len(),
                primitives.len()
            )));
        }
        for (row, objective) in view.row_data.iter().zip(&primitives) {
            if row.objective != objective.name() {
                return Err(ReconcileError::StaleView(format!(
                    "row '{}' where '{}' was expected",
                    row.objective,
                    objective.name()
                )));
            }
            let names_match = row.cells.len() == chart.alternatives().len()
                && row
                    .cells
                    .iter()
                    .zip(chart.alternatives())
                    .all(|(c, a)| c.alternative == a.name());
            if !names_match {
                return Err(ReconcileError::StaleView(format!(
                    "cells of row '{}' do not match the alternatives",
                    row.objective
                )));
            }
            let bars_match = row.cells.iter().all(|c| {
                c.user_scores.len() == view.displayed_users.len()
                    && c.user_scores
                        .iter()
                        .zip(&view.displayed_users)
                        .all(|(b, u)| b.username == *u)
            });
            if !bars_match {
                return Err(ReconcileError::StaleView(format!(
                    "bars of row '{}' do not match the displayed users",
                    row.objective
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        AbstractObjective, Alternative, ChartType, Domain, PrimitiveObjective, ScoreFunction,
        ScoreFunctionMap,
    };

    fn user(name: &str, weights: &[(&str, f64)]) -> User {
        let mut functions = ScoreFunctionMap::new();
        functions.set("rate", ScoreFunction::continuous([(0.0, 1.0), (200.0, 0.0)]).unwrap());
        functions.set(
            "area",
            ScoreFunction::discrete([("suburb", 0.0), ("downtown", 1.0)]).unwrap(),
        );
        User::new(name)
            .with_weight_map(WeightMap::from_pairs(weights.iter().copied()).unwrap())
            .with_score_functions(functions)
    }

    fn hotel_chart() -> Chart {
        let mut chart = Chart::new("Hotels", "aaron", ChartType::Group);
        let location = AbstractObjective::new(
            "location",
            vec![PrimitiveObjective::new("area", Domain::categorical(["suburb", "downtown"])).into()],
        )
        .unwrap();
        chart
            .set_root_objectives(vec![
                PrimitiveObjective::new("rate", Domain::continuous(0.0, 200.0)).into(),
                location.into(),
            ])
            .unwrap();
        chart
            .add_alternative(
                Alternative::new("Hyatt")
                    .with_consequence("rate", 150.0)
                    .with_consequence("area", "downtown"),
            )
            .unwrap();
        chart
            .add_alternative(
                Alternative::new("Motel")
                    .with_consequence("rate", 50.0)
                    .with_consequence("area", "suburb"),
            )
            .unwrap();
        chart.add_user(user("aaron", &[("rate", 0.3), ("area", 0.7)])).unwrap();
        chart.add_user(user("beth", &[("rate", 0.6), ("area", 0.4)])).unwrap();
        chart
    }

    #[test]
    fn second_row_weight_offset_is_first_weight() {
        let chart = hotel_chart();
        let view =
            RendererDataUtility::reconcile(&chart, &["aaron"], Orientation::Vertical, false).unwrap();

        assert_eq!(view.row_data.len(), 2);
        assert_eq!(view.row_data[0].objective, "rate");
        assert_eq!(view.row_data[0].weight_offset, 0.0);
        assert_eq!(view.row_data[1].weight_offset, 0.3);
    }

    #[test]
    fn user_offsets_stack_weighted_scores_in_display_order() {
        let chart = hotel_chart();
        let view = RendererDataUtility::reconcile(&chart, &["aaron", "beth"], Orientation::Vertical, false)
            .unwrap();

        // Hyatt on rate: score 0.25 for both users
        let cell = &view.row_data[0].cells[0];
        assert_eq!(cell.alternative, "Hyatt");
        assert_eq!(cell.user_scores[0].username, "aaron");
        assert_eq!(cell.user_scores[0].offset, 0.0);
        assert!((cell.user_scores[1].offset - 0.3 * 0.25).abs() < 1e-12);
        assert!((cell.stack_height() - (0.3 * 0.25 + 0.6 * 0.25)).abs() < 1e-12);
    }

    #[test]
    fn maximum_weight_map_takes_largest_weight_per_objective() {
        let chart = hotel_chart();
        let view = RendererDataUtility::reconcile(&chart, &["aaron", "beth"], Orientation::Vertical, false)
            .unwrap();

        assert_eq!(view.maximum_weight_map.weight("rate"), Some(0.6));
        assert_eq!(view.maximum_weight_map.weight("area"), Some(0.7));
        assert_eq!(view.row_data[1].weight_offset, 0.6);
        assert!((view.score_scale_max - 1.3).abs() < 1e-12);
    }

    #[test]
    fn scaling_uses_tallest_alternative_column() {
        let chart = hotel_chart();
        let view =
            RendererDataUtility::reconcile(&chart, &["aaron"], Orientation::Vertical, true).unwrap();

        // Hyatt: 0.3 × 0.25 + 0.7 × 1.0; Motel: 0.3 × 0.75 + 0.7 × 0.0
        assert!((view.score_scale_max - 0.775).abs() < 1e-12);
    }

    #[test]
    fn empty_display_falls_back_to_unit_scale() {
        let chart = hotel_chart();
        let view = RendererDataUtility::reconcile::<&str>(&chart, &[], Orientation::Horizontal, true)
            .unwrap();
        assert_eq!(view.score_scale_max, 1.0);
        assert!(view.row_data[0].cells[0].user_scores.is_empty());
        assert_eq!(view.row_data[1].weight_offset, 0.0);
    }

    #[test]
    fn unknown_user_is_rejected() {
        let chart = hotel_chart();
        let err = RendererDataUtility::reconcile(&chart, &["ghost"], Orientation::Vertical, false)
            .unwrap_err();
        assert_eq!(err, ReconcileError::UnknownUser("ghost".into()));
    }

    #[test]
    fn missing_weight_fails_fast() {
        let mut chart = hotel_chart();
        chart.user_mut("beth").unwrap().weight_map_mut().remove_weight("area");

        let err = RendererDataUtility::reconcile(&chart, &["aaron", "beth"], Orientation::Vertical, false)
            .unwrap_err();

        assert!(err.is_model_incomplete());
        assert!(matches!(err, ReconcileError::MissingWeight { ref user, .. } if user == "beth"));
    }

    #[test]
    fn missing_consequence_fails_fast() {
        let mut chart = hotel_chart();
        chart.alternative_mut("Motel").unwrap().remove_consequence("rate");

        let err = RendererDataUtility::reconcile(&chart, &["aaron"], Orientation::Vertical, false)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::MissingConsequence { .. }));
    }

    #[test]
    fn undefined_score_fails_fast() {
        let mut chart = hotel_chart();
        chart
            .user_mut("aaron")
            .unwrap()
            .score_functions_mut()
            .set("rate", ScoreFunction::continuous([(100.0, 0.0), (200.0, 1.0)]).unwrap());

        let err = RendererDataUtility::reconcile(&chart, &["aaron"], Orientation::Vertical, false)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::UndefinedScore { .. }));
    }

    #[test]
    fn recompute_offsets_matches_full_rebuild() {
        let mut chart = hotel_chart();
        let mut view = RendererDataUtility::reconcile(&chart, &["aaron", "beth"], Orientation::Vertical, true)
            .unwrap();

        let weights = WeightMap::from_pairs([("rate", 0.9), ("area", 0.1)]).unwrap();
        chart.user_mut("aaron").unwrap().set_weight_map(weights);
        RendererDataUtility::recompute_offsets(&chart, &mut view).unwrap();

        let rebuilt = RendererDataUtility::reconcile(&chart, &["aaron", "beth"], Orientation::Vertical, true)
            .unwrap();
        assert_eq!(view, rebuilt);
    }

    #[test]
    fn recompute_offsets_rejects_reordered_chart() {
        let mut chart = hotel_chart();
        let mut view =
            RendererDataUtility::reconcile(&chart, &["aaron"], Orientation::Vertical, false).unwrap();
        chart.move_alternative(0, 1).unwrap();

        let err = RendererDataUtility::recompute_offsets(&chart, &mut view).unwrap_err();
        assert!(matches!(err, ReconcileError::StaleView(_)));
    }

    #[test]
    fn move_alternative_splices_every_row() {
        let chart = hotel_chart();
        let mut view =
            RendererDataUtility::reconcile(&chart, &["aaron"], Orientation::Vertical, false).unwrap();

        view.move_alternative(0, 1).unwrap();

        assert_eq!(view.alternative_order(), vec!["Motel", "Hyatt"]);
        assert_eq!(view.row_data[1].cells[1].alternative, "Hyatt");
        assert!(view.move_alternative(0, 2).is_err());
    }

    #[test]
    fn label_data_sums_weights_up_the_tree() {
        let chart = hotel_chart();
        let weights = WeightMap::from_pairs([("rate", 0.3), ("area", 0.7)]).unwrap();

        let labels = RendererDataUtility::label_data(&chart, &weights);

        assert_eq!(labels.len(), 2);
        let location = &labels[1];
        assert_eq!(location.objective, "location");
        assert_eq!(location.weight, 0.7);
        assert_eq!(location.depth, 0);
        assert_eq!(location.depth_of_children, 1);
        assert_eq!(location.sub_label_data[0].depth, 1);
        assert!(location.find("area").is_some_and(LabelData::is_leaf));
    }

    #[test]
    fn reconciling_twice_is_deterministic() {
        let chart = hotel_chart();
        let a = RendererDataUtility::reconcile(&chart, &["beth", "aaron"], Orientation::Vertical, true)
            .unwrap();
        let b = RendererDataUtility::reconcile(&chart, &["beth", "aaron"], Orientation::Vertical, true)
            .unwrap();
        assert_eq!(a, b);
    }
}
