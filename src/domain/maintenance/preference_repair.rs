//! Preference repair - realigns alternatives and user preferences after the
//! objective structure changes.

use tracing::{debug, info};

use crate::domain::model::{
    Chart, Domain, ModelError, PrimitiveObjective, ScoreFunction, User,
};

/// Brings chart content back in line with the chart's primitive objectives.
pub struct PreferenceRepair;

impl PreferenceRepair {
    pub const BEST_WORST_OUTCOME_CHANGED: &'static str =
        "The best/worst outcomes on some Objectives have changed. You may want to revisit your weights.";
    pub const SCORE_FUNCTIONS_RESET: &'static str =
        "Your score functions for the following Objectives have been reset to default: ";
    pub const NEW_SCORE_FUNCTION_ELEMENTS: &'static str =
        "New elements have been added to your score functions for the following Objectives: ";
    pub const NEW_OBJECTIVE_WEIGHTS: &'static str =
        "The following Objectives have been added to your chart with weight 0: ";

    /// Drops consequences the objectives no longer allow.
    ///
    /// Consequences for objectives that are gone, or outside their
    /// objective's domain, are removed. The rest are coerced to the
    /// domain's representation, so `"150"` becomes `150` on a continuous
    /// domain. Returns how many consequences were removed.
    pub fn clean_up_alternatives(chart: &mut Chart) -> usize {
        let domains: Vec<(String, Domain)> = chart
            .primitive_objectives()
            .into_iter()
            .map(|p| (p.name().to_string(), p.domain().clone()))
            .collect();

        let mut removed = 0;
        for alternative in chart.alternatives_mut() {
            let stale: Vec<String> = alternative
                .consequences()
                .filter(|(objective, value)| {
                    match domains.iter().find(|(name, _)| name == *objective) {
                        Some((_, domain)) => !domain.contains(value),
                        None => true,
                    }
                })
                .map(|(objective, _)| objective.clone())
                .collect();
            for objective in &stale {
                alternative.remove_consequence(objective);
            }
            removed += stale.len();

            for (name, domain) in &domains {
                let normalized = alternative
                    .consequence(name)
                    .and_then(|value| domain.normalize(value));
                if let Some(value) = normalized {
                    alternative.set_consequence(name.clone(), value);
                }
            }
        }

        if removed > 0 {
            info!(chart_id = %chart.id(), removed, "Removed invalid consequences");
        }
        removed
    }

    /// Removes preferences for objectives that are gone and resets score
    /// functions that no longer fit, then completes the user's preferences.
    ///
    /// # Algorithm
    ///
    /// 1. Drop score functions and weights for missing objectives. A weight
    ///    map that summed to 1 is renormalized afterwards.
    /// 2. Reset a score function to its objective's default when its kind
    ///    does not fit the domain, or when either side is continuous and
    ///    the element sets differ.
    /// 3. Note when any best or worst element moved.
    /// 4. Run [`PreferenceRepair::complete_preferences`].
    ///
    /// Returns user-facing warnings. The best/worst warning is only given
    /// when the user has already set some weight.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the chart has no such user
    pub fn clean_up_user_preferences(
        chart: &mut Chart,
        username: &str,
    ) -> Result<Vec<String>, ModelError> {
        let primitives = owned_primitives(chart);
        let user = chart.require_user_mut(username)?;
        let mut warnings = Vec::new();

        remove_stale_preferences(&primitives, user);

        let mut reset = Vec::new();
        let mut best_worst_changed = false;
        for objective in &primitives {
            let default = objective.default_score_function();
            let Some(function) = user.score_functions_mut().get_mut(objective.name()) else {
                continue;
            };
            let before = function.clone();
            let continuous = objective.domain().is_continuous()
                || matches!(function, ScoreFunction::Continuous(_));
            if !function.fits(objective.domain())
                || (continuous && function.elements() != default.elements())
            {
                *function = default.clone();
                reset.push(objective.name());
            }
            if before.best_element() != function.best_element()
                || before.worst_element() != function.worst_element()
            {
                best_worst_changed = true;
            }
        }

        if !reset.is_empty() {
            warnings.push(format!("{}{}", Self::SCORE_FUNCTIONS_RESET, reset.join(", ")));
        }
        if best_worst_changed && user.weight_map().total() != 0.0 {
            warnings.push(Self::BEST_WORST_OUTCOME_CHANGED.to_string());
        }
        warnings.extend(complete_user(&primitives, user));

        debug!(username, warnings = warnings.len(), "Cleaned up user preferences");
        Ok(warnings)
    }

    /// Fills in whatever the user's preferences are missing.
    ///
    /// Every primitive objective gets a score function: a copy of the
    /// default when none exists or the default is immutable, otherwise the
    /// existing function gains the default's missing elements and takes its
    /// element order. Missing weights are added as 0, but only when the
    /// weight map already sums to 1.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the chart has no such user
    pub fn complete_preferences(chart: &mut Chart, username: &str) -> Result<Vec<String>, ModelError> {
        let primitives = owned_primitives(chart);
        let user = chart.require_user_mut(username)?;
        Ok(complete_user(&primitives, user))
    }
}

fn owned_primitives(chart: &Chart) -> Vec<PrimitiveObjective> {
    chart.primitive_objectives().into_iter().cloned().collect()
}

fn remove_stale_preferences(primitives: &[PrimitiveObjective], user: &mut User) {
    let known = |name: &str| primitives.iter().any(|p| p.name() == name);

    let stale: Vec<String> = user
        .score_functions()
        .objectives()
        .filter(|o| !known(o))
        .cloned()
        .collect();
    for objective in &stale {
        user.score_functions_mut().remove(objective);
    }

    let renormalize = user.weight_map().is_complete(primitives.len());
    let stale: Vec<String> = user
        .weight_map()
        .objectives()
        .filter(|o| !known(o))
        .cloned()
        .collect();
    let weights = user.weight_map_mut();
    for objective in &stale {
        weights.remove_weight(objective);
    }
    if renormalize {
        weights.normalize();
    }
}

fn complete_user(primitives: &[PrimitiveObjective], user: &mut User) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut completed = Vec::new();
    for objective in primitives {
        let default = objective.default_score_function();
        let functions = user.score_functions_mut();
        if default.is_immutable() || functions.get(objective.name()).is_none() {
            functions.set(objective.name(), default.clone());
        } else if let Some(function) = functions.get_mut(objective.name()) {
            if function.align_elements(default) {
                completed.push(objective.name());
            }
        }
    }
    if !completed.is_empty() {
        warnings.push(format!(
            "{}{}",
            PreferenceRepair::NEW_SCORE_FUNCTION_ELEMENTS,
            completed.join(", ")
        ));
    }

    if user.weight_map().is_complete(primitives.len()) {
        let mut added = Vec::new();
        for objective in primitives {
            if user.weight_map().weight(objective.name()).is_none() {
                // zero is always a valid weight
                let _ = user.weight_map_mut().set_weight(objective.name(), 0.0);
                added.push(objective.name());
            }
        }
        if !added.is_empty() {
            warnings.push(format!(
                "{}{}",
                PreferenceRepair::NEW_OBJECTIVE_WEIGHTS,
                added.join(", ")
            ));
        }
    }
    warnings
}
