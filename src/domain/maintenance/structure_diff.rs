//! Structure diff - replaces a chart's structure and lists what changed.

use std::collections::BTreeSet;

use tracing::info;

use crate::domain::model::{Alternative, Chart, ModelError, Objective};

/// Applies a new chart structure onto an existing chart.
///
/// Details, objectives and alternatives are taken from the new structure;
/// users and their preferences are left alone (see `PreferenceRepair`).
pub struct StructureDiff;

impl StructureDiff {
    pub const CREATOR_CHANGED: &'static str = "The ValueChart owner has been changed to: ";
    pub const DESCRIPTION_CHANGED: &'static str =
        "The ValueChart's description has been changed to: ";
    pub const NAME_CHANGED: &'static str = "The ValueChart's name has been changed to: ";
    pub const TYPE_CHANGED: &'static str = "The type of the ValueChart has been changed to: ";

    pub const ALTERNATIVE_ADDED: &'static str =
        "A new alternative has been added to the ValueChart: ";
    pub const ALTERNATIVE_REMOVED: &'static str =
        "An alternative has been removed from the ValueChart: ";
    pub const ALTERNATIVE_CHANGED: &'static str = "An existing alternative has been modified: ";
    pub const ALTERNATIVES_REORDERED: &'static str = "The alternatives have been reordered.";

    pub const OBJECTIVE_ADDED: &'static str = "A new objective has been added to the ValueChart: ";
    pub const OBJECTIVE_REMOVED: &'static str =
        "An objective has been removed from the ValueChart: ";
    pub const OBJECTIVE_CHANGED: &'static str = "An existing objective has been modified: ";
    pub const OBJECTIVES_REORDERED: &'static str = "The objectives have been reordered.";

    /// Copies `new`'s structure into `old` and returns one message per change.
    ///
    /// # Algorithm
    ///
    /// 1. Basic details (creator, description, name, type) are compared
    ///    field by field.
    /// 2. Objectives are flattened pre-order. Each new objective that has no
    ///    equal in the old list is "added" if its name is new, otherwise
    ///    "changed". Old names missing from the new list are "removed".
    /// 3. Alternatives are handled the same way.
    ///
    /// When a list has no additions, changes or removals but its names
    /// appear in a different order, a single "reordered" message is emitted.
    ///
    /// # Edge Cases
    ///
    /// - An abstract objective counts as changed only when its own fields
    ///   or the names of its direct children change
    /// - Consequences on objectives that only one side has are ignored
    ///   when comparing alternatives
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the new objective tree reuses a name
    pub fn update_chart(old: &mut Chart, new: &Chart) -> Result<Vec<String>, ModelError> {
        let mut changes = Self::update_basic_details(old, new);
        changes.extend(Self::update_objectives(old, new)?);
        changes.extend(Self::update_alternatives(old, new)?);

        info!(chart_id = %old.id(), changes = changes.len(), "Updated chart structure");
        Ok(changes)
    }

    fn update_basic_details(old: &mut Chart, new: &Chart) -> Vec<String> {
        let mut changes = Vec::new();
        if old.creator() != new.creator() {
            old.set_creator(new.creator());
            changes.push(format!("{}{}", Self::CREATOR_CHANGED, new.creator()));
        }
        if old.description() != new.description() {
            old.set_description(new.description());
            changes.push(format!("{}{}", Self::DESCRIPTION_CHANGED, new.description()));
        }
        if old.name() != new.name() {
            old.set_name(new.name());
            changes.push(format!("{}{}", Self::NAME_CHANGED, new.name()));
        }
        if old.chart_type() != new.chart_type() {
            old.set_chart_type(new.chart_type());
            changes.push(format!("{}{}", Self::TYPE_CHANGED, new.chart_type()));
        }
        changes
    }

    fn update_objectives(old: &mut Chart, new: &Chart) -> Result<Vec<String>, ModelError> {
        let old_objectives = flatten(old.root_objectives());
        let new_objectives = flatten(new.root_objectives());

        let changes = diff(
            &old_objectives,
            &new_objectives,
            |o| o.name(),
            same_objective,
            [
                Self::OBJECTIVE_ADDED,
                Self::OBJECTIVE_CHANGED,
                Self::OBJECTIVE_REMOVED,
                Self::OBJECTIVES_REORDERED,
            ],
        );
        old.set_root_objectives(new.root_objectives().to_vec())?;
        Ok(changes)
    }

    fn update_alternatives(old: &mut Chart, new: &Chart) -> Result<Vec<String>, ModelError> {
        let old_alternatives: Vec<&Alternative> = old.alternatives().iter().collect();
        let new_alternatives: Vec<&Alternative> = new.alternatives().iter().collect();

        let changes = diff(
            &old_alternatives,
            &new_alternatives,
            |a| a.name(),
            same_alternative,
            [
                Self::ALTERNATIVE_ADDED,
                Self::ALTERNATIVE_CHANGED,
                Self::ALTERNATIVE_REMOVED,
                Self::ALTERNATIVES_REORDERED,
            ],
        );
        old.set_alternatives(new.alternatives().to_vec())?;
        Ok(changes)
    }
}

fn flatten(roots: &[Objective]) -> Vec<&Objective> {
    roots.iter().flat_map(|root| root.descendants()).collect()
}

/// `messages` is `[added, changed, removed, reordered]`.
fn diff<T>(
    old: &[&T],
    new: &[&T],
    name: impl Fn(&T) -> &str,
    same: impl Fn(&T, &T) -> bool,
    messages: [&str; 4],
) -> Vec<String> {
    let [added, changed, removed, reordered] = messages;
    let mut changes = Vec::new();

    let differences: Vec<&T> = new
        .iter()
        .copied()
        .filter(|n| !old.iter().any(|o| same(*o, *n)))
        .collect();
    for item in differences.iter().copied() {
        let prefix = if old.iter().any(|o| name(*o) == name(item)) {
            changed
        } else {
            added
        };
        changes.push(format!("{}{}", prefix, name(item)));
    }

    let deleted: Vec<&T> = old
        .iter()
        .copied()
        .filter(|o| !new.iter().any(|n| name(*n) == name(*o)))
        .collect();
    for item in deleted.iter().copied() {
        changes.push(format!("{}{}", removed, name(item)));
    }

    if differences.is_empty() && deleted.is_empty() {
        let old_names: Vec<&str> = old.iter().map(|o| name(*o)).collect();
        let new_names: Vec<&str> = new.iter().map(|n| name(*n)).collect();
        if old_names != new_names {
            changes.push(reordered.to_string());
        }
    }
    changes
}

fn same_objective(a: &Objective, b: &Objective) -> bool {
    match (a, b) {
        (Objective::Abstract(a), Objective::Abstract(b)) => {
            let names = |children: &[Objective]| -> BTreeSet<String> {
                children.iter().map(|c| c.name().to_string()).collect()
            };
            a.name() == b.name()
                && a.description() == b.description()
                && names(a.children()) == names(b.children())
        }
        _ => a == b,
    }
}

fn same_alternative(a: &Alternative, b: &Alternative) -> bool {
    if a.name() != b.name() || a.description() != b.description() {
        return false;
    }
    let shared = |x: &Alternative, y: &Alternative| {
        x.consequences()
            .filter(|(objective, _)| y.consequence(objective).is_some())
            .all(|(objective, value)| y.consequence(objective) == Some(value))
    };
    shared(a, b) && shared(b, a)
}
