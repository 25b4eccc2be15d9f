//! Objective hierarchy - abstract grouping objectives and primitive scorable ones.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Domain, EntityKind, ModelError, ScoreFunction};

/// A scorable criterion with a domain and a default score function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveObjective {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    domain: Domain,
    default_score_function: ScoreFunction,
}

impl PrimitiveObjective {
    /// Creates a primitive objective whose default score function is derived from the domain.
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        let default_score_function = ScoreFunction::default_for(&domain);
        Self {
            name: name.into(),
            description: String::new(),
            color: None,
            domain,
            default_score_function,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Replaces the default score function.
    pub fn with_default_score_function(mut self, function: ScoreFunction) -> Self {
        self.default_score_function = function;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn default_score_function(&self) -> &ScoreFunction {
        &self.default_score_function
    }
}

/// A grouping objective with ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractObjective {
    name: String,
    #[serde(default)]
    description: String,
    children: Vec<Objective>,
}

impl AbstractObjective {
    /// Creates an abstract objective, rejecting duplicate child names.
    pub fn new(name: impl Into<String>, children: Vec<Objective>) -> Result<Self, ModelError> {
        check_sibling_names(&children)?;
        Ok(Self {
            name: name.into(),
            description: String::new(),
            children,
        })
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Direct children in display order.
    pub fn children(&self) -> &[Objective] {
        &self.children
    }

    /// Appends a child, rejecting a name already used by a sibling.
    pub fn add_child(&mut self, child: Objective) -> Result<(), ModelError> {
        if self.children.iter().any(|c| c.name() == child.name()) {
            return Err(ModelError::duplicate(EntityKind::Objective, child.name()));
        }
        self.children.push(child);
        Ok(())
    }
}

/// A node of the objective hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "objective_type", rename_all = "snake_case")]
pub enum Objective {
    Abstract(AbstractObjective),
    Primitive(PrimitiveObjective),
}

impl Objective {
    pub fn name(&self) -> &str {
        match self {
            Objective::Abstract(o) => o.name(),
            Objective::Primitive(o) => o.name(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Objective::Primitive(_))
    }

    /// Primitive descendants (self included) in depth-first, left-to-right order.
    pub fn primitives(&self) -> Vec<&PrimitiveObjective> {
        let mut out = Vec::new();
        self.collect_primitives(&mut out);
        out
    }

    fn collect_primitives<'a>(&'a self, out: &mut Vec<&'a PrimitiveObjective>) {
        match self {
            Objective::Primitive(p) => out.push(p),
            Objective::Abstract(a) => {
                for child in &a.children {
                    child.collect_primitives(out);
                }
            }
        }
    }

    /// All objectives in the subtree (self included), pre-order.
    pub fn descendants(&self) -> Vec<&Objective> {
        let mut out = vec![self];
        if let Objective::Abstract(a) = self {
            for child in &a.children {
                out.extend(child.descendants());
            }
        }
        out
    }

    /// Finds an objective by name in the subtree.
    pub fn find(&self, name: &str) -> Option<&Objective> {
        if self.name() == name {
            return Some(self);
        }
        match self {
            Objective::Abstract(a) => a.children.iter().find_map(|c| c.find(name)),
            Objective::Primitive(_) => None,
        }
    }

    /// Height of the subtree below this objective (0 for primitives).
    pub fn depth_of_children(&self) -> usize {
        match self {
            Objective::Primitive(_) => 0,
            Objective::Abstract(a) => {
                1 + a
                    .children
                    .iter()
                    .map(|c| c.depth_of_children())
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl From<PrimitiveObjective> for Objective {
    fn from(value: PrimitiveObjective) -> Self {
        Objective::Primitive(value)
    }
}

impl From<AbstractObjective> for Objective {
    fn from(value: AbstractObjective) -> Self {
        Objective::Abstract(value)
    }
}

/// Rejects sibling lists that reuse a name.
pub(crate) fn check_sibling_names(siblings: &[Objective]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for objective in siblings {
        if !seen.insert(objective.name()) {
            return Err(ModelError::duplicate(EntityKind::Objective, objective.name()));
        }
    }
    Ok(())
}

/// Rejects trees where two primitives share a name anywhere.
///
/// Weights and score functions are keyed by primitive name, so the
/// name must identify a single primitive across the whole tree.
pub(crate) fn check_tree_names(roots: &[Objective]) -> Result<(), ModelError> {
    check_sibling_names(roots)?;
    let mut seen = HashSet::new();
    for root in roots {
        for objective in root.descendants() {
            if let Objective::Abstract(a) = objective {
                check_sibling_names(&a.children)?;
            }
        }
        for primitive in root.primitives() {
            if !seen.insert(primitive.name()) {
                return Err(ModelError::duplicate(EntityKind::Objective, primitive.name()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Objective {
        PrimitiveObjective::new(name, Domain::continuous(0.0, 1.0)).into()
    }

    #[test]
    fn primitives_are_collected_depth_first_left_to_right() {
        let location = AbstractObjective::new("location", vec![leaf("area"), leaf("skytrain")]).unwrap();
        let hotel = AbstractObjective::new(
            "hotel",
            vec![location.into(), leaf("size"), leaf("internet")],
        )
        .unwrap();
        let root: Objective = hotel.into();

        let names: Vec<&str> = root.primitives().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["area", "skytrain", "size", "internet"]);
    }

    #[test]
    fn abstract_objective_rejects_duplicate_children() {
        let err = AbstractObjective::new("root", vec![leaf("a"), leaf("a")]).unwrap_err();
        assert_eq!(err, ModelError::duplicate(EntityKind::Objective, "a"));
    }

    #[test]
    fn add_child_rejects_existing_sibling_name() {
        let mut group = AbstractObjective::new("root", vec![leaf("a")]).unwrap();
        assert!(group.add_child(leaf("a")).is_err());
        assert!(group.add_child(leaf("b")).is_ok());
        assert_eq!(group.children().len(), 2);
    }

    #[test]
    fn tree_check_rejects_primitive_names_reused_in_different_branches() {
        let left = AbstractObjective::new("left", vec![leaf("cost")]).unwrap();
        let right = AbstractObjective::new("right", vec![leaf("cost")]).unwrap();
        assert!(check_tree_names(&[left.into(), right.into()]).is_err());
    }

    #[test]
    fn find_and_depth_of_children_walk_the_tree() {
        let inner = AbstractObjective::new("inner", vec![leaf("x")]).unwrap();
        let root: Objective = AbstractObjective::new("root", vec![inner.into(), leaf("y")])
            .unwrap()
            .into();

        assert!(root.find("x").is_some_and(|o| o.is_primitive()));
        assert!(root.find("missing").is_none());
        assert_eq!(root.depth_of_children(), 2);
        assert_eq!(root.descendants().len(), 4);
    }
}
