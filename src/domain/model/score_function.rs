//! Score functions - mapping domain elements to desirability in [0, 1].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Consequence, Domain, ModelError};

/// Explicit element → score pairs for a categorical domain, in domain order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscreteScoreFunction {
    scores: Vec<(String, f64)>,
    #[serde(default)]
    immutable: bool,
}

/// Control points `(x, score)` sorted by `x`, linearly interpolated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContinuousScoreFunction {
    points: Vec<(f64, f64)>,
    #[serde(default)]
    immutable: bool,
}

/// A user's score function for one primitive objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreFunction {
    Discrete(DiscreteScoreFunction),
    Continuous(ContinuousScoreFunction),
}

fn check_score(element: &str, score: f64) -> Result<(), ModelError> {
    if !(0.0..=1.0).contains(&score) {
        return Err(ModelError::ScoreOutOfRange {
            element: element.to_string(),
            score,
        });
    }
    Ok(())
}

impl DiscreteScoreFunction {
    /// Returns the score for a label.
    pub fn score(&self, element: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(e, _)| e == element)
            .map(|(_, s)| *s)
    }

    /// Sets (or appends) the score for a label.
    pub fn set_score(&mut self, element: impl Into<String>, score: f64) -> Result<(), ModelError> {
        let element = element.into();
        check_score(&element, score)?;
        match self.scores.iter_mut().find(|(e, _)| *e == element) {
            Some(entry) => entry.1 = score,
            None => self.scores.push((element, score)),
        }
        Ok(())
    }

    /// Removes a label and its score.
    pub fn remove_element(&mut self, element: &str) {
        self.scores.retain(|(e, _)| e != element);
    }
}

impl ContinuousScoreFunction {
    /// Interpolates the score at `x`; undefined outside the control points.
    pub fn score(&self, x: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if x < first.0 || x > last.0 {
            return None;
        }
        for window in self.points.windows(2) {
            let (x0, y0) = window[0];
            let (x1, y1) = window[1];
            if x >= x0 && x <= x1 {
                if x1 == x0 {
                    return Some(y0);
                }
                return Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0));
            }
        }
        // single control point
        Some(first.1)
    }

    /// Sets the score of a control point, inserting it in x order.
    pub fn set_score(&mut self, x: f64, score: f64) -> Result<(), ModelError> {
        if !x.is_finite() {
            return Err(ModelError::InvalidElement {
                element: x.to_string(),
            });
        }
        check_score(&x.to_string(), score)?;
        match self.points.iter().position(|(px, _)| *px >= x) {
            Some(i) if self.points[i].0 == x => self.points[i].1 = score,
            Some(i) => self.points.insert(i, (x, score)),
            None => self.points.push((x, score)),
        }
        Ok(())
    }

    /// Removes the control point at `x`.
    pub fn remove_element(&mut self, x: f64) {
        self.points.retain(|(px, _)| *px != x);
    }
}

impl ScoreFunction {
    /// Creates a discrete score function from ordered pairs.
    pub fn discrete<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, ModelError> {
        let mut function = DiscreteScoreFunction::default();
        for (element, score) in pairs {
            function.set_score(element, score)?;
        }
        Ok(ScoreFunction::Discrete(function))
    }

    /// Creates a continuous score function from control points.
    pub fn continuous(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, ModelError> {
        let mut function = ContinuousScoreFunction::default();
        for (x, score) in points {
            function.set_score(x, score)?;
        }
        Ok(ScoreFunction::Continuous(function))
    }

    /// The initial score function for a domain.
    ///
    /// Categorical labels are spaced evenly from 0 to 1 in domain order;
    /// continuous domains rise linearly from `min` to `max`.
    pub fn default_for(domain: &Domain) -> Self {
        match domain {
            Domain::Categorical { elements } => {
                let n = elements.len();
                let scores = elements
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        let score = if n > 1 { i as f64 / (n - 1) as f64 } else { 1.0 };
                        (e.clone(), score)
                    })
                    .collect();
                ScoreFunction::Discrete(DiscreteScoreFunction {
                    scores,
                    immutable: false,
                })
            }
            Domain::Continuous { min, max, .. } => {
                let points = if min == max {
                    vec![(*min, 1.0)]
                } else {
                    vec![(*min, 0.0), (*max, 1.0)]
                };
                ScoreFunction::Continuous(ContinuousScoreFunction {
                    points,
                    immutable: false,
                })
            }
        }
    }

    /// Marks the function as immutable (users always get the default).
    pub fn with_immutable(mut self, immutable: bool) -> Self {
        match &mut self {
            ScoreFunction::Discrete(f) => f.immutable = immutable,
            ScoreFunction::Continuous(f) => f.immutable = immutable,
        }
        self
    }

    /// Returns true if users may not edit this function.
    pub fn is_immutable(&self) -> bool {
        match self {
            ScoreFunction::Discrete(f) => f.immutable,
            ScoreFunction::Continuous(f) => f.immutable,
        }
    }

    /// Returns true if the variant matches the domain kind.
    pub fn fits(&self, domain: &Domain) -> bool {
        matches!(
            (self, domain),
            (ScoreFunction::Discrete(_), Domain::Categorical { .. })
                | (ScoreFunction::Continuous(_), Domain::Continuous { .. })
        )
    }

    /// Returns the score for a consequence, or `None` if undefined.
    pub fn score(&self, value: &Consequence) -> Option<f64> {
        match self {
            ScoreFunction::Discrete(f) => f.score(&value.as_label()),
            ScoreFunction::Continuous(f) => value.as_number().and_then(|x| f.score(x)),
        }
    }

    /// Sets the score of an element.
    pub fn set_score(&mut self, value: &Consequence, score: f64) -> Result<(), ModelError> {
        match self {
            ScoreFunction::Discrete(f) => f.set_score(value.as_label(), score),
            ScoreFunction::Continuous(f) => {
                let x = value.as_number().ok_or_else(|| ModelError::InvalidElement {
                    element: value.to_string(),
                })?;
                f.set_score(x, score)
            }
        }
    }

    /// Removes an element.
    pub fn remove_element(&mut self, value: &Consequence) {
        match self {
            ScoreFunction::Discrete(f) => f.remove_element(&value.as_label()),
            ScoreFunction::Continuous(f) => {
                if let Some(x) = value.as_number() {
                    f.remove_element(x);
                }
            }
        }
    }

    /// All elements with an explicit score, in order.
    pub fn elements(&self) -> Vec<Consequence> {
        match self {
            ScoreFunction::Discrete(f) => f
                .scores
                .iter()
                .map(|(e, _)| Consequence::Label(e.clone()))
                .collect(),
            ScoreFunction::Continuous(f) => f
                .points
                .iter()
                .map(|(x, _)| Consequence::Number(*x))
                .collect(),
        }
    }

    fn pairs(&self) -> Vec<(Consequence, f64)> {
        self.elements()
            .into_iter()
            .filter_map(|e| self.score(&e).map(|s| (e, s)))
            .collect()
    }

    /// The highest-scoring element; the first one on ties.
    pub fn best_element(&self) -> Option<Consequence> {
        let mut best: Option<(Consequence, f64)> = None;
        for (element, score) in self.pairs() {
            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((element, score));
            }
        }
        best.map(|(e, _)| e)
    }

    /// The lowest-scoring element; the first one on ties.
    pub fn worst_element(&self) -> Option<Consequence> {
        let mut worst: Option<(Consequence, f64)> = None;
        for (element, score) in self.pairs() {
            if worst.as_ref().map_or(true, |(_, s)| score < *s) {
                worst = Some((element, score));
            }
        }
        worst.map(|(e, _)| e)
    }

    /// Replaces the element set with the fallback's elements, in its order.
    ///
    /// Existing scores are kept, missing ones are taken from `fallback`.
    /// Returns true if any element was newly inserted.
    pub fn align_elements(&mut self, fallback: &ScoreFunction) -> bool {
        let mut inserted = false;
        match (self, fallback) {
            (ScoreFunction::Discrete(f), ScoreFunction::Discrete(d)) => {
                let mut aligned = Vec::with_capacity(d.scores.len());
                for (element, default_score) in &d.scores {
                    let score = match f.score(element) {
                        Some(s) => s,
                        None => {
                            inserted = true;
                            *default_score
                        }
                    };
                    aligned.push((element.clone(), score));
                }
                f.scores = aligned;
            }
            (ScoreFunction::Continuous(f), ScoreFunction::Continuous(d)) => {
                let mut aligned = Vec::with_capacity(d.points.len());
                for (x, default_score) in &d.points {
                    let score = match f.points.iter().find(|(px, _)| px == x) {
                        Some((_, s)) => *s,
                        None => {
                            inserted = true;
                            *default_score
                        }
                    };
                    aligned.push((*x, score));
                }
                f.points = aligned;
            }
            _ => {}
        }
        inserted
    }
}

/// Per-user map from primitive objective name to score function.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreFunctionMap(BTreeMap<String, ScoreFunction>);

impl ScoreFunctionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the score function for an objective.
    pub fn get(&self, objective: &str) -> Option<&ScoreFunction> {
        self.0.get(objective)
    }

    /// Returns a mutable score function for an objective.
    pub fn get_mut(&mut self, objective: &str) -> Option<&mut ScoreFunction> {
        self.0.get_mut(objective)
    }

    /// Sets the score function for an objective.
    pub fn set(&mut self, objective: impl Into<String>, function: ScoreFunction) {
        self.0.insert(objective.into(), function);
    }

    /// Removes the score function for an objective.
    pub fn remove(&mut self, objective: &str) -> Option<ScoreFunction> {
        self.0.remove(objective)
    }

    /// Objective names with a score function.
    pub fn objectives(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of score functions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no score function is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_scores_are_looked_up_by_label() {
        let f = ScoreFunction::discrete([("small", 0.0), ("large", 1.0)]).unwrap();
        assert_eq!(f.score(&"large".into()), Some(1.0));
        assert_eq!(f.score(&"huge".into()), None);
    }

    #[test]
    fn set_score_rejects_values_outside_unit_interval() {
        let mut f = ScoreFunction::discrete([("a", 0.5)]).unwrap();
        let err = f.set_score(&"a".into(), 1.2).unwrap_err();
        assert!(matches!(err, ModelError::ScoreOutOfRange { .. }));
        assert_eq!(f.score(&"a".into()), Some(0.5));
    }

    #[test]
    fn continuous_score_interpolates_between_points() {
        let f = ScoreFunction::continuous([(0.0, 1.0), (100.0, 0.0)]).unwrap();
        assert_eq!(f.score(&25.0.into()), Some(0.75));
        assert_eq!(f.score(&"50".into()), Some(0.5));
    }

    #[test]
    fn continuous_score_is_undefined_outside_points() {
        let f = ScoreFunction::continuous([(10.0, 0.0), (20.0, 1.0)]).unwrap();
        assert_eq!(f.score(&5.0.into()), None);
        assert_eq!(f.score(&21.0.into()), None);
    }

    #[test]
    fn continuous_points_stay_sorted() {
        let f = ScoreFunction::continuous([(20.0, 1.0), (0.0, 0.0), (10.0, 0.2)]).unwrap();
        let xs: Vec<f64> = f.elements().iter().filter_map(|e| e.as_number()).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0]);
        assert!((f.score(&15.0.into()).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn best_and_worst_break_ties_by_first_seen() {
        let f = ScoreFunction::discrete([("a", 1.0), ("b", 0.0), ("c", 1.0), ("d", 0.0)]).unwrap();
        assert_eq!(f.best_element(), Some("a".into()));
        assert_eq!(f.worst_element(), Some("b".into()));
    }

    #[test]
    fn default_for_categorical_spaces_scores_evenly() {
        let f = ScoreFunction::default_for(&Domain::categorical(["x", "y", "z"]));
        assert_eq!(f.score(&"x".into()), Some(0.0));
        assert_eq!(f.score(&"y".into()), Some(0.5));
        assert_eq!(f.score(&"z".into()), Some(1.0));
    }

    #[test]
    fn default_for_continuous_is_linear() {
        let f = ScoreFunction::default_for(&Domain::continuous(30.0, 130.0));
        assert_eq!(f.score(&80.0.into()), Some(0.5));
        assert!(f.fits(&Domain::continuous(0.0, 1.0)));
        assert!(!f.fits(&Domain::categorical(["a"])));
    }

    #[test]
    fn align_elements_fills_missing_from_fallback_in_fallback_order() {
        let mut f = ScoreFunction::discrete([("b", 0.9)]).unwrap();
        let fallback = ScoreFunction::discrete([("a", 0.1), ("b", 0.2)]).unwrap();

        assert!(f.align_elements(&fallback));
        assert_eq!(f.elements(), vec!["a".into(), "b".into()]);
        assert_eq!(f.score(&"b".into()), Some(0.9));
        assert!(!f.align_elements(&fallback));
    }

    #[test]
    fn score_function_map_tracks_objectives() {
        let mut map = ScoreFunctionMap::new();
        map.set("rate", ScoreFunction::default_for(&Domain::continuous(0.0, 1.0)));
        assert_eq!(map.len(), 1);
        assert!(map.get("rate").is_some());
        assert!(map.remove("rate").is_some());
        assert!(map.is_empty());
    }
}
