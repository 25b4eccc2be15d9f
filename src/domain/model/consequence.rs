//! Consequence values and objective domains.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value an alternative takes on a primitive objective.
///
/// Categorical domains use labels, continuous domains use numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Consequence {
    Number(f64),
    Label(String),
}

impl Consequence {
    /// Creates a categorical consequence.
    pub fn label(value: impl Into<String>) -> Self {
        Consequence::Label(value.into())
    }

    /// Returns the numeric value, parsing labels that hold a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Consequence::Number(n) => Some(*n),
            Consequence::Label(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Returns the label form of the value.
    pub fn as_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Consequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consequence::Number(n) => write!(f, "{}", n),
            Consequence::Label(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Consequence {
    fn from(value: &str) -> Self {
        Consequence::Label(value.to_string())
    }
}

impl From<f64> for Consequence {
    fn from(value: f64) -> Self {
        Consequence::Number(value)
    }
}

/// The set of legal consequence values for a primitive objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Domain {
    /// Ordered set of labels.
    Categorical { elements: Vec<String> },
    /// Closed real interval.
    Continuous {
        min: f64,
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl Domain {
    /// Creates a categorical domain from labels.
    pub fn categorical<S: Into<String>>(elements: impl IntoIterator<Item = S>) -> Self {
        Domain::Categorical {
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a continuous domain over `[min, max]`.
    pub fn continuous(min: f64, max: f64) -> Self {
        Domain::Continuous {
            min,
            max,
            unit: None,
        }
    }

    /// Returns true for continuous domains.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Domain::Continuous { .. })
    }

    /// Returns true if the value is a legal consequence in this domain.
    pub fn contains(&self, value: &Consequence) -> bool {
        match self {
            Domain::Categorical { elements } => {
                let label = value.as_label();
                elements.iter().any(|e| *e == label)
            }
            Domain::Continuous { min, max, .. } => value
                .as_number()
                .map(|n| n >= *min && n <= *max)
                .unwrap_or(false),
        }
    }

    /// Coerces a value into the representation this domain uses.
    ///
    /// Returns `None` when the value is not legal in the domain.
    pub fn normalize(&self, value: &Consequence) -> Option<Consequence> {
        if !self.contains(value) {
            return None;
        }
        match self {
            Domain::Categorical { .. } => Some(Consequence::Label(value.as_label())),
            Domain::Continuous { .. } => value.as_number().map(Consequence::Number),
        }
    }
}
