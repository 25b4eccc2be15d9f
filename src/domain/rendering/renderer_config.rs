//! Sizing information handed to rendering adapters.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::model::WeightMap;

use super::{LabelData, RowData};

/// Which axis the score bars stack along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Alternatives run left to right, scores stack upward.
    #[default]
    Vertical,
    /// Alternatives run top to bottom, scores stack rightward.
    Horizontal,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl FromStr for Orientation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(ValidationError::invalid_format(
                "orientation",
                format!("expected 'vertical' or 'horizontal', got '{}'", other),
            )),
        }
    }
}

/// A screen dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

/// Linear map from a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a domain value into the range. A degenerate domain maps to the range start.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) * (r1 - r0) / (d1 - d0)
    }

    /// Maps a range value back into the domain.
    pub fn invert(&self, value: f64) -> f64 {
        LinearScale::new(self.range, self.domain).apply(value)
    }
}

/// Orientation-dependent sizing for the chart renderers.
///
/// Dimension one runs along the alternatives, dimension two along the
/// score axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    pub orientation: Orientation,
    pub width: f64,
    pub height: f64,
    pub dimension_one: Dimension,
    pub dimension_two: Dimension,
    pub dimension_one_size: f64,
    pub dimension_two_size: f64,
    /// Score (0 to the scale maximum) to pixels along dimension two.
    pub dimension_two_scale: LinearScale,
}

impl RendererConfig {
    pub fn new(orientation: Orientation, width: f64, height: f64, score_scale_max: f64) -> Self {
        let (dimension_one, dimension_two, dimension_one_size, dimension_two_size) =
            match orientation {
                Orientation::Vertical => (Dimension::Width, Dimension::Height, width, height),
                Orientation::Horizontal => (Dimension::Height, Dimension::Width, height, width),
            };
        Self {
            orientation,
            width,
            height,
            dimension_one,
            dimension_two,
            dimension_one_size,
            dimension_two_size,
            dimension_two_scale: LinearScale::new((0.0, score_scale_max), (0.0, dimension_two_size)),
        }
    }
}

/// Everything a rendering adapter needs to redraw the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererUpdate {
    pub row_data: Vec<RowData>,
    pub maximum_weight_map: WeightMap,
    pub label_data: Vec<LabelData>,
    pub orientation: Orientation,
    pub renderer_config: RendererConfig,
}
