//! View configuration

use serde::Deserialize;

use crate::domain::rendering::Orientation;

use super::error::ValidationError;

/// How the chart is laid out and which extras are shown.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ViewConfig {
    /// Axis the score bars stack along
    #[serde(default)]
    pub orientation: Orientation,

    /// Chart width in pixels
    #[serde(default = "default_width")]
    pub width: f64,

    /// Chart height in pixels
    #[serde(default = "default_height")]
    pub height: f64,

    /// Scale rows by the largest weight any displayed user gives them
    #[serde(default = "default_true")]
    pub scale_alternatives: bool,

    /// Show each alternative's total score
    #[serde(default = "default_true")]
    pub display_total_scores: bool,

    /// Show the score function plots beside the labels
    #[serde(default)]
    pub display_score_functions: bool,
}

impl ViewConfig {
    /// Validate view configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidDimension { field, value });
            }
        }
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            width: default_width(),
            height: default_height(),
            scale_alternatives: true,
            display_total_scores: true,
            display_score_functions: false,
        }
    }
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_config_defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.width, 800.0);
        assert!(config.scale_alternatives);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_or_infinite_size_is_rejected() {
        let config = ViewConfig {
            height: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidDimension { field: "height", value: 0.0 })
        );

        let config = ViewConfig {
            width: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
