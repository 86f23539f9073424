//! Render configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunables shared by the path interpreter and the tree producers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Recursion budget for adaptive bezier flattening.
    pub curve_depth: u32,

    /// Flatness threshold in degrees of summed tangent deviation.
    pub flatness_degrees: f64,

    /// Capacity of every bounded item channel between producers and consumers.
    pub channel_capacity: usize,

    /// Stroke width used when neither the element nor an ancestor sets one.
    pub default_stroke_width: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            curve_depth: 10,
            flatness_degrees: 5.0,
            channel_capacity: 100,
            default_stroke_width: 1.0,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive a render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be at least 1".into(),
            ));
        }
        if !self.flatness_degrees.is_finite() || self.flatness_degrees <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "flatness_degrees must be a positive number, got {}",
                self.flatness_degrees
            )));
        }
        if !self.default_stroke_width.is_finite() || self.default_stroke_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_stroke_width must be non-negative, got {}",
                self.default_stroke_width
            )));
        }
        Ok(())
    }

    /// Flatness threshold in radians.
    pub fn flatness_radians(&self) -> f64 {
        self.flatness_degrees.to_radians()
    }
}
