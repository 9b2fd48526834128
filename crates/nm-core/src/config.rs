//! Editor configuration.

use crate::error::ConfigError;
use serde::Deserialize;

/// Tunables for the view and the wheel-zoom behavior.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Abstract point shown at the canvas' top-left corner on startup.
    pub initial_origin: (f64, f64),
    /// Pixels per abstract unit on startup.
    pub initial_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per unit of wheel delta. Scrolling up (negative delta) zooms in.
    pub wheel_rate: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_origin: (0.0, 0.0),
            initial_scale: 2.0,
            min_scale: 0.1,
            max_scale: 10.0,
            wheel_rate: 1.0 / 30.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::ZoomRange { min, max });
        }
        if !(min..=max).contains(&self.initial_scale) {
            return Err(ConfigError::InitialScale(self.initial_scale));
        }
        if !(self.wheel_rate.is_finite() && self.wheel_rate > 0.0) {
            return Err(ConfigError::WheelRate(self.wheel_rate));
        }
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::CanvasSize {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// Clamp a wheel-driven scale into the configured zoom range.
    ///
    /// Never panics, even on a config that fails [`EditorConfig::validate`]:
    /// an inverted range yields `max_scale`, and a NaN bound is ignored.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}
