//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::{EditorError, EditorResult, MergePolicy};

/// Text placed in a section when a text item is dropped on it.
pub const DEFAULT_TEXT: &str = "You can edit this text.";

/// Smallest zoom factor media can be scaled down to.
pub const DEFAULT_MIN_SCALE: f64 = 0.5;

/// Scale change per unit of wheel delta.
pub const DEFAULT_WHEEL_ZOOM_STEP: f64 = 0.001;

/// Tunables for the interaction controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Floor for media scale while zooming.
    pub min_scale: f64,
    /// Zoom change per wheel delta unit (scrolling down zooms out).
    pub wheel_zoom_step: f64,
    /// Initial text for dropped text items.
    pub default_text: String,
    /// Adjacency rule applied to merges.
    pub merge_policy: MergePolicy,
    /// Maximum undo depth; unbounded when `None`.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            wheel_zoom_step: DEFAULT_WHEEL_ZOOM_STEP,
            default_text: DEFAULT_TEXT.to_string(),
            merge_policy: MergePolicy::default(),
            history_limit: None,
        }
    }
}

impl EditorConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] for a non-positive `min_scale` or
    /// `wheel_zoom_step`.
    pub fn validate(&self) -> EditorResult<()> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(EditorError::Config(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !(self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 0.0) {
            return Err(EditorError::Config(format!(
                "wheel_zoom_step must be positive, got {}",
                self.wheel_zoom_step
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
