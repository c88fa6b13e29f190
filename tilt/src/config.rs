//! Engine configuration: presets, validation, and JSON overrides.
//!
//! Channels are named by CSS selectors resolved relative to the target
//! element, so the same config drives the DOM host and the test hosts.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::DEFAULT_SETTLE_THRESHOLD;

/// Error returned by [`EngineConfig::validate`] and the JSON constructors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An interpolation factor lies outside `(0, 1]`.
    #[error("{field} must be in (0, 1], got {value}")]
    Ease { field: &'static str, value: f64 },
    /// The maximum rotation is not a positive finite number.
    #[error("maxRotationDeg must be positive and finite, got {0}")]
    MaxRotation(f64),
    /// The hover scale is not a positive finite number.
    #[error("hoverScale must be positive and finite, got {0}")]
    HoverScale(f64),
    /// The settle threshold is not a positive finite number.
    #[error("settleThreshold must be positive and finite, got {0}")]
    SettleThreshold(f64),
    /// The magnet strength lies outside `[0, 1]`.
    #[error("magnet.strength must be in [0, 1], got {0}")]
    MagnetStrength(f64),
    /// The magnet radius is not a positive finite number.
    #[error("magnet.maxDistance must be positive and finite, got {0}")]
    MagnetDistance(f64),
    /// A channel selector is empty.
    #[error("{0} selector must not be empty")]
    EmptyChannel(&'static str),
    /// A layer depth or z value is not finite.
    #[error("layer {channel} has a non-finite depth")]
    LayerDepth { channel: String },
    /// The override document is valid JSON but not an object.
    #[error("config override must be a JSON object")]
    NotAnObject,
    /// The JSON could not be parsed or does not match the config shape.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which way the surface tilts relative to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// The surface turns its face toward the pointer.
    #[default]
    Toward,
    /// The surface leans away from the pointer.
    Away,
}

impl Facing {
    /// `1.0` for [`Facing::Toward`], `-1.0` for [`Facing::Away`].
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Toward => 1.0,
            Self::Away => -1.0,
        }
    }
}

/// What parallax layers look like once the engine goes idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerRest {
    /// Remove the layer transform entirely.
    #[default]
    Clear,
    /// Keep the layer at its z translation with no planar offset.
    HoldDepth,
}

fn default_true() -> bool {
    true
}

/// A parallax output channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Selector of the layer element inside the target.
    pub channel: String,
    /// Displacement in pixels at full rotation.
    pub depth: f64,
    /// Z translation in pixels; defaults to `depth`.
    #[serde(default)]
    pub z: Option<f64>,
    /// Whether the layer also drifts vertically.
    #[serde(default = "default_true")]
    pub vertical: bool,
}

impl Layer {
    #[must_use]
    pub fn new(channel: &str, depth: f64) -> Self {
        Self { channel: channel.to_owned(), depth, z: None, vertical: true }
    }

    #[must_use]
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    #[must_use]
    pub fn horizontal_only(mut self) -> Self {
        self.vertical = false;
        self
    }

    /// Effective z translation.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z.unwrap_or(self.depth)
    }
}

/// Magnetic attraction of an anchor sub-element toward the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MagnetConfig {
    /// Selector of the anchor whose center the pull is measured from.
    pub anchor: String,
    /// Selector of the parallax layer that carries the anchor.
    pub carrier: String,
    /// Per-frame interpolation factor toward the target offset.
    pub ease: f64,
    /// Distance in pixels at and beyond which the pull is zero.
    pub max_distance: f64,
    /// Fraction of the pointer vector applied at zero distance.
    pub strength: f64,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            anchor: String::new(),
            carrier: String::new(),
            ease: 0.2,
            max_distance: 150.0,
            strength: 0.4,
        }
    }
}

/// Immutable engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub max_rotation_deg: f64,
    pub hover_scale: f64,
    pub rotation_ease: f64,
    pub settle_threshold: f64,
    pub facing: Facing,
    /// Element receiving the root transform; `None` rotates the target.
    pub rotor: Option<String>,
    /// Highlight opacity while hovered; zero disables the shine variables.
    pub shine_opacity: f64,
    pub perspective_px: Option<f64>,
    /// Cancel any CSS entrance animation on the target and pin it fully
    /// opaque before the first transform is written.
    pub clear_entrance: bool,
    pub hover_z_index: Option<i32>,
    pub layers: Vec<Layer>,
    pub layer_rest: LayerRest,
    pub magnet: Option<MagnetConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rotation_deg: 15.0,
            hover_scale: 1.0,
            rotation_ease: 0.1,
            settle_threshold: DEFAULT_SETTLE_THRESHOLD,
            facing: Facing::Toward,
            rotor: None,
            shine_opacity: 0.0,
            perspective_px: None,
            clear_entrance: false,
            hover_z_index: None,
            layers: Vec::new(),
            layer_rest: LayerRest::Clear,
            magnet: None,
        }
    }
}

impl EngineConfig {
    /// Project card: heavy tilt, hover scale, shine, five parallax layers and
    /// a magnetic call-to-action link.
    #[must_use]
    pub fn card() -> Self {
        Self {
            max_rotation_deg: 25.0,
            hover_scale: 1.05,
            rotation_ease: 0.15,
            shine_opacity: 0.15,
            perspective_px: Some(600.0),
            clear_entrance: true,
            hover_z_index: Some(10),
            layers: vec![
                Layer::new(".card__header", 40.0),
                Layer::new(".card__title", 55.0),
                Layer::new(".card__desc", 25.0),
                Layer::new(".card__meta", 20.0),
                Layer::new(".card__links", 70.0),
            ],
            magnet: Some(MagnetConfig {
                anchor: ".card__link".to_owned(),
                carrier: ".card__links".to_owned(),
                ..MagnetConfig::default()
            }),
            ..Self::default()
        }
    }

    /// Featured browser window: gentler tilt away from the pointer, layers
    /// drifting horizontally at fixed depths.
    #[must_use]
    pub fn window() -> Self {
        Self {
            max_rotation_deg: 15.0,
            rotation_ease: 0.1,
            facing: Facing::Away,
            rotor: Some(".browser-window".to_owned()),
            layers: vec![
                Layer::new(".preview__nav", 45.0).with_z(50.0).horizontal_only(),
                Layer::new(".preview__left", 30.0).with_z(30.0).horizontal_only(),
                Layer::new(".preview__right", 70.0).with_z(80.0).horizontal_only(),
                Layer::new(".preview__carousel", 15.0).with_z(15.0).horizontal_only(),
            ],
            layer_rest: LayerRest::HoldDepth,
            ..Self::default()
        }
    }

    /// Parse a complete config from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, or the validation
    /// error for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge a JSON object over this config, key by key, and validate the
    /// result. Nested objects (`magnet`) merge one level deeper; arrays
    /// (`layers`) replace wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] when the override is not a JSON
    /// object, [`ConfigError::Json`] when it cannot be parsed or merged, or
    /// the validation error for the merged config.
    pub fn with_overrides(&self, raw: &str) -> Result<Self, ConfigError> {
        let patch: Value = serde_json::from_str(raw)?;
        let Value::Object(patch) = patch else {
            return Err(ConfigError::NotAnObject);
        };
        let mut base = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut base {
            for (key, value) in patch {
                match (fields.get_mut(&key), value) {
                    (Some(Value::Object(existing)), Value::Object(nested)) => {
                        existing.extend(nested);
                    }
                    (_, value) => {
                        fields.insert(key, value);
                    }
                }
            }
        }
        let merged: Self = serde_json::from_value(base)?;
        merged.validate()?;
        Ok(merged)
    }

    /// Check every numeric field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_rotation_deg.is_finite() && self.max_rotation_deg > 0.0) {
            return Err(ConfigError::MaxRotation(self.max_rotation_deg));
        }
        if !(self.hover_scale.is_finite() && self.hover_scale > 0.0) {
            return Err(ConfigError::HoverScale(self.hover_scale));
        }
        check_ease("rotationEase", self.rotation_ease)?;
        if !(self.settle_threshold.is_finite() && self.settle_threshold > 0.0) {
            return Err(ConfigError::SettleThreshold(self.settle_threshold));
        }
        for layer in &self.layers {
            if layer.channel.trim().is_empty() {
                return Err(ConfigError::EmptyChannel("layer"));
            }
            if !layer.depth.is_finite() || !layer.z().is_finite() {
                return Err(ConfigError::LayerDepth { channel: layer.channel.clone() });
            }
        }
        if let Some(magnet) = &self.magnet {
            check_ease("magnet.ease", magnet.ease)?;
            if !(0.0..=1.0).contains(&magnet.strength) {
                return Err(ConfigError::MagnetStrength(magnet.strength));
            }
            if !(magnet.max_distance.is_finite() && magnet.max_distance > 0.0) {
                return Err(ConfigError::MagnetDistance(magnet.max_distance));
            }
            if magnet.anchor.trim().is_empty() {
                return Err(ConfigError::EmptyChannel("magnet.anchor"));
            }
            if magnet.carrier.trim().is_empty() {
                return Err(ConfigError::EmptyChannel("magnet.carrier"));
            }
        }
        Ok(())
    }
}

fn check_ease(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Ease { field, value })
    }
}
