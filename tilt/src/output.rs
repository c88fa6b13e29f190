//! Style output: what the engine asks the host to write each frame.
//!
//! A [`FrameStyles`] is a complete description of the engine's visible state.
//! `None` fields mean "remove this style", so the same type covers both the
//! animated frames and the idle reset.

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;

use crate::config::{EngineConfig, Layer, LayerRest};
use crate::consts::{SHINE_OPACITY_VAR, SHINE_X_VAR, SHINE_Y_VAR};
use crate::geom::Vec2;
use crate::motion::Shine;

/// Rotation and scale applied to the rotor element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootTransform {
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
    pub scale: f64,
}

impl RootTransform {
    /// CSS `transform` value.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = format!("rotateX({}deg) rotateY({}deg)", self.rotate_x_deg, self.rotate_y_deg);
        if (self.scale - 1.0).abs() > f64::EPSILON {
            css.push_str(&format!(" scale({})", self.scale));
        }
        css
    }
}

/// Translation of one parallax layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub offset: Vec2,
    pub z: f64,
}

impl LayerTransform {
    /// CSS `transform` value.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("translate3d({}px, {}px, {}px)", self.offset.x, self.offset.y, self.z)
    }
}

/// Style for one layer channel; `transform: None` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub channel: String,
    pub transform: Option<LayerTransform>,
}

/// Everything the host writes for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyles {
    pub root: Option<RootTransform>,
    pub shine: Option<Shine>,
    pub layers: Vec<LayerStyle>,
}

impl FrameStyles {
    /// Idle styles for `layers`: no root transform, no shine, and each layer
    /// either cleared or held at its z depth.
    #[must_use]
    pub fn rest<'a>(config: &EngineConfig, layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        let layers = layers
            .into_iter()
            .map(|layer| LayerStyle {
                channel: layer.channel.clone(),
                transform: match config.layer_rest {
                    LayerRest::Clear => None,
                    LayerRest::HoldDepth => Some(LayerTransform { offset: Vec2::ZERO, z: layer.z() }),
                },
            })
            .collect();
        Self { root: None, shine: None, layers }
    }

    /// Custom property assignments for the shine, or removals when absent.
    #[must_use]
    pub fn shine_vars(&self) -> [(&'static str, Option<String>); 3] {
        match self.shine {
            Some(shine) => [
                (SHINE_X_VAR, Some(format!("{}%", shine.x_pct))),
                (SHINE_Y_VAR, Some(format!("{}%", shine.y_pct))),
                (SHINE_OPACITY_VAR, Some(shine.opacity.to_string())),
            ],
            None => [(SHINE_X_VAR, None), (SHINE_Y_VAR, None), (SHINE_OPACITY_VAR, None)],
        }
    }
}
