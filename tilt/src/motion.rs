//! Pure motion math shared by every tilt variant.
//!
//! Nothing here touches engine state or the host; each function maps inputs
//! to outputs so the frame step can be read as a composition of them.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use crate::config::{Facing, Layer, MagnetConfig};
use crate::consts::{SHINE_CENTER_PCT, SHINE_TRAVEL_PER_DEG};
use crate::geom::{Rect, Vec2};

/// Offset of `pointer` from the center of `rect`, each axis divided by half
/// the matching dimension. Inside the rectangle both axes land in `[-1, 1]`;
/// outside they keep growing linearly. Degenerate rectangles yield zero.
#[must_use]
pub fn normalized_offset(pointer: Vec2, rect: &Rect) -> Vec2 {
    if rect.is_degenerate() || !pointer.is_finite() {
        return Vec2::ZERO;
    }
    let center = rect.center();
    Vec2 {
        x: (pointer.x - center.x) / (rect.width / 2.0),
        y: (pointer.y - center.y) / (rect.height / 2.0),
    }
}

/// Rotation in degrees for a normalized pointer offset.
///
/// Vertical displacement drives rotation about the horizontal axis and
/// horizontal displacement drives rotation about the vertical axis, with the
/// y axis inverted so a [`Facing::Toward`] surface turns toward the pointer.
/// Each axis is clamped to `±|max_deg|`; a non-finite limit gives no rotation.
#[must_use]
pub fn target_rotation(offset: Vec2, max_deg: f64, facing: Facing) -> Vec2 {
    let Some(limit) = rotation_limit(max_deg) else {
        return Vec2::ZERO;
    };
    let sign = facing.sign();
    Vec2 {
        x: (sign * offset.y * limit).clamp(-limit, limit),
        y: (-sign * offset.x * limit).clamp(-limit, limit),
    }
}

/// Usable rotation limit: the magnitude of `max_deg`, or `None` when it is
/// zero or not finite.
fn rotation_limit(max_deg: f64) -> Option<f64> {
    let limit = max_deg.abs();
    (limit.is_finite() && limit > 0.0).then_some(limit)
}

/// Quadratic magnet falloff: `1` at distance zero, `0` at and beyond
/// `max_distance`.
#[must_use]
pub fn magnet_pull(distance: f64, max_distance: f64) -> f64 {
    if max_distance.is_nan() || max_distance <= 0.0 || !distance.is_finite() {
        return 0.0;
    }
    let normalized = (distance.max(0.0) / max_distance).min(1.0);
    (1.0 - normalized).powi(2)
}

/// Target offset of the magnet anchor: the vector from the anchor center to
/// the pointer, scaled by the pull and the configured strength.
#[must_use]
pub fn magnet_target(pointer: Vec2, anchor_center: Vec2, magnet: &MagnetConfig) -> Vec2 {
    let delta = pointer.sub(anchor_center);
    if !delta.is_finite() {
        return Vec2::ZERO;
    }
    let pull = magnet_pull(delta.length(), magnet.max_distance);
    delta.scale(pull * magnet.strength)
}

/// One interpolation step from `current` toward `target`.
#[must_use]
pub fn ease_toward(current: Vec2, target: Vec2, ease: f64) -> Vec2 {
    current.add(target.sub(current).scale(ease))
}

/// Whether `current` is within `threshold` of `target` on both axes.
#[must_use]
pub fn within(current: Vec2, target: Vec2, threshold: f64) -> bool {
    (target.x - current.x).abs() < threshold && (target.y - current.y).abs() < threshold
}

/// Highlight position (percent) and opacity for the current rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shine {
    pub x_pct: f64,
    pub y_pct: f64,
    pub opacity: f64,
}

#[must_use]
pub fn shine(rotation: Vec2, active: bool, hover_opacity: f64) -> Shine {
    Shine {
        x_pct: SHINE_CENTER_PCT + rotation.y * SHINE_TRAVEL_PER_DEG,
        y_pct: SHINE_CENTER_PCT + rotation.x * SHINE_TRAVEL_PER_DEG,
        opacity: if active { hover_opacity } else { 0.0 },
    }
}

/// Planar parallax displacement of a layer for the current rotation.
///
/// For [`Facing::Toward`] this is `(-rot.y / max * depth, rot.x / max * depth)`;
/// [`Facing::Away`] flips both so layers still drift toward the pointer.
#[must_use]
pub fn layer_offset(rotation: Vec2, max_deg: f64, layer: &Layer, facing: Facing) -> Vec2 {
    let Some(limit) = rotation_limit(max_deg) else {
        return Vec2::ZERO;
    };
    let sign = facing.sign();
    let x = -rotation.y / limit * layer.depth * sign;
    let y = if layer.vertical { rotation.x / limit * layer.depth * sign } else { 0.0 };
    Vec2 { x, y }
}
