//! Shared numeric and string constants for the tilt crate.

// ── Motion ──────────────────────────────────────────────────────

/// Per-axis delta below which interpolated motion counts as settled.
pub const DEFAULT_SETTLE_THRESHOLD: f64 = 0.01;

// ── Shine ───────────────────────────────────────────────────────

/// Highlight position at rest, in percent of the target box.
pub const SHINE_CENTER_PCT: f64 = 50.0;

/// Percent of highlight travel per degree of rotation.
pub const SHINE_TRAVEL_PER_DEG: f64 = 3.0;

/// Custom property carrying the horizontal highlight position.
pub const SHINE_X_VAR: &str = "--shine-x";

/// Custom property carrying the vertical highlight position.
pub const SHINE_Y_VAR: &str = "--shine-y";

/// Custom property carrying the highlight opacity.
pub const SHINE_OPACITY_VAR: &str = "--shine-opacity";

// ── Registry ────────────────────────────────────────────────────

/// Marker attribute set on every element that already has an engine.
pub const INIT_MARKER_ATTR: &str = "data-tilt-init";

/// Attribute holding a per-element JSON config override.
pub const CONFIG_ATTR: &str = "data-tilt";

/// Delay before the one-shot fallback re-scan after setup.
pub const FALLBACK_RESCAN_MS: u32 = 500;

// ── Motion reduction ────────────────────────────────────────────

/// Attribute on `<html>` that is present while motion is reduced.
pub const REDUCE_MOTION_ATTR: &str = "data-reduce-motion";
