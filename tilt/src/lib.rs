//! Pointer-driven 3D tilt for page elements.
//!
//! An engine tracks the pointer over one target element, derives a target
//! rotation (and optionally a magnetic offset for an anchor sub-element), and
//! runs a damped per-frame loop that eases toward it, writing rotation,
//! parallax layer offsets and highlight variables as it goes. When the
//! pointer leaves, the same loop decays everything back to rest and stops.
//!
//! The engine is generic over its environment. The browser host lives in
//! [`dom`]; tests drive [`engine::TiltEngine`] with recording fakes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The per-target state machine and frame step |
//! | [`motion`] | Pure math: offsets, rotation, magnet falloff, easing, shine, parallax |
//! | [`config`] | Engine configuration, presets, validation and JSON overrides |
//! | [`output`] | Per-frame style description and its CSS formatting |
//! | [`host`] | Seams to the environment: surface, frame scheduler, motion gate |
//! | [`dom`] | web-sys implementations of the seams and pointer wiring |
//! | [`registry`] | Attach-once tracking of matching elements under a container |
//! | [`geom`] | Vector and rectangle primitives |
//! | [`consts`] | Shared constants (thresholds, property and attribute names) |

pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod geom;
pub mod host;
pub mod motion;
pub mod output;
pub mod registry;
