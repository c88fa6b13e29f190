use log::{debug, warn};

use crate::config::{EngineConfig, Layer, MagnetConfig};
use crate::geom::Vec2;
use crate::host::{FrameHandle, FrameScheduler, MotionGate, Surface};
use crate::motion::{ease_toward, layer_offset, magnet_target, normalized_offset, shine, target_rotation, within};
use crate::output::{FrameStyles, LayerStyle, LayerTransform, RootTransform};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Mutable per-target state. Pointer handlers write only the `target_*`
/// fields and `last_pointer`; the frame step owns the `current_*` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    /// Pointer is inside the target and motion is allowed.
    pub is_active: bool,
    /// Interpolated rotation in degrees (x about the horizontal axis).
    pub current_rotation: Vec2,
    pub target_rotation: Vec2,
    /// Interpolated magnet offset in pixels.
    pub current_magnet: Vec2,
    pub target_magnet: Vec2,
    /// Last pointer position in viewport coordinates.
    pub last_pointer: Vec2,
    /// The pending frame callback, if the loop is running.
    pub frame: Option<FrameHandle>,
}

/// What a single frame step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No frame was pending; the callback was stale and ignored.
    Idle,
    /// Styles applied and the next frame requested.
    Continue,
    /// Motion reached rest; outputs cleared and the loop stopped.
    Settled,
    /// Motion reduction is on; outputs cleared and the loop stopped.
    Halted,
}

/// Pointer-driven tilt engine for one target.
///
/// Owns the full lifecycle: pointer tracking, target derivation, the damped
/// per-frame interpolation loop, output composition, and teardown. Every
/// environment interaction goes through the [`Surface`], [`FrameScheduler`]
/// and [`MotionGate`] seams, so the engine runs unchanged under test.
pub struct TiltEngine<S, F, M> {
    config: EngineConfig,
    /// Configured layers whose channel resolved at attach time.
    layers: Vec<Layer>,
    /// Magnet settings, present only when the anchor resolved.
    magnet: Option<MagnetConfig>,
    state: EngineState,
    prepared: bool,
    surface: S,
    scheduler: F,
    gate: M,
}

impl<S: Surface, F: FrameScheduler, M: MotionGate> TiltEngine<S, F, M> {
    /// Bind an engine to `surface`. Layers and the magnet anchor that do not
    /// resolve are dropped silently. Nothing is written until the first
    /// pointer enter.
    #[must_use]
    pub fn attach(config: EngineConfig, surface: S, scheduler: F, gate: M) -> Self {
        let layers: Vec<Layer> = config
            .layers
            .iter()
            .filter(|layer| surface.has_channel(&layer.channel))
            .cloned()
            .collect();
        let magnet = config
            .magnet
            .as_ref()
            .filter(|magnet| surface.has_channel(&magnet.anchor))
            .cloned();
        debug!(
            "tilt: attached with {}/{} layers, magnet {}",
            layers.len(),
            config.layers.len(),
            if magnet.is_some() { "on" } else { "off" }
        );
        Self {
            config,
            layers,
            magnet,
            state: EngineState::default(),
            prepared: false,
            surface,
            scheduler,
            gate,
        }
    }

    // --- Pointer events ---

    /// Pointer entered the target region.
    pub fn pointer_enter(&mut self) {
        if self.gate.motion_reduced() {
            if self.state.frame.is_some() {
                self.halt();
            }
            return;
        }
        if !self.prepared {
            self.surface.prepare(&self.config);
            self.prepared = true;
        }
        self.state.is_active = true;
        if self.config.hover_z_index.is_some() {
            self.surface.raise(self.config.hover_z_index);
        }
        self.ensure_scheduled();
    }

    /// Pointer left the target region. The loop keeps running and decays to
    /// rest on its own.
    pub fn pointer_leave(&mut self) {
        self.state.is_active = false;
        self.state.target_rotation = Vec2::ZERO;
        self.state.target_magnet = Vec2::ZERO;
        if self.config.hover_z_index.is_some() {
            self.surface.raise(None);
        }
        if self.gate.motion_reduced() {
            self.halt();
        }
    }

    /// Pointer moved to `pointer` (viewport coordinates). Ignored unless active.
    pub fn pointer_move(&mut self, pointer: Vec2) {
        if !self.state.is_active || self.gate.motion_reduced() {
            return;
        }
        self.state.last_pointer = pointer;

        let offset = normalized_offset(pointer, &self.surface.bounds());
        self.state.target_rotation = target_rotation(offset, self.config.max_rotation_deg, self.config.facing);

        if let Some(magnet) = &self.magnet {
            self.state.target_magnet = match self.surface.channel_bounds(&magnet.anchor) {
                Some(anchor) if !anchor.is_degenerate() => magnet_target(pointer, anchor.center(), magnet),
                _ => Vec2::ZERO,
            };
        }
    }

    // --- Frame loop ---

    /// One step of the interpolation loop. Hosts call this from the callback
    /// requested through the [`FrameScheduler`].
    pub fn on_frame(&mut self) -> FrameOutcome {
        if self.state.frame.take().is_none() {
            return FrameOutcome::Idle;
        }
        if self.gate.motion_reduced() {
            self.halt();
            return FrameOutcome::Halted;
        }

        let state = &mut self.state;
        state.current_rotation = ease_toward(state.current_rotation, state.target_rotation, self.config.rotation_ease);
        if let Some(magnet) = &self.magnet {
            state.current_magnet = ease_toward(state.current_magnet, state.target_magnet, magnet.ease);
        }

        let styles = self.compose();
        self.surface.apply(&styles);

        let threshold = self.config.settle_threshold;
        let settled = within(self.state.current_rotation, self.state.target_rotation, threshold)
            && within(self.state.current_magnet, self.state.target_magnet, threshold);

        if self.state.is_active || !settled {
            self.ensure_scheduled();
            FrameOutcome::Continue
        } else {
            self.rest();
            debug!("tilt: settled");
            FrameOutcome::Settled
        }
    }

    /// Stop the loop, clear every output and release the pending frame.
    /// The engine can be entered again afterwards.
    pub fn detach(&mut self) {
        if self.config.hover_z_index.is_some() {
            self.surface.raise(None);
        }
        self.stop();
        debug!("tilt: detached");
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a frame callback is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.frame.is_some()
    }

    /// Layers that resolved at attach time.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn has_magnet(&self) -> bool {
        self.magnet.is_some()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    // --- Internals ---

    fn ensure_scheduled(&mut self) {
        if self.state.frame.is_some() {
            return;
        }
        self.state.frame = self.scheduler.request_frame();
        if self.state.frame.is_none() {
            warn!("tilt: host refused a frame request");
        }
    }

    fn compose(&self) -> FrameStyles {
        let state = &self.state;
        let max = self.config.max_rotation_deg;
        let scale = if state.is_active { self.config.hover_scale } else { 1.0 };
        let root = RootTransform {
            rotate_x_deg: state.current_rotation.x,
            rotate_y_deg: state.current_rotation.y,
            scale,
        };
        let highlight = (self.config.shine_opacity > 0.0)
            .then(|| shine(state.current_rotation, state.is_active, self.config.shine_opacity));
        let carrier = self.magnet.as_ref().map(|magnet| magnet.carrier.as_str());
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                let mut offset = layer_offset(state.current_rotation, max, layer, self.config.facing);
                if carrier == Some(layer.channel.as_str()) {
                    offset = offset.add(state.current_magnet);
                }
                LayerStyle {
                    channel: layer.channel.clone(),
                    transform: Some(LayerTransform { offset, z: layer.z() }),
                }
            })
            .collect();
        FrameStyles { root: Some(root), shine: highlight, layers }
    }

    /// Clear outputs and zero the magnet, leaving rotation where it decayed to.
    fn rest(&mut self) {
        self.surface.apply(&FrameStyles::rest(&self.config, &self.layers));
        self.state.current_magnet = Vec2::ZERO;
        self.state.target_magnet = Vec2::ZERO;
    }

    /// Hard stop for motion reduction.
    fn halt(&mut self) {
        self.stop();
        debug!("tilt: halted for reduced motion");
    }

    /// Cancel the pending frame, clear every output and drop all motion.
    fn stop(&mut self) {
        if let Some(handle) = self.state.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.state.is_active = false;
        self.state.current_rotation = Vec2::ZERO;
        self.state.target_rotation = Vec2::ZERO;
        self.rest();
    }
}
