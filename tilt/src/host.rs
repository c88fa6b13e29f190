//! Seams between the engine and its environment.
//!
//! The engine never touches the DOM or the clock directly. A [`Surface`]
//! answers geometry queries and receives styles, a [`FrameScheduler`] hands
//! out per-frame callbacks, and a [`MotionGate`] reports whether motion is
//! currently reduced. The browser implementations live in [`crate::dom`];
//! tests supply their own.

use crate::config::EngineConfig;
use crate::geom::Rect;
use crate::output::FrameStyles;

/// Identifies one pending frame callback so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// The element tree an engine is attached to.
pub trait Surface {
    /// Bounding rectangle of the target element in viewport pixels.
    fn bounds(&self) -> Rect;

    /// Bounding rectangle of a channel element, if it resolves.
    fn channel_bounds(&self, channel: &str) -> Option<Rect>;

    /// Whether `channel` resolves to an element inside the target.
    fn has_channel(&self, channel: &str) -> bool;

    /// One-time setup on the target before the first transform: perspective,
    /// preserve-3d, and clearing the entrance animation when configured.
    fn prepare(&mut self, config: &EngineConfig);

    /// Raise or restore the target's stacking order.
    fn raise(&mut self, z_index: Option<i32>);

    /// Write a frame's styles. Channels that do not resolve are skipped.
    fn apply(&mut self, styles: &FrameStyles);
}

/// Host per-display-frame scheduling primitive.
pub trait FrameScheduler {
    /// Ask for the engine's frame step to run on the next display frame.
    /// Returns `None` when the host could not schedule.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a pending request. Cancelling a handle that already fired is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Read-only accessor for the global motion-reduction flag.
pub trait MotionGate {
    fn motion_reduced(&self) -> bool;
}

impl<F: Fn() -> bool> MotionGate for F {
    fn motion_reduced(&self) -> bool {
        self()
    }
}
