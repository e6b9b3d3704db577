use std::sync::Arc;

use crate::models::camera::PreviewSize;
use crate::models::error::OverlayError;
use crate::models::transform::{DisplayRotation, Transform};

/// Screen power state change broadcast by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    On,
    Off,
}

pub type ScreenEventHandler = Arc<dyn Fn(ScreenEvent) + Send + Sync + 'static>;

/// Lifecycle of the display surface embedded in an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface is attached and ready to receive frames.
    Available { width: u32, height: u32 },
    /// The surface changed dimensions; only the transform needs
    /// recomputing, not the camera session.
    SizeChanged { width: u32, height: u32 },
    /// The surface is going away. The camera must release its output.
    Destroyed,
}

/// Callback invoked with surface lifecycle events.
///
/// `Available` and `SizeChanged` are delivered asynchronously from the
/// host's dispatch thread. `Destroyed` is delivered synchronously from
/// within `OverlaySurface::remove`, so the camera is provably released
/// before the surface is gone.
pub type SurfaceEventHandler = Arc<dyn Fn(SurfaceEvent) + Send + Sync + 'static>;

/// Opaque token identifying a compositor surface that a camera device
/// can stream frames into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// The camera-facing side of an overlay surface.
pub trait PreviewTarget: Send + Sync {
    /// Size the surface's buffers to the negotiated preview size.
    fn set_buffer_size(&self, size: PreviewSize);

    /// Token a camera device binds its output to.
    fn surface_handle(&self) -> SurfaceHandle;
}

/// A translucent always-on-top surface attached to the display.
pub trait OverlaySurface: Send {
    /// Apply transparency in `[0.0, 1.0]` to the live surface.
    fn set_alpha(&self, alpha: f32);

    /// Apply the preview display transform.
    fn set_transform(&self, transform: Transform);

    /// The camera-facing handle for this surface.
    fn preview_target(&self) -> Arc<dyn PreviewTarget>;

    /// Detach from the display. Delivers `SurfaceEvent::Destroyed` to
    /// the listener before returning. Idempotent.
    fn remove(&self);
}

/// Handle to an active screen-broadcast subscription.
pub trait ScreenSubscription: Send {
    fn cancel(&self);
}

/// Interface to the platform's window/display system.
pub trait DisplayHost: Send + Sync {
    /// Create a system overlay surface wired to `events`.
    fn create_overlay(
        &self,
        events: SurfaceEventHandler,
    ) -> Result<Box<dyn OverlaySurface>, OverlayError>;

    /// Current display rotation relative to natural orientation.
    fn rotation(&self) -> DisplayRotation;

    /// Subscribe to screen on/off broadcasts. The subscription stays
    /// active until cancelled.
    fn subscribe_screen_events(&self, events: ScreenEventHandler) -> Box<dyn ScreenSubscription>;
}
