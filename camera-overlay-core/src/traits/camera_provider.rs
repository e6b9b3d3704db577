use std::sync::Arc;

use crate::models::camera::CameraCharacteristics;
use crate::models::error::OverlayError;
use crate::traits::camera_device::CameraDevice;

/// Asynchronous device state transition, reported once per `open` call.
///
/// Exactly one of these follows a successful `CameraProvider::open`;
/// `Disconnected` and `Error` may also arrive later while the device is
/// held.
pub enum DeviceEvent {
    /// The device finished opening and is ready for session creation.
    Opened(Box<dyn CameraDevice>),
    /// The device is no longer available (e.g. claimed by another
    /// client). The handle must be discarded.
    Disconnected,
    /// The device failed with a hardware-reported error code. The
    /// handle must be discarded and the owning overlay stopped.
    Error(i32),
}

/// Callback invoked with device state events.
///
/// Providers deliver events from their own dispatch thread, never from
/// within the `open` call itself.
pub type DeviceEventHandler = Arc<dyn Fn(DeviceEvent) + Send + Sync + 'static>;

/// Interface to the platform's camera service.
///
/// Implemented by platform backends; `camera-overlay-sim` provides the
/// simulated reference implementation used in tests.
pub trait CameraProvider: Send + Sync {
    /// Identifiers of every camera the hardware exposes.
    fn camera_ids(&self) -> Result<Vec<String>, OverlayError>;

    /// Static capabilities for one identifier.
    fn characteristics(&self, camera_id: &str) -> Result<CameraCharacteristics, OverlayError>;

    /// Begin the asynchronous open protocol for `camera_id`. Completion
    /// (or failure) is reported through `events`.
    fn open(&self, camera_id: &str, events: DeviceEventHandler) -> Result<(), OverlayError>;
}
