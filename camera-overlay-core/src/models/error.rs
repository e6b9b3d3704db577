use thiserror::Error;

use super::camera::CameraFacing;

/// Errors that can occur while bringing up or tearing down the overlay
/// and its camera session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("no usable camera present")]
    NoCamera,

    #[error("no camera matches requested facing {0:?}")]
    NoMatchingCamera(CameraFacing),

    #[error("camera enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("camera reports no supported output sizes")]
    NoOutputSizes,

    #[error("timed out waiting to lock camera opening")]
    OpenLockTimeout,

    #[error("camera device reported error code {0}")]
    DeviceFailed(i32),

    #[error("capture session configuration failed: {0}")]
    SessionConfigureFailed(String),

    #[error("overlay surface error: {0}")]
    SurfaceError(String),

    #[error("settings storage error: {0}")]
    StorageError(String),
}
