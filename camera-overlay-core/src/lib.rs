//! # camera-overlay-core
//!
//! Platform-agnostic camera overlay core library.
//!
//! Provides camera session management, preview size negotiation, display
//! transforms, settings, and overlay lifecycle orchestration. Platform
//! backends implement the `CameraProvider` and `DisplayHost` traits and
//! plug into the generic `OverlayLifecycleController`.
//!
//! ## Architecture
//!
//! ```text
//! camera-overlay-core (this crate)
//! ├── traits/     ← CameraProvider, CameraDevice, DisplayHost, Notifier,
//! │                 SettingsStore, CapabilityProbe, delegates
//! ├── models/     ← OverlayError, CameraSessionState, PreviewSize,
//! │                 Transform, notifications
//! ├── session/    ← CameraSessionManager, size negotiation,
//! │                 acquisition lock, capability probe
//! ├── overlay/    ← OverlayLifecycleController, restart scheduler
//! └── settings/   ← typed Settings handle, JSON file store
//! ```

pub mod models;
pub mod overlay;
pub mod session;
pub mod settings;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::camera::{
    AutoExposureMode, AutoFocusMode, CameraCharacteristics, CameraFacing, LensFacing,
    PreviewRequest, PreviewSize,
};
pub use models::error::OverlayError;
pub use models::notification::{NotificationKind, OverlayNotification};
pub use models::state::{CameraSessionState, OverlayState};
pub use models::transform::{preview_transform, DisplayRotation, Transform};
pub use overlay::controller::{OverlayLifecycleController, RESTART_DEBOUNCE};
pub use overlay::scheduler::RestartScheduler;
pub use session::lock::AcquisitionLock;
pub use session::manager::{CameraSessionManager, OPEN_LOCK_TIMEOUT};
pub use session::probe::ProviderProbe;
pub use session::size::{choose_optimal_size, largest_by_area};
pub use settings::file_store::FileSettings;
pub use settings::Settings;
pub use traits::camera_device::{CameraDevice, PreviewSession, SessionEvent, SessionEventHandler};
pub use traits::camera_provider::{CameraProvider, DeviceEvent, DeviceEventHandler};
pub use traits::delegate::{OverlayDelegate, SessionDelegate};
pub use traits::display_host::{
    DisplayHost, OverlaySurface, PreviewTarget, ScreenEvent, ScreenEventHandler,
    ScreenSubscription, SurfaceEvent, SurfaceEventHandler, SurfaceHandle,
};
pub use traits::notifier::Notifier;
pub use traits::probe::CapabilityProbe;
pub use traits::settings_store::SettingsStore;
