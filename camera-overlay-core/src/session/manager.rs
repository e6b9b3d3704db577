//! Camera session lifecycle.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::camera::{CameraFacing, LensFacing, PreviewRequest, PreviewSize};
use crate::models::error::OverlayError;
use crate::models::state::CameraSessionState;
use crate::session::lock::AcquisitionLock;
use crate::session::size;
use crate::traits::camera_device::{CameraDevice, PreviewSession, SessionEvent, SessionEventHandler};
use crate::traits::camera_provider::{CameraProvider, DeviceEvent, DeviceEventHandler};
use crate::traits::delegate::SessionDelegate;
use crate::traits::display_host::PreviewTarget;
use crate::traits::probe::CapabilityProbe;

/// How long `open` may wait for the acquisition lock before the attempt
/// fails. Opening can legitimately contend with a slow hardware
/// release, but not indefinitely.
pub const OPEN_LOCK_TIMEOUT: Duration = Duration::from_millis(2500);

/// Mutable session state, protected by `parking_lot::Mutex`.
struct SessionShared {
    state: CameraSessionState,
    camera_id: Option<String>,
    preview_size: Option<PreviewSize>,
    device: Option<Box<dyn CameraDevice>>,
    session: Option<Box<dyn PreviewSession>>,
    target: Option<Arc<dyn PreviewTarget>>,
}

impl SessionShared {
    fn new() -> Self {
        Self {
            state: CameraSessionState::Closed,
            camera_id: None,
            preview_size: None,
            device: None,
            session: None,
            target: None,
        }
    }
}

/// Owns the open/close lifecycle of exactly one hardware camera device
/// and its single repeating preview capture session.
///
/// ```text
/// closed ──open()──▶ opening ──device opened──▶ open
///                       │                         │ session configured
///                       │ disconnected/error      ▼
///                       ▼                      streaming
///                    closed ◀──── closing ◀──close()
/// ```
///
/// Open/close are guarded by a bounded binary acquisition lock,
/// independent of any caller-side serialization: the device-opened
/// callback releases what `open` acquired.
pub struct CameraSessionManager {
    provider: Arc<dyn CameraProvider>,
    probe: Arc<dyn CapabilityProbe>,
    shared: Mutex<SessionShared>,
    lock: AcquisitionLock,
    delegate: Mutex<Option<Arc<dyn SessionDelegate>>>,
    self_weak: Weak<Self>,
}

impl CameraSessionManager {
    pub fn new(provider: Arc<dyn CameraProvider>, probe: Arc<dyn CapabilityProbe>) -> Arc<Self> {
        Arc::new_cyclic(|self_weak| Self {
            provider,
            probe,
            shared: Mutex::new(SessionShared::new()),
            lock: AcquisitionLock::new(),
            delegate: Mutex::new(None),
            self_weak: self_weak.clone(),
        })
    }

    pub fn set_delegate(&self, delegate: Arc<dyn SessionDelegate>) {
        *self.delegate.lock() = Some(delegate);
    }

    pub fn state(&self) -> CameraSessionState {
        self.shared.lock().state
    }

    /// The size negotiated by the current `open`, if any. Discarded on
    /// close.
    pub fn preview_size(&self) -> Option<PreviewSize> {
        self.shared.lock().preview_size
    }

    /// Open the camera matching `facing` and negotiate a preview stream
    /// for the given viewport, binding the output to `target`.
    ///
    /// Any previously held device is closed first. Returns the
    /// negotiated preview size; the opened/streaming transitions arrive
    /// asynchronously through the provider's callbacks.
    pub fn open(
        &self,
        facing: CameraFacing,
        width: u32,
        height: u32,
        target: Arc<dyn PreviewTarget>,
    ) -> Result<PreviewSize, OverlayError> {
        self.close();

        let (camera_id, preview_size) = self.set_up_camera_outputs(facing, width, height)?;
        {
            let mut shared = self.shared.lock();
            shared.camera_id = Some(camera_id.clone());
            shared.preview_size = Some(preview_size);
            shared.target = Some(target);
        }

        if !self.lock.try_acquire_for(OPEN_LOCK_TIMEOUT) {
            let mut shared = self.shared.lock();
            shared.preview_size = None;
            shared.target = None;
            return Err(OverlayError::OpenLockTimeout);
        }
        self.set_state(CameraSessionState::Opening);

        let weak = self.self_weak.clone();
        let events: DeviceEventHandler = Arc::new(move |event| {
            if let Some(manager) = weak.upgrade() {
                manager.handle_device_event(event);
            }
        });

        if let Err(e) = self.provider.open(&camera_id, events) {
            self.lock.release();
            self.set_state(CameraSessionState::Closed);
            return Err(e);
        }

        log::debug!(
            "opening camera {} for a {}x{} preview",
            camera_id,
            preview_size.width,
            preview_size.height
        );
        Ok(preview_size)
    }

    /// Close the capture session and the device, blocking on the
    /// acquisition lock. Idempotent; safe to call while an open is in
    /// flight (the in-flight completion will find the device gone).
    pub fn close(&self) {
        self.lock.acquire();

        let (session, device) = {
            let mut shared = self.shared.lock();
            (shared.session.take(), shared.device.take())
        };
        let had_resources = session.is_some() || device.is_some();
        if had_resources {
            self.set_state(CameraSessionState::Closing);
        }

        if let Some(mut session) = session {
            session.close();
        }
        if let Some(mut device) = device {
            device.close();
        }

        {
            let mut shared = self.shared.lock();
            shared.camera_id = None;
            shared.preview_size = None;
            shared.target = None;
        }
        if had_resources || self.shared.lock().state != CameraSessionState::Closed {
            self.set_state(CameraSessionState::Closed);
        }

        self.lock.release();
    }

    /// Resolve a camera identifier for `facing` and negotiate the
    /// preview size for the requested viewport.
    ///
    /// A front camera only qualifies when the capability probe
    /// independently confirms one; requesting front without that
    /// capability resolves to no identifier rather than silently
    /// substituting the back camera.
    fn set_up_camera_outputs(
        &self,
        facing: CameraFacing,
        width: u32,
        height: u32,
    ) -> Result<(String, PreviewSize), OverlayError> {
        let has_front_camera = self.probe.has_front_camera();

        let mut back_id = None;
        let mut front_id = None;
        for camera_id in self.provider.camera_ids()? {
            let info = self.provider.characteristics(&camera_id)?;
            match info.lens_facing {
                LensFacing::Back => back_id = Some(camera_id),
                LensFacing::Front if has_front_camera => front_id = Some(camera_id),
                _ => {}
            }
        }

        let camera_id = match facing {
            CameraFacing::Back => back_id,
            CameraFacing::Front => front_id,
        }
        .ok_or(OverlayError::NoMatchingCamera(facing))?;

        let info = self.provider.characteristics(&camera_id)?;

        // The largest still-capture size fixes the target aspect ratio.
        let largest = size::largest_by_area(&info.still_capture_sizes)
            .ok_or(OverlayError::NoOutputSizes)?;
        let preview_size = size::choose_optimal_size(&info.preview_sizes, width, height, largest)
            .ok_or(OverlayError::NoOutputSizes)?;

        Ok((camera_id, preview_size))
    }

    fn set_state(&self, new_state: CameraSessionState) {
        {
            self.shared.lock().state = new_state;
        }
        let delegate = self.delegate.lock().clone();
        if let Some(delegate) = delegate {
            delegate.on_state_changed(new_state);
        }
    }

    /// Single dispatch point for device state transitions.
    fn handle_device_event(&self, event: DeviceEvent) {
        match event {
            DeviceEvent::Opened(device) => {
                // Store the handle before releasing the lock so a
                // concurrent close finds and releases it.
                {
                    self.shared.lock().device = Some(device);
                }
                self.lock.release();
                self.set_state(CameraSessionState::Open);
                self.create_preview_session();
            }
            DeviceEvent::Disconnected => {
                self.lock.release();
                self.discard_device();
                log::warn!("camera disconnected");
            }
            DeviceEvent::Error(code) => {
                self.lock.release();
                self.discard_device();
                log::error!("camera device error {}", code);
                let delegate = self.delegate.lock().clone();
                if let Some(delegate) = delegate {
                    delegate.on_device_error(code);
                }
            }
        }
    }

    fn discard_device(&self) {
        let device = { self.shared.lock().device.take() };
        if let Some(mut device) = device {
            device.close();
        }
        self.set_state(CameraSessionState::Closed);
    }

    /// Ask the open device for a capture session bound to the
    /// negotiated preview target.
    fn create_preview_session(&self) {
        let (target, preview_size) = {
            let shared = self.shared.lock();
            match (&shared.target, shared.preview_size) {
                (Some(target), Some(size)) => (Arc::clone(target), size),
                _ => return,
            }
        };

        target.set_buffer_size(preview_size);
        let handle = target.surface_handle();

        let weak = self.self_weak.clone();
        let events: SessionEventHandler = Arc::new(move |event| {
            if let Some(manager) = weak.upgrade() {
                manager.handle_session_event(event);
            }
        });

        let result = {
            let mut shared = self.shared.lock();
            match shared.device.as_mut() {
                Some(device) => device.create_preview_session(handle, events),
                // close() ran while the open completion was in flight.
                None => return,
            }
        };
        if let Err(e) = result {
            // Soft failure: no preview starts, no automatic retry.
            log::warn!("failed to create preview session: {}", e);
        }
    }

    /// Capture-session configuration completion. Must not resurrect a
    /// device that close() already released.
    fn handle_session_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Configured(mut session) => {
                let streaming = {
                    let mut shared = self.shared.lock();
                    if shared.device.is_none() {
                        // The device was closed while configuration was
                        // in flight.
                        return;
                    }
                    match session.set_repeating(PreviewRequest::default()) {
                        Ok(()) => {
                            shared.session = Some(session);
                            shared.state = CameraSessionState::Streaming;
                            true
                        }
                        Err(e) => {
                            log::warn!("failed to submit repeating preview request: {}", e);
                            false
                        }
                    }
                };
                if streaming {
                    let delegate = self.delegate.lock().clone();
                    if let Some(delegate) = delegate {
                        delegate.on_state_changed(CameraSessionState::Streaming);
                    }
                }
            }
            SessionEvent::ConfigureFailed(reason) => {
                log::warn!("capture session configuration failed: {}", reason);
            }
        }
    }
}
