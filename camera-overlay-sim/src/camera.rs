//! Simulated camera service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use camera_overlay_core::{
    CameraCharacteristics, CameraDevice, CameraProvider, CapabilityProbe, DeviceEvent,
    DeviceEventHandler, LensFacing, OverlayError, PreviewRequest, PreviewSession, PreviewSize,
    SessionEvent, SessionEventHandler, SurfaceHandle,
};

use crate::dispatcher::EventDispatcher;

/// Static description of one simulated camera.
#[derive(Debug, Clone)]
pub struct SimCameraSpec {
    pub id: String,
    pub lens_facing: LensFacing,
    pub preview_sizes: Vec<PreviewSize>,
    pub still_capture_sizes: Vec<PreviewSize>,
}

impl SimCameraSpec {
    /// A back camera with a 4:3 still-capture reference, so a 640x480
    /// viewport negotiates the 640x480 preview stream.
    pub fn back() -> Self {
        Self {
            id: "0".to_string(),
            lens_facing: LensFacing::Back,
            preview_sizes: vec![PreviewSize::new(1920, 1080), PreviewSize::new(640, 480)],
            still_capture_sizes: vec![PreviewSize::new(640, 480)],
        }
    }

    pub fn front() -> Self {
        Self {
            id: "1".to_string(),
            lens_facing: LensFacing::Front,
            ..Self::back()
        }
    }
}

#[derive(Default)]
struct Counters {
    opens: AtomicUsize,
    open_devices: AtomicUsize,
    max_open_devices: AtomicUsize,
}

struct Inner {
    specs: Vec<SimCameraSpec>,
    fail_enumeration: bool,
    open_error: Option<i32>,
    active_handler: Option<DeviceEventHandler>,
    last_open_id: Option<String>,
}

/// In-memory `CameraProvider` with fault injection.
///
/// Device and session events are delivered from a dedicated dispatcher
/// thread, like a real camera service's callback thread.
pub struct SimCamera {
    dispatcher: Arc<EventDispatcher>,
    inner: Mutex<Inner>,
    counters: Arc<Counters>,
}

impl SimCamera {
    pub fn new(specs: Vec<SimCameraSpec>) -> Self {
        Self {
            dispatcher: Arc::new(EventDispatcher::new("sim-camera-events")),
            inner: Mutex::new(Inner {
                specs,
                fail_enumeration: false,
                open_error: None,
                active_handler: None,
                last_open_id: None,
            }),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.inner.lock().fail_enumeration = fail;
    }

    /// Make subsequent opens complete with a device error instead of an
    /// opened device.
    pub fn set_open_error(&self, code: Option<i32>) {
        self.inner.lock().open_error = code;
    }

    /// Deliver a device error through the most recent open's callback.
    pub fn emit_device_error(&self, code: i32) {
        if let Some(handler) = self.inner.lock().active_handler.clone() {
            self.dispatcher.post(move || handler(DeviceEvent::Error(code)));
        }
    }

    /// Deliver a disconnect through the most recent open's callback.
    pub fn emit_disconnect(&self) {
        if let Some(handler) = self.inner.lock().active_handler.clone() {
            self.dispatcher.post(move || handler(DeviceEvent::Disconnected));
        }
    }

    /// Block until already-queued camera events have been delivered.
    pub fn flush(&self) {
        self.dispatcher.flush();
    }

    pub fn open_count(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn open_devices(&self) -> usize {
        self.counters.open_devices.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously open devices ever observed.
    pub fn max_open_devices(&self) -> usize {
        self.counters.max_open_devices.load(Ordering::SeqCst)
    }

    pub fn last_open_id(&self) -> Option<String> {
        self.inner.lock().last_open_id.clone()
    }
}

impl CameraProvider for SimCamera {
    fn camera_ids(&self) -> Result<Vec<String>, OverlayError> {
        let inner = self.inner.lock();
        if inner.fail_enumeration {
            return Err(OverlayError::EnumerationFailed(
                "simulated enumeration failure".to_string(),
            ));
        }
        Ok(inner.specs.iter().map(|spec| spec.id.clone()).collect())
    }

    fn characteristics(&self, camera_id: &str) -> Result<CameraCharacteristics, OverlayError> {
        let inner = self.inner.lock();
        if inner.fail_enumeration {
            return Err(OverlayError::EnumerationFailed(
                "simulated enumeration failure".to_string(),
            ));
        }
        inner
            .specs
            .iter()
            .find(|spec| spec.id == camera_id)
            .map(|spec| CameraCharacteristics {
                lens_facing: spec.lens_facing,
                preview_sizes: spec.preview_sizes.clone(),
                still_capture_sizes: spec.still_capture_sizes.clone(),
            })
            .ok_or_else(|| {
                OverlayError::EnumerationFailed(format!("unknown camera {}", camera_id))
            })
    }

    fn open(&self, camera_id: &str, events: DeviceEventHandler) -> Result<(), OverlayError> {
        let open_error = {
            let mut inner = self.inner.lock();
            if !inner.specs.iter().any(|spec| spec.id == camera_id) {
                return Err(OverlayError::EnumerationFailed(format!(
                    "unknown camera {}",
                    camera_id
                )));
            }
            inner.last_open_id = Some(camera_id.to_string());
            inner.active_handler = Some(Arc::clone(&events));
            inner.open_error
        };
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        log::debug!("sim: opening camera {}", camera_id);

        if let Some(code) = open_error {
            self.dispatcher.post(move || events(DeviceEvent::Error(code)));
            return Ok(());
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let counters = Arc::clone(&self.counters);
        self.dispatcher.post(move || {
            let now = counters.open_devices.fetch_add(1, Ordering::SeqCst) + 1;
            counters.max_open_devices.fetch_max(now, Ordering::SeqCst);
            let device = SimDevice {
                dispatcher,
                counters,
                closed: false,
            };
            events(DeviceEvent::Opened(Box::new(device)));
        });
        Ok(())
    }
}

struct SimDevice {
    dispatcher: Arc<EventDispatcher>,
    counters: Arc<Counters>,
    closed: bool,
}

impl CameraDevice for SimDevice {
    fn create_preview_session(
        &mut self,
        _target: SurfaceHandle,
        events: SessionEventHandler,
    ) -> Result<(), OverlayError> {
        if self.closed {
            return Err(OverlayError::SessionConfigureFailed(
                "device is closed".to_string(),
            ));
        }
        self.dispatcher.post(move || {
            events(SessionEvent::Configured(Box::new(SimSession)));
        });
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.open_devices.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

struct SimSession;

impl PreviewSession for SimSession {
    fn set_repeating(&mut self, _request: PreviewRequest) -> Result<(), OverlayError> {
        Ok(())
    }

    fn close(&mut self) {}
}

/// A capability probe with fixed answers, independent of any provider.
pub struct FixedProbe {
    camera: bool,
    front: bool,
}

impl FixedProbe {
    pub fn new(camera: bool, front: bool) -> Self {
        Self { camera, front }
    }
}

impl CapabilityProbe for FixedProbe {
    fn has_camera(&self) -> bool {
        self.camera
    }

    fn has_front_camera(&self) -> bool {
        self.front
    }
}
