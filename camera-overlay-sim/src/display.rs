//! Simulated display and window system.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use camera_overlay_core::{
    DisplayHost, DisplayRotation, OverlayError, OverlaySurface, PreviewSize, PreviewTarget,
    ScreenEvent, ScreenEventHandler, ScreenSubscription, SurfaceEvent, SurfaceEventHandler,
    SurfaceHandle, Transform,
};

use crate::dispatcher::EventDispatcher;

struct SurfaceShared {
    handle: SurfaceHandle,
    alpha: Mutex<f32>,
    transform: Mutex<Transform>,
    buffer_size: Mutex<Option<PreviewSize>>,
    destroyed: AtomicBool,
    events: SurfaceEventHandler,
}

impl SurfaceShared {
    fn is_live(&self) -> bool {
        !self.destroyed.load(Ordering::SeqCst)
    }
}

impl PreviewTarget for SurfaceShared {
    fn set_buffer_size(&self, size: PreviewSize) {
        *self.buffer_size.lock() = Some(size);
    }

    fn surface_handle(&self) -> SurfaceHandle {
        self.handle
    }
}

struct SimSurface {
    shared: Arc<SurfaceShared>,
}

impl OverlaySurface for SimSurface {
    fn set_alpha(&self, alpha: f32) {
        *self.shared.alpha.lock() = alpha;
    }

    fn set_transform(&self, transform: Transform) {
        *self.shared.transform.lock() = transform;
    }

    fn preview_target(&self) -> Arc<dyn PreviewTarget> {
        Arc::clone(&self.shared) as Arc<dyn PreviewTarget>
    }

    fn remove(&self) {
        if !self.shared.destroyed.swap(true, Ordering::SeqCst) {
            // Synchronous on purpose: the owner must see Destroyed
            // before remove returns.
            (self.shared.events)(SurfaceEvent::Destroyed);
        }
    }
}

struct Inner {
    viewport: (u32, u32),
    rotation: DisplayRotation,
    fail_overlay_creation: bool,
    next_handle: u64,
    next_subscription: u64,
    surfaces: Vec<Arc<SurfaceShared>>,
    screen_handlers: Vec<(u64, ScreenEventHandler)>,
    max_live_overlays: usize,
}

/// In-memory `DisplayHost` with a settable viewport, rotation, screen
/// power simulation, and surface inspection for tests.
///
/// `Available` and `SizeChanged` arrive from the display dispatcher
/// thread; `Destroyed` is delivered synchronously by `remove`.
pub struct SimDisplay {
    dispatcher: Arc<EventDispatcher>,
    inner: Arc<Mutex<Inner>>,
}

impl SimDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dispatcher: Arc::new(EventDispatcher::new("sim-display-events")),
            inner: Arc::new(Mutex::new(Inner {
                viewport: (width, height),
                rotation: DisplayRotation::Deg0,
                fail_overlay_creation: false,
                next_handle: 1,
                next_subscription: 1,
                surfaces: Vec::new(),
                screen_handlers: Vec::new(),
                max_live_overlays: 0,
            })),
        }
    }

    pub fn fail_overlay_creation(&self, fail: bool) {
        self.inner.lock().fail_overlay_creation = fail;
    }

    pub fn set_rotation(&self, rotation: DisplayRotation) {
        self.inner.lock().rotation = rotation;
    }

    /// Change the viewport and notify live surfaces of the new size.
    pub fn resize(&self, width: u32, height: u32) {
        let handlers: Vec<SurfaceEventHandler> = {
            let mut inner = self.inner.lock();
            inner.viewport = (width, height);
            inner
                .surfaces
                .iter()
                .filter(|s| s.is_live())
                .map(|s| Arc::clone(&s.events))
                .collect()
        };
        for events in handlers {
            self.dispatcher
                .post(move || events(SurfaceEvent::SizeChanged { width, height }));
        }
    }

    pub fn screen_off(&self) {
        self.broadcast(ScreenEvent::Off);
    }

    pub fn screen_on(&self) {
        self.broadcast(ScreenEvent::On);
    }

    fn broadcast(&self, event: ScreenEvent) {
        let handlers: Vec<ScreenEventHandler> = self
            .inner
            .lock()
            .screen_handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            self.dispatcher.post(move || handler(event));
        }
    }

    /// Block until already-queued display events have been delivered.
    pub fn flush(&self) {
        self.dispatcher.flush();
    }

    pub fn live_overlays(&self) -> usize {
        self.inner.lock().surfaces.iter().filter(|s| s.is_live()).count()
    }

    /// Highest number of simultaneously live overlay surfaces ever
    /// observed.
    pub fn max_live_overlays(&self) -> usize {
        self.inner.lock().max_live_overlays
    }

    pub fn screen_subscriptions(&self) -> usize {
        self.inner.lock().screen_handlers.len()
    }

    fn last_live_surface(&self) -> Option<Arc<SurfaceShared>> {
        self.inner
            .lock()
            .surfaces
            .iter()
            .rev()
            .find(|s| s.is_live())
            .cloned()
    }

    pub fn surface_alpha(&self) -> Option<f32> {
        self.last_live_surface().map(|s| *s.alpha.lock())
    }

    pub fn surface_transform(&self) -> Option<Transform> {
        self.last_live_surface().map(|s| *s.transform.lock())
    }

    pub fn surface_buffer_size(&self) -> Option<PreviewSize> {
        self.last_live_surface().and_then(|s| *s.buffer_size.lock())
    }
}

impl DisplayHost for SimDisplay {
    fn create_overlay(
        &self,
        events: SurfaceEventHandler,
    ) -> Result<Box<dyn OverlaySurface>, OverlayError> {
        let (shared, width, height) = {
            let mut inner = self.inner.lock();
            if inner.fail_overlay_creation {
                return Err(OverlayError::SurfaceError(
                    "simulated overlay creation failure".to_string(),
                ));
            }
            let handle = SurfaceHandle(inner.next_handle);
            inner.next_handle += 1;
            let shared = Arc::new(SurfaceShared {
                handle,
                alpha: Mutex::new(1.0),
                transform: Mutex::new(Transform::IDENTITY),
                buffer_size: Mutex::new(None),
                destroyed: AtomicBool::new(false),
                events,
            });
            inner.surfaces.push(Arc::clone(&shared));
            let live = inner.surfaces.iter().filter(|s| s.is_live()).count();
            inner.max_live_overlays = inner.max_live_overlays.max(live);
            let (width, height) = inner.viewport;
            (shared, width, height)
        };

        log::debug!("sim: created overlay surface {:?}", shared.handle);
        let events = Arc::clone(&shared.events);
        self.dispatcher
            .post(move || events(SurfaceEvent::Available { width, height }));
        Ok(Box::new(SimSurface { shared }))
    }

    fn rotation(&self) -> DisplayRotation {
        self.inner.lock().rotation
    }

    fn subscribe_screen_events(&self, events: ScreenEventHandler) -> Box<dyn ScreenSubscription> {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_subscription;
            inner.next_subscription += 1;
            inner.screen_handlers.push((id, events));
            id
        };
        Box::new(SimSubscription {
            inner: Arc::clone(&self.inner),
            id,
        })
    }
}

struct SimSubscription {
    inner: Arc<Mutex<Inner>>,
    id: u64,
}

impl ScreenSubscription for SimSubscription {
    fn cancel(&self) {
        self.inner
            .lock()
            .screen_handlers
            .retain(|(id, _)| *id != self.id);
    }
}
