//! Overlay lifecycle orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::camera::{CameraFacing, PreviewSize};
use crate::models::notification::OverlayNotification;
use crate::models::state::{CameraSessionState, OverlayState};
use crate::models::transform;
use crate::overlay::scheduler::RestartScheduler;
use crate::session::manager::CameraSessionManager;
use crate::settings::Settings;
use crate::traits::delegate::{OverlayDelegate, SessionDelegate};
use crate::traits::display_host::{
    DisplayHost, OverlaySurface, ScreenEvent, ScreenEventHandler, ScreenSubscription,
    SurfaceEvent, SurfaceEventHandler,
};
use crate::traits::notifier::Notifier;
use crate::traits::probe::CapabilityProbe;

/// Facing changes within this window collapse into one restart.
pub const RESTART_DEBOUNCE: Duration = Duration::from_millis(750);

/// Orchestrates the overlay surface, the camera session, screen on/off
/// handling, and restart debouncing.
///
/// All restart-sensitive transitions (start, stop, restart, screen
/// on/off, the device-error stop) serialize under one internal lock.
/// Callbacks that only close the camera stay outside it, so the
/// synchronous surface-destroyed delivery cannot self-deadlock.
pub struct OverlayLifecycleController {
    session: Arc<CameraSessionManager>,
    display: Arc<dyn DisplayHost>,
    notifier: Arc<dyn Notifier>,
    probe: Arc<dyn CapabilityProbe>,
    settings: Settings,
    delegate: Mutex<Option<Arc<dyn OverlayDelegate>>>,
    restart_lock: Mutex<()>,
    overlay: Mutex<Option<Box<dyn OverlaySurface>>>,
    screen_subscription: Mutex<Option<Box<dyn ScreenSubscription>>>,
    active: AtomicBool,
    run_id: Mutex<Option<Uuid>>,
    scheduler: RestartScheduler,
    self_weak: Weak<Self>,
}

impl OverlayLifecycleController {
    pub fn new(
        session: Arc<CameraSessionManager>,
        display: Arc<dyn DisplayHost>,
        notifier: Arc<dyn Notifier>,
        probe: Arc<dyn CapabilityProbe>,
        settings: Settings,
    ) -> Arc<Self> {
        let controller = Arc::new_cyclic(|self_weak: &Weak<Self>| {
            let scheduler = {
                let weak = self_weak.clone();
                RestartScheduler::new(move || {
                    if let Some(controller) = weak.upgrade() {
                        controller.perform_scheduled_restart();
                    }
                })
            };
            Self {
                session,
                display,
                notifier,
                probe,
                settings,
                delegate: Mutex::new(None),
                restart_lock: Mutex::new(()),
                overlay: Mutex::new(None),
                screen_subscription: Mutex::new(None),
                active: AtomicBool::new(false),
                run_id: Mutex::new(None),
                scheduler,
                self_weak: self_weak.clone(),
            }
        });
        // The bridge holds a weak reference; the manager must not keep
        // its owning controller alive.
        controller.session.set_delegate(Arc::new(SessionBridge {
            controller: controller.self_weak.clone(),
        }));
        controller
    }

    pub fn set_delegate(&self, delegate: Arc<dyn OverlayDelegate>) {
        *self.delegate.lock() = Some(delegate);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn overlay_state(&self) -> OverlayState {
        if self.overlay.lock().is_some() {
            OverlayState::Present
        } else {
            OverlayState::Absent
        }
    }

    /// Bring the overlay up.
    ///
    /// With no usable camera this terminates immediately and creates
    /// nothing. Called while already active it stops the existing
    /// overlay instead (the user-facing toggle).
    pub fn start(&self) {
        if !self.probe.has_camera() {
            log::warn!("no camera available, overlay cannot start");
            self.signal_service_stop();
            return;
        }
        if self.active.load(Ordering::SeqCst) {
            self.stop(false);
            return;
        }

        let _guard = self.restart_lock.lock();
        let run_id = Uuid::new_v4();
        *self.run_id.lock() = Some(run_id);
        log::info!("starting overlay run {}", run_id);

        self.reset_views();
        self.subscribe_screen_events();
        if self.setup_views() {
            self.notifier.post(OverlayNotification::started());
            self.active.store(true, Ordering::SeqCst);
        } else {
            self.unsubscribe_screen_events();
            *self.run_id.lock() = None;
            self.signal_service_stop();
        }
    }

    /// Tear the overlay down. Idempotent.
    ///
    /// `should_restart` posts the restarting notice so the user knows
    /// the teardown is transient.
    pub fn stop(&self, should_restart: bool) {
        let _guard = self.restart_lock.lock();
        self.stop_locked(should_restart);
    }

    fn stop_locked(&self, should_restart: bool) {
        // A pending debounced restart must not resurrect the overlay.
        self.scheduler.cancel();
        let was_active = self.active.swap(false, Ordering::SeqCst);
        self.unsubscribe_screen_events();
        self.reset_views();
        if was_active {
            if let Some(run_id) = self.run_id.lock().take() {
                log::info!("stopped overlay run {}", run_id);
            }
            self.notifier.cancel_all();
            if should_restart {
                self.notifier.post(OverlayNotification::restarting());
            }
        }
        self.signal_service_stop();
    }

    /// Recreate the overlay for the active run, debounced.
    ///
    /// Views come down immediately; recreation waits out the debounce
    /// window so a burst of facing changes costs one camera cycle. With
    /// in-place restarts disabled this is a full stop instead.
    pub fn restart(&self) {
        let _guard = self.restart_lock.lock();
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        if self.settings.auto_restart_on_facing_change() {
            self.reset_views();
            self.scheduler.schedule(RESTART_DEBOUNCE);
        } else {
            self.stop_locked(true);
        }
    }

    /// Apply transparency to the live surface without persisting it.
    /// No-op when no surface is up.
    pub fn set_alpha(&self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if let Some(overlay) = self.overlay.lock().as_ref() {
            overlay.set_alpha(alpha);
        }
    }

    /// Control-surface entry point: persist the facing and recreate the
    /// preview with the new camera.
    pub fn request_facing_change(&self, facing: CameraFacing) {
        self.settings.set_camera_facing(facing);
        self.restart();
    }

    /// Control-surface entry point: live alpha while the user drags the
    /// slider. Never persisted.
    pub fn request_alpha_preview(&self, alpha: f32) {
        self.set_alpha(alpha);
    }

    /// Control-surface entry point: persist the alpha the user settled
    /// on. The surface already shows it.
    pub fn request_alpha_commit(&self, alpha: f32) {
        self.settings.set_alpha(alpha);
    }

    /// The facing actually used for opening: a persisted front
    /// preference degrades to back when no front camera exists.
    fn effective_facing(&self) -> CameraFacing {
        match self.settings.camera_facing() {
            CameraFacing::Front if !self.probe.has_front_camera() => CameraFacing::Back,
            facing => facing,
        }
    }

    /// Create the overlay surface and apply the persisted alpha. The
    /// camera opens later, when the surface reports itself available.
    fn setup_views(&self) -> bool {
        let weak = self.self_weak.clone();
        let events: SurfaceEventHandler = Arc::new(move |event| {
            if let Some(controller) = weak.upgrade() {
                controller.handle_surface_event(event);
            }
        });
        match self.display.create_overlay(events) {
            Ok(surface) => {
                surface.set_alpha(self.settings.alpha());
                *self.overlay.lock() = Some(surface);
                true
            }
            Err(e) => {
                log::error!("failed to create overlay surface: {}", e);
                false
            }
        }
    }

    /// Close the camera, then detach the surface. The surface mutex is
    /// not held across `remove`, which calls back synchronously.
    fn reset_views(&self) {
        let overlay = self.overlay.lock().take();
        if let Some(overlay) = overlay {
            self.session.close();
            overlay.remove();
        }
    }

    fn subscribe_screen_events(&self) {
        let mut subscription = self.screen_subscription.lock();
        if subscription.is_some() {
            return;
        }
        let weak = self.self_weak.clone();
        let handler: ScreenEventHandler = Arc::new(move |event| {
            if let Some(controller) = weak.upgrade() {
                controller.handle_screen_event(event);
            }
        });
        *subscription = Some(self.display.subscribe_screen_events(handler));
    }

    fn unsubscribe_screen_events(&self) {
        if let Some(subscription) = self.screen_subscription.lock().take() {
            subscription.cancel();
        }
    }

    fn handle_surface_event(&self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Available { width, height } => {
                let target = self.overlay.lock().as_ref().map(|s| s.preview_target());
                let Some(target) = target else {
                    return;
                };
                match self
                    .session
                    .open(self.effective_facing(), width, height, target)
                {
                    Ok(preview) => self.apply_transform(width, height, preview),
                    Err(e) => {
                        log::error!("failed to open camera: {}", e);
                        self.notifier.post(OverlayNotification::error());
                        self.stop(true);
                    }
                }
            }
            SurfaceEvent::SizeChanged { width, height } => {
                if let Some(preview) = self.session.preview_size() {
                    self.apply_transform(width, height, preview);
                }
            }
            SurfaceEvent::Destroyed => {
                self.session.close();
            }
        }
    }

    fn apply_transform(&self, view_width: u32, view_height: u32, preview: PreviewSize) {
        let transform = transform::preview_transform(
            view_width,
            view_height,
            preview,
            self.display.rotation(),
        );
        if let Some(overlay) = self.overlay.lock().as_ref() {
            overlay.set_transform(transform);
        }
    }

    fn handle_screen_event(&self, event: ScreenEvent) {
        let _guard = self.restart_lock.lock();
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        match event {
            ScreenEvent::Off => {
                log::debug!("screen off, tearing down views");
                self.reset_views();
            }
            ScreenEvent::On => {
                log::debug!("screen on, recreating views");
                self.subscribe_screen_events();
                if self.overlay.lock().is_none() && !self.setup_views() {
                    log::warn!("could not recreate overlay after screen on");
                }
            }
        }
    }

    fn perform_scheduled_restart(&self) {
        let _guard = self.restart_lock.lock();
        if !self.active.load(Ordering::SeqCst) {
            return;
        }
        self.reset_views();
        if !self.setup_views() {
            self.stop_locked(false);
        }
    }

    fn signal_service_stop(&self) {
        let delegate = self.delegate.lock().clone();
        if let Some(delegate) = delegate {
            delegate.on_service_stop();
        }
    }
}

/// Forwards camera session callbacks to the controller.
struct SessionBridge {
    controller: Weak<OverlayLifecycleController>,
}

impl SessionDelegate for SessionBridge {
    fn on_state_changed(&self, state: CameraSessionState) {
        log::debug!("camera session state: {:?}", state);
    }

    /// A fatal device error takes the whole overlay down, not just the
    /// camera.
    fn on_device_error(&self, code: i32) {
        if let Some(controller) = self.controller.upgrade() {
            log::error!("camera device error {}, stopping overlay", code);
            controller.stop(false);
        }
    }
}

impl Drop for OverlayLifecycleController {
    fn drop(&mut self) {
        self.unsubscribe_screen_events();
        self.reset_views();
    }
}
