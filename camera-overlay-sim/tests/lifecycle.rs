//! End-to-end overlay lifecycle scenarios against the simulated backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use camera_overlay_core::{
    preview_transform, CameraFacing, CameraProvider, CameraSessionManager, CameraSessionState,
    CapabilityProbe, DisplayRotation, NotificationKind, OverlayDelegate,
    OverlayLifecycleController, OverlayError, PreviewSize, PreviewTarget, ProviderProbe, Settings,
    SettingsStore, SurfaceHandle,
};
use camera_overlay_core::settings::keys;
use camera_overlay_sim::{
    FixedProbe, MemorySettings, RecordingNotifier, SimCamera, SimCameraSpec, SimDisplay,
};

#[derive(Default)]
struct StopSignal(AtomicUsize);

impl StopSignal {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl OverlayDelegate for StopSignal {
    fn on_service_stop(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    camera: Arc<SimCamera>,
    display: Arc<SimDisplay>,
    notifier: Arc<RecordingNotifier>,
    store: Arc<MemorySettings>,
    session: Arc<CameraSessionManager>,
    controller: Arc<OverlayLifecycleController>,
    stops: Arc<StopSignal>,
}

impl Harness {
    fn with_cameras(specs: Vec<SimCameraSpec>) -> Self {
        let camera = Arc::new(SimCamera::new(specs));
        let probe = Arc::new(ProviderProbe::new(
            Arc::clone(&camera) as Arc<dyn CameraProvider>
        ));
        Self::build(camera, probe)
    }

    fn build(camera: Arc<SimCamera>, probe: Arc<dyn CapabilityProbe>) -> Self {
        let display = Arc::new(SimDisplay::new(640, 480));
        let notifier = Arc::new(RecordingNotifier::new());
        let store = Arc::new(MemorySettings::new());
        let settings = Settings::new(Arc::clone(&store) as Arc<dyn SettingsStore>);

        let session = CameraSessionManager::new(
            Arc::clone(&camera) as Arc<dyn CameraProvider>,
            Arc::clone(&probe),
        );
        let controller = OverlayLifecycleController::new(
            Arc::clone(&session),
            Arc::clone(&display) as _,
            Arc::clone(&notifier) as _,
            probe,
            settings,
        );
        let stops = Arc::new(StopSignal::default());
        controller.set_delegate(Arc::clone(&stops) as Arc<dyn OverlayDelegate>);

        Self {
            camera,
            display,
            notifier,
            store,
            session,
            controller,
            stops,
        }
    }

    /// Let in-flight events drain. Each round covers one
    /// surface-available delivery on the display thread plus the
    /// device-opened and session-configured deliveries on the camera
    /// thread; screen-on handling queues its surface-available from
    /// inside the first round, so run a few rounds.
    fn settle(&self) {
        for _ in 0..3 {
            self.display.flush();
            self.camera.flush();
            self.camera.flush();
        }
    }
}

#[test]
fn start_reaches_streaming_with_negotiated_size() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();

    assert!(h.controller.is_active());
    assert!(h.controller.overlay_state().is_present());
    assert!(h.session.state().is_streaming());
    assert_eq!(h.session.preview_size(), Some(PreviewSize::new(640, 480)));
    assert_eq!(h.display.surface_buffer_size(), Some(PreviewSize::new(640, 480)));
    assert_eq!(h.display.live_overlays(), 1);
    assert_eq!(h.camera.last_open_id(), Some("0".to_string()));
    assert_eq!(h.notifier.posted_kinds(), vec![NotificationKind::Started]);
}

#[test]
fn start_without_camera_terminates_immediately() {
    let h = Harness::with_cameras(Vec::new());

    h.controller.start();
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_count(), 0);
    assert!(h.notifier.posted_kinds().is_empty());
    assert_eq!(h.stops.count(), 1);
}

#[test]
fn duplicate_start_toggles_the_overlay_off() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();
    assert!(h.controller.is_active());

    h.controller.start();
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_devices(), 0);
}

#[test]
fn concurrent_starts_never_yield_two_overlays() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    let threads: Vec<_> = (0..2)
        .map(|_| {
            let controller = Arc::clone(&h.controller);
            thread::spawn(move || controller.start())
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }
    h.settle();

    assert!(h.display.max_live_overlays() <= 1);
    assert!(h.camera.max_open_devices() <= 1);

    h.controller.stop(false);
    h.settle();
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_devices(), 0);
}

#[test]
fn stop_is_idempotent() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();
    h.controller.stop(false);
    h.controller.stop(false);
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_devices(), 0);
    // The second stop posts and cancels nothing.
    assert_eq!(h.notifier.posted_kinds(), vec![NotificationKind::Started]);
    assert_eq!(h.notifier.cancel_count(), 1);
    assert_eq!(h.stops.count(), 2);
}

#[test]
fn screen_off_tears_down_views_but_keeps_the_run() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();

    h.display.screen_off();
    h.settle();

    assert!(h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_devices(), 0);
    // The subscription outlives the views, or screen-on would be lost.
    assert_eq!(h.display.screen_subscriptions(), 1);
    assert_eq!(h.notifier.posted_kinds(), vec![NotificationKind::Started]);

    h.display.screen_on();
    h.settle();

    assert_eq!(h.display.live_overlays(), 1);
    assert_eq!(h.session.state(), CameraSessionState::Streaming);
    assert_eq!(h.camera.open_count(), 2);
}

#[test]
fn alpha_preview_is_live_and_commit_only_persists() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();
    assert_eq!(h.display.surface_alpha(), Some(0.5));

    h.controller.request_alpha_preview(0.8);
    assert_eq!(h.display.surface_alpha(), Some(0.8));
    assert_eq!(h.store.raw(keys::OVERLAY_ALPHA), None);

    h.controller.request_alpha_commit(0.8);
    assert_eq!(h.store.get_float(keys::OVERLAY_ALPHA, 0.5), 0.8);
    assert_eq!(h.display.surface_alpha(), Some(0.8));
}

#[test]
fn facing_changes_collapse_into_one_debounced_restart() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back(), SimCameraSpec::front()]);

    h.controller.start();
    h.settle();
    assert_eq!(h.camera.open_count(), 1);

    h.controller.request_facing_change(CameraFacing::Front);
    h.controller.request_facing_change(CameraFacing::Back);
    h.controller.request_facing_change(CameraFacing::Front);
    // Views come down immediately; recreation waits out the debounce.
    assert_eq!(h.display.live_overlays(), 0);

    thread::sleep(Duration::from_millis(1000));
    h.settle();

    assert!(h.controller.is_active());
    assert_eq!(h.camera.open_count(), 2);
    assert_eq!(h.camera.last_open_id(), Some("1".to_string()));
    assert_eq!(h.session.state(), CameraSessionState::Streaming);
    assert_eq!(h.notifier.posted_kinds(), vec![NotificationKind::Started]);
}

#[test]
fn facing_change_without_auto_restart_stops_with_notice() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back(), SimCameraSpec::front()]);
    h.store.set_bool(keys::AUTO_RESTART_ON_FACING_CHANGE, false);

    h.controller.start();
    h.settle();
    h.controller.request_facing_change(CameraFacing::Front);
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(
        h.notifier.posted_kinds(),
        vec![NotificationKind::Started, NotificationKind::Restarting]
    );
    assert_eq!(h.notifier.cancel_count(), 1);
}

#[test]
fn stop_cancels_a_pending_debounced_restart() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back(), SimCameraSpec::front()]);

    h.controller.start();
    h.settle();
    h.controller.request_facing_change(CameraFacing::Front);
    h.controller.stop(false);

    thread::sleep(Duration::from_millis(1000));
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_count(), 1);
}

#[test]
fn front_preference_degrades_to_back_without_front_camera() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);
    h.store.set_int(keys::CAMERA_FACING, 1);

    h.controller.start();
    h.settle();

    assert!(h.controller.is_active());
    assert_eq!(h.camera.last_open_id(), Some("0".to_string()));
    assert_eq!(h.session.state(), CameraSessionState::Streaming);
}

struct NullTarget;

impl PreviewTarget for NullTarget {
    fn set_buffer_size(&self, _size: PreviewSize) {}

    fn surface_handle(&self) -> SurfaceHandle {
        SurfaceHandle(0)
    }
}

#[test]
fn manager_rejects_front_when_the_probe_denies_it() {
    let camera = Arc::new(SimCamera::new(vec![
        SimCameraSpec::back(),
        SimCameraSpec::front(),
    ]));
    let session = CameraSessionManager::new(
        Arc::clone(&camera) as Arc<dyn CameraProvider>,
        Arc::new(FixedProbe::new(true, false)),
    );

    let result = session.open(CameraFacing::Front, 640, 480, Arc::new(NullTarget));
    assert_eq!(
        result.unwrap_err(),
        OverlayError::NoMatchingCamera(CameraFacing::Front)
    );
    assert_eq!(camera.open_count(), 0);
}

#[test]
fn device_error_stops_the_overlay_without_an_error_notification() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();
    assert_eq!(h.session.state(), CameraSessionState::Streaming);

    h.camera.emit_device_error(3);
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(h.camera.open_devices(), 0);
    assert_eq!(h.notifier.posted_kinds(), vec![NotificationKind::Started]);
    assert_eq!(h.notifier.cancel_count(), 1);
}

#[test]
fn disconnect_releases_the_camera_silently() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);

    h.controller.start();
    h.settle();

    h.camera.emit_disconnect();
    h.settle();

    // The overlay stays up; only the camera is gone.
    assert!(h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 1);
    assert_eq!(h.session.state(), CameraSessionState::Closed);
    assert_eq!(h.camera.open_devices(), 0);
    assert_eq!(h.notifier.posted_kinds(), vec![NotificationKind::Started]);
    assert_eq!(h.notifier.cancel_count(), 0);
}

#[test]
fn viewport_resize_updates_the_transform_without_reopening() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);
    h.display.set_rotation(DisplayRotation::Deg90);

    h.controller.start();
    h.settle();
    assert_eq!(h.camera.open_count(), 1);
    assert_eq!(
        h.display.surface_transform(),
        Some(preview_transform(
            640,
            480,
            PreviewSize::new(640, 480),
            DisplayRotation::Deg90
        ))
    );

    h.display.resize(400, 300);
    h.settle();

    assert_eq!(h.camera.open_count(), 1);
    assert_eq!(
        h.display.surface_transform(),
        Some(preview_transform(
            400,
            300,
            PreviewSize::new(640, 480),
            DisplayRotation::Deg90
        ))
    );
}

#[test]
fn open_failure_posts_error_and_stops_with_restart_notice() {
    let camera = Arc::new(SimCamera::new(vec![SimCameraSpec::back()]));
    let h = Harness::build(Arc::clone(&camera), Arc::new(FixedProbe::new(true, false)));
    camera.fail_enumeration(true);

    h.controller.start();
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.live_overlays(), 0);
    assert_eq!(
        h.notifier.posted_kinds(),
        vec![
            NotificationKind::Started,
            NotificationKind::Error,
            NotificationKind::Restarting
        ]
    );
    assert_eq!(h.notifier.cancel_count(), 1);
    assert_eq!(h.stops.count(), 1);
}

#[test]
fn overlay_creation_failure_terminates_the_run() {
    let h = Harness::with_cameras(vec![SimCameraSpec::back()]);
    h.display.fail_overlay_creation(true);

    h.controller.start();
    h.settle();

    assert!(!h.controller.is_active());
    assert_eq!(h.display.screen_subscriptions(), 0);
    assert!(h.notifier.posted_kinds().is_empty());
    assert_eq!(h.stops.count(), 1);
}
