//! Lifecycle tests for CaptureController against a fake camera.
//!
//! These tests cover:
//! - At most one stream alive at any time
//! - Every exit from Live releases the stream
//! - Frame size and mirroring on snap

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use signlens::camera::{
    CameraBackend, CameraConstraints, CaptureController, CaptureError, CaptureState, Frame,
    FrameFormat, Resolution, StreamHandle,
};
use signlens::ErrorKind;

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    stopped: AtomicUsize,
}

impl Counters {
    fn alive(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.stopped.load(Ordering::SeqCst)
    }
}

/// Fake camera: a 4x2 frame whose left half is red and right half blue.
struct FakeCamera {
    counters: Arc<Counters>,
    reported: Option<Resolution>,
    fail_reads: bool,
    open_error: Option<fn() -> CaptureError>,
}

impl FakeCamera {
    fn new(counters: &Arc<Counters>) -> Self {
        Self {
            counters: Arc::clone(counters),
            reported: None,
            fail_reads: false,
            open_error: None,
        }
    }
}

struct FakeStream {
    counters: Arc<Counters>,
    reported: Option<Resolution>,
    fail_reads: bool,
}

impl StreamHandle for FakeStream {
    fn reported_resolution(&self) -> Option<Resolution> {
        self.reported
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.fail_reads {
            return Err(CaptureError::DeviceUnavailable("stream ended".to_string()));
        }
        let mut data = Vec::new();
        for _row in 0..2 {
            data.extend_from_slice(&[255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255]);
        }
        Ok(Frame::from_raw(data, 4, 2, FrameFormat::Rgb).unwrap())
    }

    fn stop_tracks(&mut self) {
        self.counters.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

impl CameraBackend for FakeCamera {
    fn open(
        &mut self,
        _constraints: &CameraConstraints,
    ) -> Result<Box<dyn StreamHandle>, CaptureError> {
        if let Some(make_error) = self.open_error {
            return Err(make_error());
        }
        assert_eq!(self.counters.alive(), 0, "two streams alive at once");
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            counters: Arc::clone(&self.counters),
            reported: self.reported,
            fail_reads: self.fail_reads,
        }))
    }
}

fn native_size_camera(counters: &Arc<Counters>) -> FakeCamera {
    let mut camera = FakeCamera::new(counters);
    camera.reported = Some(Resolution::new(4, 2));
    camera
}

#[test]
fn test_open_snap_cycle_never_leaks_a_stream() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(native_size_camera(&counters));

    for _ in 0..3 {
        controller.open_camera(CameraConstraints::default()).unwrap();
        assert_eq!(counters.alive(), 1);
        controller.snap().unwrap();
        assert_eq!(controller.state(), CaptureState::Frozen);
        assert_eq!(counters.alive(), 0);
    }
    assert_eq!(counters.opened.load(Ordering::SeqCst), 3);
}

#[test]
fn test_double_open_releases_first_stream() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(native_size_camera(&counters));

    controller.open_camera(CameraConstraints::default()).unwrap();
    controller.open_camera(CameraConstraints::default()).unwrap();

    assert_eq!(counters.opened.load(Ordering::SeqCst), 2);
    assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    assert_eq!(counters.alive(), 1);
    assert!(controller.is_live());
}

#[test]
fn test_stop_twice_is_harmless() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(native_size_camera(&counters));

    controller.open_camera(CameraConstraints::default()).unwrap();
    controller.stop();
    controller.stop();

    assert_eq!(counters.stopped.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state(), CaptureState::Idle);
    assert!(!controller.holds_stream());
}

#[test]
fn test_snap_in_idle_is_not_active() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(FakeCamera::new(&counters));

    let err = controller.snap().unwrap_err();
    assert!(matches!(err, CaptureError::NotActive));
    assert_eq!(err.kind(), ErrorKind::NotActive);
    assert_eq!(controller.state(), CaptureState::Idle);
    assert_eq!(counters.opened.load(Ordering::SeqCst), 0);
}

#[test]
fn test_permission_denied_leaves_idle() {
    let counters = Arc::new(Counters::default());
    let mut camera = FakeCamera::new(&counters);
    camera.open_error = Some(|| CaptureError::PermissionDenied);
    let mut controller = CaptureController::new(camera);

    let err = controller
        .open_camera(CameraConstraints::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(controller.state(), CaptureState::Idle);
    assert!(controller.status().is_some());
}

#[test]
fn test_failed_read_releases_camera() {
    let counters = Arc::new(Counters::default());
    let mut camera = native_size_camera(&counters);
    camera.fail_reads = true;
    let mut controller = CaptureController::new(camera);

    controller.open_camera(CameraConstraints::default()).unwrap();
    assert!(controller.snap().is_err());
    assert_eq!(controller.state(), CaptureState::Idle);
    assert_eq!(counters.alive(), 0);
    assert!(controller.last_frame().is_none());
}

#[test]
fn test_failed_second_snap_drops_first_frame() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(native_size_camera(&counters));

    controller.open_camera(CameraConstraints::default()).unwrap();
    controller.snap().unwrap();
    assert!(controller.last_frame().is_some());

    controller.backend_mut().fail_reads = true;
    controller.open_camera(CameraConstraints::default()).unwrap();
    assert!(controller.snap().is_err());
    assert_eq!(controller.state(), CaptureState::Idle);
    assert!(controller.last_frame().is_none());
    assert!(controller.take_frame().is_none());
    assert_eq!(counters.alive(), 0);
}

#[test]
fn test_snap_matches_reported_resolution() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(native_size_camera(&counters));

    controller.open_camera(CameraConstraints::default()).unwrap();
    let frame = controller.snap().unwrap();
    assert_eq!(frame.resolution(), Resolution::new(4, 2));
    // Native size: pixels pass through untouched.
    assert_eq!(&frame.data[..3], &[255, 0, 0]);
}

#[test]
fn test_snap_without_reported_size_uses_fallback() {
    let counters = Arc::new(Counters::default());
    let mut controller =
        CaptureController::with_fallback_resolution(FakeCamera::new(&counters), Resolution::new(8, 4));

    controller.open_camera(CameraConstraints::default()).unwrap();
    let frame = controller.snap().unwrap();
    assert_eq!(frame.resolution(), Resolution::new(8, 4));
    assert!(frame.is_consistent());
}

#[test]
fn test_mirrored_snap() {
    let counters = Arc::new(Counters::default());
    let mut controller = CaptureController::new(native_size_camera(&counters));

    let constraints = CameraConstraints {
        mirror: true,
        ..Default::default()
    };
    controller.open_camera(constraints).unwrap();
    let frame = controller.snap().unwrap();
    // Blue half now on the left.
    assert_eq!(&frame.data[..3], &[0, 0, 255]);
}

#[test]
fn test_dropping_controller_releases_stream() {
    let counters = Arc::new(Counters::default());
    {
        let mut controller = CaptureController::new(native_size_camera(&counters));
        controller.open_camera(CameraConstraints::default()).unwrap();
        assert_eq!(counters.alive(), 1);
    }
    assert_eq!(counters.alive(), 0);
}
