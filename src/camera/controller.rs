//! Capture controller: camera lifecycle and still-frame capture.

use super::frame_utils::{mirror_horizontal, resize_frame};
use super::stream::{CameraBackend, LiveStream};
use super::types::{CameraConstraints, CaptureError, CaptureState, Frame, Resolution};

const STATUS_LIVE: &str = "Camera is on. Frame the image and take a photo.";
const STATUS_CAPTURED: &str = "Photo captured. Ready to detect.";

/// Drives one camera through `Idle -> Requesting -> Live -> Frozen`.
///
/// The controller owns at most one [`LiveStream`]. Every transition out of
/// `Live` goes through [`CaptureController::leave`], which drops the stream
/// and with it the hardware tracks, so no call site has to remember to stop
/// the camera.
///
/// The captured frame and the status line that a page would display are kept
/// here as well, so a flow hands them around explicitly instead of through
/// ambient globals.
pub struct CaptureController<B: CameraBackend> {
    backend: B,
    state: CaptureState,
    stream: Option<LiveStream>,
    last_frame: Option<Frame>,
    status: Option<String>,
    fallback_resolution: Resolution,
}

impl<B: CameraBackend> std::fmt::Debug for CaptureController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("state", &self.state)
            .field("holds_stream", &self.holds_stream())
            .field("has_frame", &self.last_frame.is_some())
            .finish_non_exhaustive()
    }
}

impl<B: CameraBackend> CaptureController<B> {
    /// Create a controller that falls back to 640x480 for streams that
    /// don't report a resolution.
    pub fn new(backend: B) -> Self {
        Self::with_fallback_resolution(backend, Resolution::default())
    }

    pub fn with_fallback_resolution(backend: B, fallback_resolution: Resolution) -> Self {
        Self {
            backend,
            state: CaptureState::Idle,
            stream: None,
            last_frame: None,
            status: None,
            fallback_resolution,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == CaptureState::Live
    }

    /// Whether a stream handle is currently held. True iff the state is `Live`.
    pub fn holds_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn fallback_resolution(&self) -> Resolution {
        self.fallback_resolution
    }

    /// Most recently captured frame, if any.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Take ownership of the captured frame, e.g. to hand it to the preprocessor.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.last_frame.take()
    }

    /// Human-readable status line for the current flow.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Request a camera stream and go live.
    ///
    /// Any stream already held is released before the new request is made,
    /// so two handles are never alive at once. A frame kept from an earlier
    /// snap is discarded.
    ///
    /// # Errors
    /// * `CaptureError::PermissionDenied` - access was refused
    /// * `CaptureError::DeviceUnavailable` / `DeviceNotFound` - no usable camera
    ///
    /// On error the controller is back in `Idle`.
    pub fn open_camera(&mut self, constraints: CameraConstraints) -> Result<(), CaptureError> {
        if self.stream.is_some() {
            log::info!("Camera already live, releasing current stream first");
        }
        self.leave(CaptureState::Requesting);
        self.last_frame = None;
        self.status = None;

        match self.backend.open(&constraints) {
            Ok(handle) => {
                log::info!(
                    "Camera {} live (reported resolution: {:?})",
                    constraints.device_index,
                    handle.reported_resolution()
                );
                self.stream = Some(LiveStream::new(handle, constraints));
                self.state = CaptureState::Live;
                self.status = Some(STATUS_LIVE.to_string());
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to open camera {}: {}", constraints.device_index, e);
                self.leave(CaptureState::Idle);
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Freeze the current video frame and release the camera.
    ///
    /// The frame has the stream's reported resolution, or the fallback
    /// resolution when the stream reports none. On success the controller
    /// moves to `Frozen`; the frame is returned and also kept as
    /// [`CaptureController::last_frame`].
    ///
    /// # Errors
    /// * `CaptureError::NotActive` - not `Live`; nothing is changed
    /// * any error from reading the frame; the camera is released, no frame
    ///   is kept and the controller returns to `Idle`
    pub fn snap(&mut self) -> Result<Frame, CaptureError> {
        let live = match (self.state, self.stream.as_mut()) {
            (CaptureState::Live, Some(live)) => live,
            _ => return Err(CaptureError::NotActive),
        };

        let target = live
            .reported_resolution()
            .unwrap_or(self.fallback_resolution);
        let mirror = live.constraints().mirror;
        let grabbed = live.read_frame();

        let frame = grabbed.and_then(|raw| {
            resize_frame(&raw, target).ok_or_else(|| {
                CaptureError::DeviceUnavailable("camera delivered a malformed frame".to_string())
            })
        });

        match frame {
            Ok(mut frame) => {
                self.leave(CaptureState::Frozen);
                if mirror {
                    mirror_horizontal(&mut frame);
                }
                log::info!("Captured {} frame", frame.resolution());
                self.last_frame = Some(frame.clone());
                self.status = Some(STATUS_CAPTURED.to_string());
                Ok(frame)
            }
            Err(e) => {
                log::warn!("Snap failed: {}", e);
                self.leave(CaptureState::Idle);
                self.last_frame = None;
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Release any held stream and return to `Idle`. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.leave(CaptureState::Idle);
    }

    /// Stop, discard the captured frame and clear the status line.
    pub fn reset(&mut self) {
        self.leave(CaptureState::Idle);
        self.last_frame = None;
        self.status = None;
    }

    /// The single release routine: drop the stream (stopping its tracks) and
    /// enter `next`.
    fn leave(&mut self, next: CaptureState) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
        if self.state != next {
            log::debug!("Capture state {} -> {}", self.state, next);
        }
        self.state = next;
    }
}

impl<B: CameraBackend> Drop for CaptureController<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
